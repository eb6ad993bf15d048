use clap::Parser;
use dotenvy::dotenv;
use std::process::ExitCode;
use std::time::Duration;

use rss_pusher::{
    config::Config,
    errors::ConfigError,
    feed::fetcher::HttpFeedSource,
    ledger::LedgerBackend,
    observability::{self, RunMetrics},
    telegram::client::TelegramClient,
    PushPolicy, RunSummary, Target,
};

/// Configuration problems exit with this before any work is done.
const CONFIG_ERROR_EXIT: u8 = 2;

/// Announce new RSS posts to a Telegram chat
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Send only the oldest unsent post
    #[clap(long, conflicts_with = "max_push")]
    single: bool,

    /// Most posts to send in one run, 0 for no limit
    #[clap(long)]
    max_push: Option<usize>,

    /// Seconds to wait between messages
    #[clap(long)]
    delay_secs: Option<u64>,

    /// Exit non-zero when any fetch, send or ledger step failed
    #[clap(long)]
    strict: bool,

    /// Log the messages that would be sent without sending or saving anything
    #[clap(long)]
    dry_run: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if self.single {
            config.push.policy = PushPolicy::Single;
        }
        if let Some(max) = self.max_push {
            config.push.policy = PushPolicy::batch(max);
        }
        if let Some(secs) = self.delay_secs {
            config.push.send_delay = Duration::from_secs(secs);
        }
        config.strict_exit |= self.strict;
        config.push.dry_run = self.dry_run;
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv().ok();
    observability::init_logging();

    let metrics = RunMetrics::start();
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            metrics.log_config_error(&e);
            return ExitCode::from(CONFIG_ERROR_EXIT);
        }
    };
    args.apply(&mut config);
    let strict = config.strict_exit;

    match run_job(config) {
        Ok(summary) => {
            metrics.log_run_summary(&summary);
            ExitCode::from(summary.exit_code(strict))
        }
        Err(e) => {
            metrics.log_config_error(&e);
            ExitCode::from(CONFIG_ERROR_EXIT)
        }
    }
}

#[tokio::main]
async fn run_job(config: Config) -> Result<RunSummary, ConfigError> {
    let feed = HttpFeedSource::new()?;
    let notifier = TelegramClient::new(config.telegram.clone())?;
    let store = LedgerBackend::from_config(&config.ledger)?;
    let target = Target {
        feed_url: config.rss_url.clone(),
        chat_id: notifier.chat_id().to_string(),
    };

    tracing::info!("===== Run started =====");
    let summary = rss_pusher::run(&feed, &notifier, &store, &target, &config.push).await;
    tracing::info!("===== Run finished =====");

    Ok(summary)
}

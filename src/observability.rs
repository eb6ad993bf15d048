use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::tasks::pusher::types::RunSummary;

/// Initialize structured logging and tracing
pub fn init_logging() {
    let config = ObservabilityConfig::from_env();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.is_json() {
        // JSON lines for log collectors
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }

    info!(
        service = "rss-pusher",
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Logging initialized"
    );
}

/// Timing for a single run
pub struct RunMetrics {
    pub start_time: Instant,
}

impl RunMetrics {
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    pub fn log_run_summary(&self, summary: &RunSummary) {
        let sent = summary.sent_ids();
        let failed = summary.failed_ids();
        let duration_ms = self.elapsed_ms();

        if summary.has_failures() {
            warn!(
                ledger_load = %summary.ledger_load,
                feed = %summary.feed,
                fetched = summary.fetched,
                rejected = summary.rejected,
                new = summary.new,
                deferred = summary.deferred,
                sent = ?sent,
                failed = ?failed,
                ledger_save = %summary.ledger_save,
                duration_ms = duration_ms,
                "Run finished with failures"
            );
        } else {
            info!(
                fetched = summary.fetched,
                rejected = summary.rejected,
                already_sent = summary.already_sent,
                new = summary.new,
                deferred = summary.deferred,
                sent = ?sent,
                ledger_save = %summary.ledger_save,
                duration_ms = duration_ms,
                "Run finished"
            );
        }
    }

    pub fn log_config_error(&self, error: &crate::errors::ConfigError) {
        error!(
            error = %error,
            duration_ms = self.elapsed_ms(),
            "Configuration error, nothing was done"
        );
    }
}

/// Environment configuration
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: String,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
        }
    }

    /// Anything other than `json` gets the human-readable layer.
    pub fn is_json(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::ledger::gist::GistConfig;
use crate::tasks::pusher::types::{PushPolicy, PushSettings};
use crate::telegram::format::EscapeSet;
use crate::telegram::types::TelegramConfig;

pub const DEFAULT_POSTS_FILE: &str = "sent_posts.json";
pub const DEFAULT_MAX_PUSH: usize = 5;
pub const DEFAULT_SEND_DELAY_SECS: u64 = 3;
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerConfig {
    File { path: PathBuf },
    Gist(GistConfig),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rss_url: String,
    pub telegram: TelegramConfig,
    pub ledger: LedgerConfig,
    pub push: PushSettings,
    pub strict_exit: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rss_url = get("RSS_URL").ok_or(ConfigError::Missing("RSS_URL"))?;
        url::Url::parse(&rss_url).map_err(|e| ConfigError::invalid("RSS_URL", e.to_string()))?;
        log::info!("Using feed from RSS_URL: {}", rss_url);

        let chat_id = get("CHAT_ID").ok_or(ConfigError::Missing("CHAT_ID"))?;
        let bot_token = get("TELEGRAM_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_TOKEN"))?;
        let api_base_url = match get("TELEGRAM_API_BASE_URL") {
            Some(base) => {
                log::info!("Using Telegram API from TELEGRAM_API_BASE_URL: {}", base);
                base.trim_end_matches('/').to_string()
            }
            None => DEFAULT_TELEGRAM_API.to_string(),
        };
        let disable_preview = parse_bool(&get, "TELEGRAM_DISABLE_PREVIEW", false)?;

        let telegram = TelegramConfig {
            bot_token,
            api_base_url,
            chat_id,
            disable_preview,
        };

        let ledger = match get("LEDGER_BACKEND").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("file") => {
                let path = get("POSTS_FILE").unwrap_or_else(|| DEFAULT_POSTS_FILE.to_string());
                log::info!("Using ledger file: {}", path);
                LedgerConfig::File {
                    path: PathBuf::from(path),
                }
            }
            Some("gist") => {
                let gist = GistConfig {
                    gist_id: get("GIST_ID").ok_or(ConfigError::Missing("GIST_ID"))?,
                    token: get("GIST_TOKEN").ok_or(ConfigError::Missing("GIST_TOKEN"))?,
                    filename: get("GIST_FILENAME")
                        .unwrap_or_else(|| DEFAULT_POSTS_FILE.to_string()),
                    api_base_url: get("GITHUB_API_BASE_URL")
                        .map(|base| base.trim_end_matches('/').to_string())
                        .unwrap_or_else(|| DEFAULT_GITHUB_API.to_string()),
                };
                log::info!("Using ledger gist {} file {}", gist.gist_id, gist.filename);
                LedgerConfig::Gist(gist)
            }
            Some(other) => {
                return Err(ConfigError::invalid(
                    "LEDGER_BACKEND",
                    format!("expected 'file' or 'gist', got '{other}'"),
                ))
            }
        };

        let max = match get("MAX_PUSH") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::invalid("MAX_PUSH", e.to_string()))?,
            None => DEFAULT_MAX_PUSH,
        };
        let policy = match get("PUSH_MODE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("batch") => PushPolicy::batch(max),
            Some("single") => PushPolicy::Single,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "PUSH_MODE",
                    format!("expected 'single' or 'batch', got '{other}'"),
                ))
            }
        };

        let delay_secs = match get("SEND_DELAY_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::invalid("SEND_DELAY_SECS", e.to_string()))?,
            None => DEFAULT_SEND_DELAY_SECS,
        };
        let escape = if parse_bool(&get, "ESCAPE_PARENS", true)? {
            EscapeSet::Full
        } else {
            EscapeSet::NoParens
        };
        log::info!(
            "Push policy: {:?}, send delay: {}s, escape set: {:?}",
            policy,
            delay_secs,
            escape
        );

        Ok(Config {
            rss_url,
            telegram,
            ledger,
            push: PushSettings {
                policy,
                send_delay: Duration::from_secs(delay_secs),
                escape,
                dry_run: false,
            },
            strict_exit: parse_bool(&get, "STRICT_EXIT", false)?,
        })
    }
}

fn parse_bool<F>(get: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::invalid(
                key,
                format!("expected a boolean, got '{other}'"),
            )),
        },
    }
}

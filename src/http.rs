use reqwest::Client;
use std::time::Duration;

use crate::errors::ConfigError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TOTAL_TIMEOUT_SECS: u64 = 30;

/// GitHub rejects API calls without a User-Agent.
pub const USER_AGENT: &str = concat!(
    "rss-pusher/",
    env!("CARGO_PKG_VERSION"),
    " (RSS to Telegram)"
);

pub fn build_client() -> Result<Client, ConfigError> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

use thiserror::Error;

/// Problems with the environment that stop the job before it does any work
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required variable '{0}' is not set")]
    Missing(&'static str),
    #[error("Invalid value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl ConfigError {
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error fetching feed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Feed server returned status {0}")]
    Status(u16),
    #[error("Feed parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Why a feed entry was not turned into an announceable post
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("guid '{0}' has no '-' separated id segment")]
    MissingSeparator(String),
    #[error("id '{0}' is not numeric")]
    NotNumeric(String),
    #[error("entry '{guid}' has no {field}")]
    MissingField { guid: String, field: &'static str },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Ledger is not a JSON array of ids: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Gist request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Gist API returned status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Network error sending message: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Telegram API error: {0}")]
    Api(String),
}

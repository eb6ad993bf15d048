use reqwest::Client;

use super::types::RawEntry;
use super::FeedSource;
use crate::errors::{ConfigError, FeedError};
use crate::http;

// See: https://stackoverflow.com/a/7001617/5155484
const FEED_ACCEPT: &str = "application/rss+xml, application/rdf+xml, application/atom+xml, application/feed+json, application/xml;q=0.9, text/xml;q=0.8";

pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            client: http::build_client()?,
        })
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError> {
        log::info!("Fetching feed {}", url);
        let response = self
            .client
            .get(url)
            .header("Accept", FEED_ACCEPT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let entries = parse_entries(&body)?;
        log::info!("Got {} entries from {}", entries.len(), url);
        Ok(entries)
    }
}

pub fn parse_entries(body: &[u8]) -> Result<Vec<RawEntry>, FeedError> {
    let parsed = feed_rs::parser::parse(body)?;
    Ok(parsed.entries.into_iter().map(RawEntry::from).collect())
}

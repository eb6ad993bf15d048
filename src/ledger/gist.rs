//! Ledger kept as one file inside a GitHub Gist.

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::{Ledger, LedgerStore};
use crate::errors::{ConfigError, LedgerError};
use crate::http;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Clone, PartialEq)]
pub struct GistConfig {
    pub gist_id: String,
    pub token: String,
    pub filename: String,
    pub api_base_url: String,
}

impl GistConfig {
    pub fn gist_url(&self) -> String {
        format!("{}/gists/{}", self.api_base_url, self.gist_id)
    }
}

impl fmt::Debug for GistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GistConfig")
            .field("gist_id", &self.gist_id)
            .field("token", &"<redacted>")
            .field("filename", &self.filename)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct GistResponse {
    #[serde(default)]
    pub files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
pub struct GistFile {
    pub content: Option<String>,
    #[serde(default)]
    pub truncated: bool,
    pub raw_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GistUpdate {
    pub files: BTreeMap<String, GistFileContent>,
}

#[derive(Debug, Serialize)]
pub struct GistFileContent {
    pub content: String,
}

/// What a GET of the gist says about our ledger file.
#[derive(Debug, PartialEq, Eq)]
pub enum GistContent {
    Missing,
    Inline(String),
    /// Too large to inline, has to be fetched from `raw_url`.
    Truncated(String),
}

impl GistResponse {
    pub fn content_of(self, filename: &str) -> GistContent {
        let mut files = self.files;
        match files.remove(filename) {
            None => GistContent::Missing,
            Some(GistFile {
                truncated: true,
                raw_url: Some(raw_url),
                ..
            }) => GistContent::Truncated(raw_url),
            Some(file) => GistContent::Inline(file.content.unwrap_or_default()),
        }
    }
}

impl GistUpdate {
    pub fn replace_file(filename: &str, content: String) -> Self {
        let mut files = BTreeMap::new();
        files.insert(filename.to_string(), GistFileContent { content });
        Self { files }
    }
}

pub struct GistLedger {
    client: Client,
    config: GistConfig,
}

impl GistLedger {
    pub fn new(config: GistConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client: http::build_client()?,
            config,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.config.token)
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn fetch_raw(&self, raw_url: &str) -> Result<String, LedgerError> {
        log::info!("Ledger file is truncated in the gist, fetching {}", raw_url);
        let response = self.authorized(self.client.get(raw_url)).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.text().await?)
    }
}

impl LedgerStore for GistLedger {
    async fn load(&self) -> Result<Ledger, LedgerError> {
        let response = self
            .authorized(self.client.get(self.config.gist_url()))
            .send()
            .await?;
        let gist: GistResponse = ensure_success(response).await?.json().await?;

        let data = match gist.content_of(&self.config.filename) {
            GistContent::Missing => {
                log::info!(
                    "Gist {} has no {}, starting with an empty ledger",
                    self.config.gist_id,
                    self.config.filename
                );
                return Ok(Ledger::default());
            }
            GistContent::Inline(data) => data,
            GistContent::Truncated(raw_url) => self.fetch_raw(&raw_url).await?,
        };
        Ledger::from_json(&data)
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let body = GistUpdate::replace_file(&self.config.filename, ledger.to_json()?);
        let response = self
            .authorized(self.client.patch(self.config.gist_url()))
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        log::info!(
            "Saved {} ids to gist {}",
            ledger.len(),
            self.config.gist_id
        );
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LedgerError::Status {
        status: status.as_u16(),
        body,
    })
}

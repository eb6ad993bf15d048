//! The sent-ledger: ids of posts already announced, and where it is kept
//! between runs.

pub mod file;
pub mod gist;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;

use crate::config::LedgerConfig;
use crate::errors::{ConfigError, LedgerError};
use file::FileLedger;
use gist::GistLedger;

/// Append-only list of sent post ids, stored as a JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    ids: Vec<String>,
}

impl Ledger {
    /// Set view for membership checks, build once per diff.
    pub fn id_set(&self) -> HashSet<&str> {
        self.ids.iter().map(String::as_str).collect()
    }

    pub fn append(&mut self, id: impl Into<String>) {
        self.ids.push(id.into());
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Blank input is an empty ledger, as left behind by a fresh setup.
    pub fn from_json(data: &str) -> Result<Self, LedgerError> {
        let data = data.trim();
        if data.is_empty() {
            return Ok(Ledger::default());
        }
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Vec<String>> for Ledger {
    fn from(ids: Vec<String>) -> Self {
        Ledger { ids }
    }
}

pub trait LedgerStore {
    fn load(&self) -> impl Future<Output = Result<Ledger, LedgerError>> + Send;
    fn save(&self, ledger: &Ledger) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

/// The backend picked by `LEDGER_BACKEND`.
pub enum LedgerBackend {
    File(FileLedger),
    Gist(GistLedger),
}

impl LedgerBackend {
    pub fn from_config(config: &LedgerConfig) -> Result<Self, ConfigError> {
        Ok(match config {
            LedgerConfig::File { path } => LedgerBackend::File(FileLedger::new(path.clone())),
            LedgerConfig::Gist(gist) => LedgerBackend::Gist(GistLedger::new(gist.clone())?),
        })
    }
}

impl LedgerStore for LedgerBackend {
    async fn load(&self) -> Result<Ledger, LedgerError> {
        match self {
            LedgerBackend::File(store) => store.load().await,
            LedgerBackend::Gist(store) => store.load().await,
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        match self {
            LedgerBackend::File(store) => store.save(ledger).await,
            LedgerBackend::Gist(store) => store.save(ledger).await,
        }
    }
}

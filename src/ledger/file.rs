use std::io::ErrorKind;
use std::path::PathBuf;

use super::{Ledger, LedgerStore};
use crate::errors::LedgerError;

pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LedgerStore for FileLedger {
    async fn load(&self) -> Result<Ledger, LedgerError> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "No ledger at {}, first run starts with an empty ledger",
                    self.path.display()
                );
                return Ok(Ledger::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ledger::from_json(&data)
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let json = ledger.to_json()?;
        tokio::fs::write(&self.path, json).await?;
        log::info!(
            "Saved {} ids to {}",
            ledger.len(),
            self.path.display()
        );
        Ok(())
    }
}

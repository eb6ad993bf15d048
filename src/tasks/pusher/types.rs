use std::fmt;
use std::time::Duration;

use crate::telegram::format::EscapeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPolicy {
    /// Announce only the oldest unsent post per run.
    Single,
    /// Announce every unsent post oldest-first, at most `max` when set.
    Batch { max: Option<usize> },
}

impl PushPolicy {
    /// `0` means no cap.
    pub fn batch(max: usize) -> Self {
        PushPolicy::Batch {
            max: (max > 0).then_some(max),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            PushPolicy::Single => Some(1),
            PushPolicy::Batch { max } => *max,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PushSettings {
    pub policy: PushPolicy,
    /// Waited before every message except the first.
    pub send_delay: Duration,
    pub escape: EscapeSet,
    pub dry_run: bool,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            policy: PushPolicy::batch(crate::config::DEFAULT_MAX_PUSH),
            send_delay: Duration::from_secs(crate::config::DEFAULT_SEND_DELAY_SECS),
            escape: EscapeSet::Full,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StageOutcome {
    #[default]
    Ok,
    Skipped,
    Failed(String),
}

impl StageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Ok => write!(f, "ok"),
            StageOutcome::Skipped => write!(f, "skipped"),
            StageOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub id: String,
    pub outcome: StageOutcome,
}

/// Everything one run did, stage by stage.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub ledger_load: StageOutcome,
    pub feed: StageOutcome,
    pub fetched: usize,
    pub rejected: usize,
    pub already_sent: usize,
    pub new: usize,
    /// New posts left for a later run by the push policy.
    pub deferred: usize,
    pub deliveries: Vec<Delivery>,
    pub ledger_save: StageOutcome,
}

impl RunSummary {
    pub fn sent_ids(&self) -> Vec<&str> {
        self.deliveries
            .iter()
            .filter(|d| d.outcome == StageOutcome::Ok)
            .map(|d| d.id.as_str())
            .collect()
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.deliveries
            .iter()
            .filter(|d| d.outcome.is_failed())
            .map(|d| d.id.as_str())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.ledger_load.is_failed()
            || self.feed.is_failed()
            || self.ledger_save.is_failed()
            || self.deliveries.iter().any(|d| d.outcome.is_failed())
    }

    /// Best-effort runs always exit 0; strict runs exit 1 when any stage
    /// failed.
    pub fn exit_code(&self, strict: bool) -> u8 {
        if strict && self.has_failures() {
            1
        } else {
            0
        }
    }
}

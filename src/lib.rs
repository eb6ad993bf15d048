pub mod config;
pub mod errors;
pub mod feed;
pub mod http;
pub mod ledger;
pub mod observability;
pub mod tasks;
pub mod telegram;
#[cfg(test)]
pub mod test_helpers;

pub use tasks::pusher::runner::{check_for_updates, run, Target};
pub use tasks::pusher::types::{PushPolicy, PushSettings, RunSummary, StageOutcome};

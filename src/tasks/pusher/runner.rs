use super::types::{Delivery, PushSettings, RunSummary, StageOutcome};
use crate::{
    feed::{extract::find_new_entries, FeedSource},
    ledger::{Ledger, LedgerStore},
    telegram::{format::format_message, Notifier},
};

/// Where posts come from and where they go.
#[derive(Debug, Clone)]
pub struct Target {
    pub feed_url: String,
    pub chat_id: String,
}

/// One complete pass: load the ledger, announce new posts, persist the ledger.
///
/// Never fails; every stage records its outcome in the returned summary.
pub async fn run<F, N, S>(
    feed: &F,
    notifier: &N,
    store: &S,
    target: &Target,
    settings: &PushSettings,
) -> RunSummary
where
    F: FeedSource,
    N: Notifier,
    S: LedgerStore,
{
    let mut summary = RunSummary::default();

    let mut ledger = match store.load().await {
        Ok(ledger) => {
            log::info!("Loaded ledger with {} sent ids", ledger.len());
            ledger
        }
        Err(e) => {
            log::warn!("Failed to load ledger, treating it as empty: {e}");
            summary.ledger_load = StageOutcome::Failed(e.to_string());
            Ledger::default()
        }
    };

    let appended =
        check_for_updates(feed, notifier, &mut ledger, target, settings, &mut summary).await;

    summary.ledger_save = if appended == 0 || settings.dry_run {
        StageOutcome::Skipped
    } else {
        match store.save(&ledger).await {
            Ok(()) => StageOutcome::Ok,
            Err(e) => {
                log::error!("Failed to save ledger, {appended} ids will be sent again: {e}");
                StageOutcome::Failed(e.to_string())
            }
        }
    };

    summary
}

/// Fetches the feed and announces unsent posts oldest-first, appending the id
/// of every delivered post to `ledger`. Returns how many ids were appended.
pub async fn check_for_updates<F, N>(
    feed: &F,
    notifier: &N,
    ledger: &mut Ledger,
    target: &Target,
    settings: &PushSettings,
    summary: &mut RunSummary,
) -> usize
where
    F: FeedSource,
    N: Notifier,
{
    let raw_entries = match feed.fetch(&target.feed_url).await {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Error getting feed {}: {e}", target.feed_url);
            summary.feed = StageOutcome::Failed(e.to_string());
            return 0;
        }
    };
    summary.fetched = raw_entries.len();

    let candidates = find_new_entries(raw_entries, ledger);
    summary.rejected = candidates.rejected.len();
    summary.already_sent = candidates.already_sent;
    summary.new = candidates.new.len();

    if candidates.new.is_empty() {
        log::info!("No new posts");
        return 0;
    }

    let mut to_send = candidates.new;
    if let Some(limit) = settings.policy.limit() {
        if to_send.len() > limit {
            summary.deferred = to_send.len() - limit;
            to_send.truncate(limit);
            log::info!(
                "Sending {limit} posts now, {} left for later runs",
                summary.deferred
            );
        }
    }

    let mut appended = 0;
    for (index, entry) in to_send.iter().enumerate() {
        let message = format_message(entry, settings.escape);

        if settings.dry_run {
            log::info!("[dry run] Would send post {}: {}", entry.id, message);
            summary.deliveries.push(Delivery {
                id: entry.id.clone(),
                outcome: StageOutcome::Skipped,
            });
            continue;
        }

        if index > 0 && !settings.send_delay.is_zero() {
            tokio::time::sleep(settings.send_delay).await;
        }

        log::info!("Sending post {} to {}", entry.id, target.chat_id);
        let outcome = match notifier.notify(&target.chat_id, &message).await {
            Ok(()) => {
                log::info!("Post {} sent", entry.id);
                ledger.append(entry.id.clone());
                appended += 1;
                StageOutcome::Ok
            }
            Err(e) => {
                // left out of the ledger so the next run tries again
                log::error!("Error sending post {}: {e}", entry.id);
                StageOutcome::Failed(e.to_string())
            }
        };
        summary.deliveries.push(Delivery {
            id: entry.id.clone(),
            outcome,
        });
    }

    appended
}

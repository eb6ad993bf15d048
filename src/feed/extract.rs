//! Turning provider guids into numeric post ids and picking out the posts the
//! ledger has not seen yet.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::types::{Entry, RawEntry};
use crate::errors::ExtractError;
use crate::ledger::Ledger;

/// `https://host/thread-12345.html` -> `12345`
pub fn extract_post_id(guid: &str) -> Result<String, ExtractError> {
    let Some((_, last)) = guid.rsplit_once('-') else {
        return Err(ExtractError::MissingSeparator(guid.to_string()));
    };
    let candidate = last.split_once('.').map_or(last, |(head, _)| head);
    // ASCII digits only, other Unicode digits are not post ids
    if candidate.is_empty() || !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExtractError::NotNumeric(candidate.to_string()));
    }
    Ok(candidate.to_string())
}

pub fn to_entry(raw: RawEntry) -> Result<Entry, ExtractError> {
    let id = extract_post_id(&raw.guid)?;
    let title = raw.title.ok_or_else(|| ExtractError::MissingField {
        guid: raw.guid.clone(),
        field: "title",
    })?;
    let link = raw.link.ok_or_else(|| ExtractError::MissingField {
        guid: raw.guid.clone(),
        field: "link",
    })?;
    Ok(Entry { id, title, link })
}

/// Orders digit strings by value without parsing them into a fixed-width
/// integer.
pub fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[derive(Debug, Default)]
pub struct Candidates {
    /// Unsent entries, oldest (smallest id) first.
    pub new: Vec<Entry>,
    pub rejected: Vec<ExtractError>,
    pub already_sent: usize,
}

pub fn find_new_entries(raw_entries: Vec<RawEntry>, ledger: &Ledger) -> Candidates {
    let mut candidates = Candidates::default();
    let sent = ledger.id_set();
    let mut seen = HashSet::new();

    for raw in raw_entries {
        let entry = match to_entry(raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping feed entry: {e}");
                candidates.rejected.push(e);
                continue;
            }
        };
        log::debug!("Parsed id {} ({})", entry.id, entry.title);

        if sent.contains(entry.id.as_str()) {
            candidates.already_sent += 1;
            continue;
        }
        if !seen.insert(entry.id.clone()) {
            log::debug!("Duplicate id {} in feed", entry.id);
            continue;
        }
        candidates.new.push(entry);
    }

    candidates.new.sort_by(|a, b| numeric_cmp(&a.id, &b.id));
    candidates
}

// src/aggregate/merge.rs
//! Opt-in deduplication, merging with written days, and sorting.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::config::DedupMode;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RecordKey {
    Content(String),
    Timestamp(String, String, String),
}

fn key_for(record: &Record, mode: DedupMode) -> RecordKey {
    match mode {
        DedupMode::Timestamp => {
            let (dt, tm, name) = record.timestamp_key();
            RecordKey::Timestamp(dt.to_string(), tm.to_string(), name.to_string())
        }
        DedupMode::Off | DedupMode::Content => RecordKey::Content(fingerprint(record)),
    }
}

/// SHA-256 over element name and raw text, line endings normalized.
#[must_use]
pub fn fingerprint(record: &Record) -> String {
    let raw = record.raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut hasher = Sha256::new();
    hasher.update(record.name.as_bytes());
    hasher.update([0u8]);
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Drops every record whose key was already seen, keeping the first.
#[must_use]
pub fn dedup(records: Vec<Record>, mode: DedupMode) -> Vec<Record> {
    if mode == DedupMode::Off {
        return records;
    }
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(key_for(r, mode)))
        .collect()
}

/// Appends previously written records that no new record replaces.
///
/// Matching uses the dedup key, or content identity when dedup is off, so
/// repeated runs over the same input do not grow a day.
#[must_use]
pub fn merge_existing(new: Vec<Record>, existing: Vec<Record>, mode: DedupMode) -> Vec<Record> {
    let mode = match mode {
        DedupMode::Off => DedupMode::Content,
        m => m,
    };
    let mut seen: HashSet<RecordKey> = new.iter().map(|r| key_for(r, mode)).collect();
    let mut merged = new;
    merged.extend(
        existing
            .into_iter()
            .filter(|r| seen.insert(key_for(r, mode))),
    );
    merged
}

/// Stable sort by date, time and element name.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| a.timestamp_key().cmp(&b.timestamp_key()));
}

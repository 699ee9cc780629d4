//! # Adherence History Store
//!
//! Append-only, per-user log of prediction entries. Each user's history lives
//! under its own key (`missEntries-<uid>`) as one JSON array, in insertion
//! order.
//!
//! Appends are read-modify-write operations performed by the backing store
//! under a single lock or transaction, so concurrent sessions writing the same
//! user's history never lose an entry; their relative order is the order in
//! which the writes committed.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use super::entry::PredictionEntry;
use crate::core::error::{AdherenceError, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

pub const HISTORY_KEY_PREFIX: &str = "missEntries-";

/// Computes a key's new value from its current one
pub type BlobUpdate = Box<dyn FnOnce(Option<String>) -> anyhow::Result<String> + Send>;

/// Key-value persistence medium behind the history store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replace the value at `key` with `apply(current)` atomically. If `apply`
    /// fails nothing is written.
    async fn update(&self, key: &str, apply: BlobUpdate) -> anyhow::Result<()>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key).await
    }

    async fn update(&self, key: &str, apply: BlobUpdate) -> anyhow::Result<()> {
        (**self).update(key, apply).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key).await
    }
}

pub fn history_key(uid: &str) -> String {
    format!("{HISTORY_KEY_PREFIX}{uid}")
}

fn checked_uid(uid: &str) -> Result<&str> {
    if uid.trim().is_empty() {
        Err(AdherenceError::Unauthenticated)
    } else {
        Ok(uid)
    }
}

fn decode_history(blob: &str) -> anyhow::Result<Vec<PredictionEntry>> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(blob)?)
}

/// Splice one serialized entry onto the end of the stored JSON array. The
/// stored value must decode as a history first; anything else is left as is.
fn append_to_blob(current: Option<String>, entry_json: &str) -> anyhow::Result<String> {
    let current = match current {
        Some(blob) if !blob.trim().is_empty() => blob,
        _ => return Ok(format!("[{entry_json}]")),
    };

    let existing = decode_history(&current)
        .map_err(|e| anyhow::anyhow!("stored history is not a list of entries: {e}"))?;
    if existing.is_empty() {
        return Ok(format!("[{entry_json}]"));
    }

    let body = current
        .trim_end()
        .strip_suffix(']')
        .ok_or_else(|| anyhow::anyhow!("stored history is not a JSON array"))?;
    Ok(format!("{body},{entry_json}]"))
}

pub struct AdherenceHistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> AdherenceHistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Entries for `uid` in insertion order; empty when nothing was recorded
    pub async fn load(&self, uid: &str) -> Result<Vec<PredictionEntry>> {
        let uid = checked_uid(uid)?;
        let key = history_key(uid);

        let blob = self.store.get(&key).await.map_err(|e| {
            warn!("Failed to read adherence history for {uid}: {e}");
            AdherenceError::storage(e)
        })?;

        let entries = match blob {
            Some(blob) => decode_history(&blob).map_err(|e| {
                warn!("Adherence history for {uid} is unreadable: {e}");
                AdherenceError::storage(format!("history for {uid} is unreadable: {e}"))
            })?,
            None => Vec::new(),
        };

        debug!("Loaded {} adherence entries for {uid}", entries.len());
        Ok(entries)
    }

    /// Add one entry to the end of `uid`'s history
    pub async fn append(&self, uid: &str, entry: &PredictionEntry) -> Result<()> {
        let uid = checked_uid(uid)?;
        let entry_json = serde_json::to_string(entry).map_err(AdherenceError::storage)?;

        self.store
            .update(
                &history_key(uid),
                Box::new(move |current| append_to_blob(current, &entry_json)),
            )
            .await
            .map_err(|e| {
                warn!("Failed to append adherence entry {} for {uid}: {e}", entry.id);
                AdherenceError::storage(e)
            })?;

        debug!("Appended adherence entry {} for {uid}", entry.id);
        Ok(())
    }

    /// Remove every entry for `uid`
    pub async fn clear(&self, uid: &str) -> Result<()> {
        let uid = checked_uid(uid)?;

        self.store.remove(&history_key(uid)).await.map_err(|e| {
            warn!("Failed to clear adherence history for {uid}: {e}");
            AdherenceError::storage(e)
        })?;

        debug!("Cleared adherence history for {uid}");
        Ok(())
    }
}

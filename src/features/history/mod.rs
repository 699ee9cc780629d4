//! # Feature: Adherence History
//!
//! Per-user, append-only log of miss predictions with chart and summary
//! helpers for the display layer.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: `clear` removes the user-scoped key instead of a shared one
//! - 1.0.0: Initial release with JSON-array history per user

pub mod entry;
pub mod memory;
pub mod store;
pub mod summary;

pub use entry::{EntryIdGenerator, PredictionEntry};
pub use memory::MemoryStore;
pub use store::{history_key, AdherenceHistoryStore, BlobUpdate, KeyValueStore, HISTORY_KEY_PREFIX};
pub use summary::{probability_series, HistorySummary};

//! # Features
//!
//! - `prediction`: context encoding and the miss-probability model
//! - `reminders`: daily dose schedules and next-dose lookup
//! - `history`: per-user adherence history and its persistence seam

pub mod history;
pub mod prediction;
pub mod reminders;

pub use history::{
    probability_series, AdherenceHistoryStore, HistorySummary, KeyValueStore, MemoryStore,
    PredictionEntry,
};
pub use prediction::{
    encode, DayOfWeek, FeatureVector, MissPredictor, Prediction, PredictionContext, TimeOfDay,
    WeightVector, ALERT_THRESHOLD,
};
pub use reminders::{next_dose_time, DoseSchedule};


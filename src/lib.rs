// Core layer - configuration, errors, logging, identity boundary
pub mod core;

// Features layer - prediction, reminders, history
pub mod features;

// Infrastructure - SQLite persistence medium
pub mod database;

// Application layer
pub mod engine;

pub use self::core::{AdherenceError, Config, IdentityProvider, SessionIdentity};
pub use database::Database;
pub use engine::{AdherenceEngine, PredictionOutcome, SaveStatus};

pub use features::{
    // Prediction
    encode, DayOfWeek, FeatureVector, MissPredictor, Prediction, PredictionContext, TimeOfDay,
    WeightVector, ALERT_THRESHOLD,
    // Reminders
    next_dose_time, DoseSchedule,
    // History
    probability_series, AdherenceHistoryStore, HistorySummary, KeyValueStore, MemoryStore,
    PredictionEntry,
};

//! # Feature: Miss Prediction
//!
//! Encodes the context of an upcoming dose and scores it with a fixed
//! logistic model. Probabilities above the alert threshold raise a
//! "likely to miss this dose" warning.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Optional YAML model file
//! - 1.0.0: Initial release with built-in weights

pub mod encoder;
pub mod model;
pub mod predictor;

pub use encoder::{
    encode, DayOfWeek, FeatureVector, PredictionContext, TimeOfDay, FEATURE_COUNT, FEATURE_NAMES,
};
pub use model::ModelConfig;
pub use predictor::{
    sigmoid, MissPredictor, Prediction, WeightVector, ALERT_THRESHOLD, DEFAULT_BIAS,
    DEFAULT_COEFFICIENTS, MISS_ALERT_MESSAGE,
};

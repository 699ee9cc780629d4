//! # Miss Predictor
//!
//! Fixed logistic-regression model estimating the probability that the next
//! dose is missed.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use super::encoder::{encode, FeatureVector, PredictionContext, FEATURE_COUNT};
use crate::core::error::{AdherenceError, Result};

/// Coefficients in encoder order: time of day, day of week, online, hours since last dose
pub const DEFAULT_COEFFICIENTS: [f64; FEATURE_COUNT] = [1.2, 0.3, -0.8, 0.5];
pub const DEFAULT_BIAS: f64 = -4.5;

/// Probabilities strictly above this raise the miss alert
pub const ALERT_THRESHOLD: f64 = 0.70;

pub const MISS_ALERT_MESSAGE: &str = "You are likely to miss this dose. Set a reminder now.";

/// Logistic link, saturating to 0 or 1 for extreme inputs
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Linear model weights. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    coefficients: Vec<f64>,
    bias: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        WeightVector {
            coefficients: DEFAULT_COEFFICIENTS.to_vec(),
            bias: DEFAULT_BIAS,
        }
    }
}

impl WeightVector {
    /// Build a weight vector sized for the feature encoder
    pub fn new(coefficients: Vec<f64>, bias: f64) -> Result<Self> {
        if coefficients.len() != FEATURE_COUNT {
            return Err(AdherenceError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: coefficients.len(),
            });
        }
        if !bias.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AdherenceError::invalid_input(
                "model weights must be finite numbers",
            ));
        }
        Ok(WeightVector { coefficients, bias })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Linear score `bias + Σ coefficient·feature`
    pub fn score(&self, vector: &FeatureVector) -> Result<f64> {
        if vector.len() != self.coefficients.len() {
            return Err(AdherenceError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: vector.len(),
            });
        }

        Ok(self.bias
            + self
                .coefficients
                .iter()
                .zip(vector.values())
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}

/// Miss probability with the alert decision already applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// In [0, 1]
    pub probability: f64,
    pub alert: bool,
}

impl Prediction {
    /// Probability as a percentage rounded to two decimals
    pub fn probability_percent(&self) -> f64 {
        round_percent(self.probability)
    }

    pub fn alert_message(&self) -> Option<&'static str> {
        self.alert.then_some(MISS_ALERT_MESSAGE)
    }
}

pub(crate) fn round_percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissPredictor {
    threshold: f64,
}

impl Default for MissPredictor {
    fn default() -> Self {
        MissPredictor {
            threshold: ALERT_THRESHOLD,
        }
    }
}

impl MissPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predictor with a non-standard alert threshold
    pub fn with_threshold(threshold: f64) -> Self {
        MissPredictor { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Probability of missing the dose, in [0, 1]
    pub fn predict(&self, vector: &FeatureVector, weights: &WeightVector) -> Result<f64> {
        Ok(sigmoid(weights.score(vector)?))
    }

    /// Strictly above the threshold alerts; equal does not
    pub fn should_alert(&self, probability: f64) -> bool {
        probability > self.threshold
    }

    /// Encode, predict and apply the alert policy in one step
    pub fn assess(&self, context: &PredictionContext, weights: &WeightVector) -> Result<Prediction> {
        let probability = self.predict(&encode(context), weights)?;
        Ok(Prediction {
            probability,
            alert: self.should_alert(probability),
        })
    }
}

//! # Model File
//!
//! YAML description of a pre-computed miss-prediction model. Loaded once at
//! startup; the weights never change while the process runs.
//!
//! ```yaml
//! name: adherence-v1
//! coefficients: [1.2, 0.3, -0.8, 0.5]
//! bias: -4.5
//! ```
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use super::predictor::WeightVector;
use crate::core::error::Result as AdherenceResult;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,

    /// One coefficient per encoded feature, in encoder order
    pub coefficients: Vec<f64>,

    pub bias: f64,
}

fn default_model_name() -> String {
    "unnamed".to_string()
}

impl ModelConfig {
    /// Load and validate a model file
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read model file {}: {}", path, e))?;
        let model: ModelConfig = serde_yaml::from_str(&contents)?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> AdherenceResult<()> {
        WeightVector::new(self.coefficients.clone(), self.bias).map(|_| ())
    }

    pub fn into_weights(self) -> AdherenceResult<WeightVector> {
        WeightVector::new(self.coefficients, self.bias)
    }
}

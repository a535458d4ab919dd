use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{FEATURE_COUNT, FEATURE_NAMES},
};

/// Fitted standard scaler: `(x - mean) / scale` per feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            mean,
            scale,
        }
    }

    /// Identity transform, handy when features are already comparable
    pub fn identity() -> Self {
        Self::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT])
    }

    /// Checks the fitted parameters against the model column layout
    pub fn validate(&self) -> AppResult<()> {
        if self.feature_names != FEATURE_NAMES {
            return Err(AppError::ModelLoad(format!(
                "scaler was fitted on columns {:?}",
                self.feature_names
            )));
        }
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(AppError::ModelLoad(format!(
                "scaler has {} means and {} scales, expected {}",
                self.mean.len(),
                self.scale.len(),
                FEATURE_COUNT
            )));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(AppError::ModelLoad(
                "scaler parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Maps a raw feature vector into the scaled coordinate system
    pub fn transform(&self, features: &[f64]) -> AppResult<Vec<f64>> {
        if features.len() != self.mean.len() {
            return Err(AppError::SchemaMismatch(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                features.len()
            )));
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Zero-variance columns are stored with a zero scale
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

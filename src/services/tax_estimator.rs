use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{FinancialProfile, FEATURE_COUNT, FEATURE_NAMES},
};

/// Pre-fitted regression model mapping a feature vector to annual tax
#[cfg_attr(test, mockall::automock)]
pub trait TaxRegressor: Send + Sync {
    /// Number of features the model was trained on
    fn n_features(&self) -> usize;

    /// Predicts the annual tax for one feature vector
    fn predict(&self, features: &[f64]) -> AppResult<f64>;

    /// Model family name for logging and metadata
    fn kind(&self) -> &'static str;
}

/// Ordinary least squares model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl TaxRegressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f64]) -> AppResult<f64> {
        check_width(self.n_features(), features)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(dot + self.intercept)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// A node of a regression tree
///
/// Split nodes send a sample left when `x[feature] <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Checks that every split points at existing nodes and features
    pub fn validate(&self, n_features: usize) -> AppResult<()> {
        if self.nodes.is_empty() {
            return Err(AppError::ModelLoad("tree has no nodes".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= n_features {
                    return Err(AppError::ModelLoad(format!(
                        "node {} splits on unknown feature {}",
                        i, feature
                    )));
                }
                if !threshold.is_finite() {
                    return Err(AppError::ModelLoad(format!(
                        "node {} has a non-finite threshold",
                        i
                    )));
                }
                // Children always come after their parent, which rules out cycles
                for child in [left, right] {
                    if *child <= i || *child >= self.nodes.len() {
                        return Err(AppError::ModelLoad(format!(
                            "node {} has invalid child {}",
                            i, child
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walks from the root to a leaf
    pub fn evaluate(&self, features: &[f64]) -> AppResult<f64> {
        let mut idx = 0usize;

        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).ok_or_else(|| {
                        AppError::SchemaMismatch(format!("tree reads missing feature {}", feature))
                    })?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(AppError::Internal(format!(
                        "tree walked to missing node {}",
                        idx
                    )))
                }
            }
        }
    }
}

/// Random forest regressor: the mean of its trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestRegressor {
    pub trees: Vec<RegressionTree>,
}

impl TaxRegressor for ForestRegressor {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, features: &[f64]) -> AppResult<f64> {
        check_width(self.n_features(), features)?;
        if self.trees.is_empty() {
            return Err(AppError::Internal("forest has no trees".to_string()));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }
}

fn check_width(expected: usize, features: &[f64]) -> AppResult<()> {
    if features.len() != expected {
        return Err(AppError::SchemaMismatch(format!(
            "model expects {} features, got {}",
            expected,
            features.len()
        )));
    }
    Ok(())
}

/// On-disk form of the tax model (`tax_estimator.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    Linear {
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        feature_names: Vec<String>,
        trees: Vec<RegressionTree>,
    },
}

impl RegressorArtifact {
    /// Validates the artifact and turns it into a usable regressor
    pub fn into_regressor(self) -> AppResult<Box<dyn TaxRegressor>> {
        let feature_names = match &self {
            RegressorArtifact::Linear { feature_names, .. }
            | RegressorArtifact::RandomForest { feature_names, .. } => feature_names,
        };
        if *feature_names != FEATURE_NAMES {
            return Err(AppError::ModelLoad(format!(
                "tax model was trained on columns {:?}",
                feature_names
            )));
        }

        match self {
            RegressorArtifact::Linear {
                coefficients,
                intercept,
                ..
            } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(AppError::ModelLoad(format!(
                        "linear tax model has {} coefficients, expected {}",
                        coefficients.len(),
                        FEATURE_COUNT
                    )));
                }
                Ok(Box::new(LinearRegressor {
                    coefficients,
                    intercept,
                }))
            }
            RegressorArtifact::RandomForest { trees, .. } => {
                if trees.is_empty() {
                    return Err(AppError::ModelLoad("random forest has no trees".to_string()));
                }
                for tree in &trees {
                    tree.validate(FEATURE_COUNT)?;
                }
                Ok(Box::new(ForestRegressor { trees }))
            }
        }
    }
}

/// Wraps the regressor with the all-zero profile guard
pub struct TaxEstimator {
    regressor: Box<dyn TaxRegressor>,
}

impl TaxEstimator {
    pub fn new(regressor: Box<dyn TaxRegressor>) -> Self {
        Self { regressor }
    }

    pub fn kind(&self) -> &'static str {
        self.regressor.kind()
    }

    /// Predicts annual tax for a profile
    ///
    /// An all-zero profile returns `0.0` without touching the model.
    pub fn estimate(&self, profile: &FinancialProfile) -> AppResult<f64> {
        if profile.is_empty() {
            return Ok(0.0);
        }

        let features = profile.feature_vector();
        if features.len() != self.regressor.n_features() {
            return Err(AppError::SchemaMismatch(format!(
                "{} model expects {} features, profile has {}",
                self.regressor.kind(),
                self.regressor.n_features(),
                features.len()
            )));
        }

        self.regressor.predict(&features)
    }
}

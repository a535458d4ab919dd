use std::{fs::File, io::BufReader, path::Path};

use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::ReferenceRow,
    services::{
        peers::{NeighborSettings, PeerIndex},
        scaler::StandardScaler,
        tax_estimator::{RegressorArtifact, TaxEstimator},
        TaxAdvisor,
    },
};

pub const TAX_MODEL_FILE: &str = "tax_estimator.json";
pub const SCALER_FILE: &str = "input_scaler.json";
pub const NEIGHBORS_FILE: &str = "cf_neighbors.json";
pub const REFERENCE_FILE: &str = "cf_reference.csv";

/// Pre-trained artifacts as read from the model directory
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub tax_model: RegressorArtifact,
    pub scaler: StandardScaler,
    pub neighbors: NeighborSettings,
    pub reference: Vec<ReferenceRow>,
}

impl ModelArtifacts {
    /// Reads every artifact from `dir`
    pub fn read_dir(dir: &Path) -> AppResult<Self> {
        Ok(Self {
            tax_model: read_json(&dir.join(TAX_MODEL_FILE))?,
            scaler: read_json(&dir.join(SCALER_FILE))?,
            neighbors: read_json(&dir.join(NEIGHBORS_FILE))?,
            reference: read_reference(&dir.join(REFERENCE_FILE))?,
        })
    }

    /// Validates the artifacts against each other and builds the advisor
    pub fn into_advisor(self, neighbor_count: Option<usize>) -> AppResult<TaxAdvisor> {
        self.scaler.validate()?;
        let regressor = self.tax_model.into_regressor()?;

        let mut peers = PeerIndex::build(self.scaler, self.reference, self.neighbors)
            .map_err(into_load_failure)?;
        if let Some(k) = neighbor_count {
            peers = peers.with_neighbor_count(k);
        }

        let settings = peers.settings();
        tracing::info!(
            regressor = regressor.kind(),
            reference_rows = peers.len(),
            n_neighbors = settings.n_neighbors,
            metric = ?settings.metric,
            "Model artifacts loaded"
        );

        Ok(TaxAdvisor::new(TaxEstimator::new(regressor), peers))
    }
}

/// Loads and validates the artifacts in `dir`
///
/// Every failure is reported as a model load failure.
pub fn load_advisor(dir: &Path, neighbor_count: Option<usize>) -> AppResult<TaxAdvisor> {
    tracing::info!(model_dir = %dir.display(), "Loading model artifacts");
    ModelArtifacts::read_dir(dir)
        .and_then(|artifacts| artifacts.into_advisor(neighbor_count))
        .map_err(into_load_failure)
}

fn into_load_failure(err: AppError) -> AppError {
    match err {
        AppError::ModelLoad(_) => err,
        other => AppError::ModelLoad(other.to_string()),
    }
}

fn with_path(path: &Path, err: AppError) -> AppError {
    AppError::ModelLoad(format!("{}: {}", path.display(), err))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let parse = || -> AppResult<T> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    };
    parse().map_err(|e| with_path(path, e))
}

fn read_reference(path: &Path) -> AppResult<Vec<ReferenceRow>> {
    let parse = || -> AppResult<Vec<ReferenceRow>> {
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<ReferenceRow>, csv::Error>>()?;

        if let Some(i) = rows
            .iter()
            .position(|r| r.total_deductions < 0.0 || r.total_investments < 0.0)
        {
            return Err(AppError::ModelLoad(format!(
                "row {} has negative outcome totals",
                i
            )));
        }
        Ok(rows)
    };
    parse().map_err(|e| with_path(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FinancialProfile, FEATURE_NAMES};
    use std::fs;

    fn write_artifacts(dir: &Path) {
        let names: Vec<&str> = FEATURE_NAMES.to_vec();
        let mut coefficients = vec![0.0; FEATURE_NAMES.len()];
        coefficients[1] = 0.5;

        fs::write(
            dir.join(TAX_MODEL_FILE),
            serde_json::json!({
                "kind": "linear",
                "feature_names": names,
                "coefficients": coefficients,
                "intercept": 0.0
            })
            .to_string(),
        )
        .unwrap();

        fs::write(
            dir.join(SCALER_FILE),
            serde_json::json!({
                "feature_names": names,
                "mean": vec![0.0; FEATURE_NAMES.len()],
                "scale": vec![1.0; FEATURE_NAMES.len()]
            })
            .to_string(),
        )
        .unwrap();

        fs::write(
            dir.join(NEIGHBORS_FILE),
            r#"{"n_neighbors": 2, "metric": "euclidean"}"#,
        )
        .unwrap();

        let header = format!("{},total_deductions,total_investments", names.join(","));
        let row = |income: u32, deductions: u32, investments: u32| {
            format!(
                "30,{},0,0,0,0,0,0,0,0,0,0,0,0,{},{}",
                income, deductions, investments
            )
        };
        let table = [
            header,
            row(100, 10, 20),
            row(200, 30, 40),
            row(900, 1000, 1000),
        ]
        .join("\n");
        fs::write(dir.join(REFERENCE_FILE), table).unwrap();
    }

    #[test]
    fn test_load_advisor_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());

        let advisor = load_advisor(dir.path(), None).unwrap();
        assert_eq!(advisor.peers().len(), 3);
        assert_eq!(advisor.peers().settings().n_neighbors, 2);
        assert_eq!(advisor.estimator().kind(), "linear");

        let profile = FinancialProfile {
            age: 30,
            total_income: 150.0,
            ..Default::default()
        };
        let result = advisor.predict(&profile).unwrap();
        assert_eq!(result.estimated_tax, 75.0);
        assert_eq!(result.recommended_deduction, 20.0);
        assert_eq!(result.recommended_investment, 30.0);
    }

    #[test]
    fn test_neighbor_count_override() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());

        let advisor = load_advisor(dir.path(), Some(3)).unwrap();
        assert_eq!(advisor.peers().settings().n_neighbors, 3);
    }

    #[test]
    fn test_missing_artifact_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();

        let err = load_advisor(dir.path(), None).err().unwrap();
        assert!(matches!(err, AppError::ModelLoad(_)));
    }

    #[test]
    fn test_corrupt_reference_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        fs::write(dir.path().join(REFERENCE_FILE), "age,total_income\n30,abc\n").unwrap();

        let err = load_advisor(dir.path(), None).err().unwrap();
        assert!(matches!(err, AppError::ModelLoad(_)));
    }

    #[test]
    fn test_empty_reference_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        let header = format!("{},total_deductions,total_investments", FEATURE_NAMES.join(","));
        fs::write(dir.path().join(REFERENCE_FILE), header).unwrap();

        let err = load_advisor(dir.path(), None).err().unwrap();
        assert!(matches!(err, AppError::ModelLoad(_)));
    }
}

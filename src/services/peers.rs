use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{FinancialProfile, ReferenceRecord, ReferenceRow, FEATURE_COUNT},
    services::scaler::StandardScaler,
};

/// Distance used to rank peers; must match the metric the index was fitted with
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// `sqrt(sum((a_i - b_i)^2))`
    #[default]
    Euclidean,
    /// `sum(|a_i - b_i|)`
    Manhattan,
    /// `(sum(|a_i - b_i|^p))^(1/p)`
    Minkowski(f64),
}

impl DistanceMetric {
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let pairs = a.iter().zip(b);
        match self {
            DistanceMetric::Euclidean => pairs
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => pairs.map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Minkowski(p) => pairs
                .map(|(x, y)| (x - y).abs().powf(*p))
                .sum::<f64>()
                .powf(1.0 / p),
        }
    }

    fn validate(&self) -> AppResult<()> {
        match self {
            DistanceMetric::Minkowski(p) if !p.is_finite() || *p < 1.0 => Err(
                AppError::ModelLoad(format!("minkowski power must be >= 1, got {}", p)),
            ),
            _ => Ok(()),
        }
    }
}

/// Neighbor index settings (`cf_neighbors.json`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborSettings {
    pub n_neighbors: usize,
    #[serde(default)]
    pub metric: DistanceMetric,
}

/// A reference peer selected for a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peer<'a> {
    /// Row position in the reference population
    pub index: usize,
    pub distance: f64,
    pub record: &'a ReferenceRecord,
}

/// Brute-force nearest-neighbor index over the scaled reference population
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct PeerIndex {
    scaler: StandardScaler,
    records: Vec<ReferenceRecord>,
    settings: NeighborSettings,
}

impl PeerIndex {
    /// Scales raw reference rows with `scaler` and indexes them
    ///
    /// Query vectors are scaled with the same scaler, so both sides share one
    /// coordinate system.
    pub fn build(
        scaler: StandardScaler,
        rows: Vec<ReferenceRow>,
        settings: NeighborSettings,
    ) -> AppResult<Self> {
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let scaled = scaler.transform(&row.raw_features())?;
            let features: [f64; FEATURE_COUNT] = scaled.try_into().map_err(|_| {
                AppError::ModelLoad(format!("reference row {} has the wrong width", i))
            })?;
            records.push(ReferenceRecord {
                features,
                total_deductions: row.total_deductions,
                total_investments: row.total_investments,
            });
        }
        Self::from_scaled(scaler, records, settings)
    }

    /// Indexes records whose features are already scaled
    pub fn from_scaled(
        scaler: StandardScaler,
        records: Vec<ReferenceRecord>,
        settings: NeighborSettings,
    ) -> AppResult<Self> {
        if records.is_empty() {
            return Err(AppError::ModelLoad(
                "reference population is empty".to_string(),
            ));
        }
        if settings.n_neighbors == 0 {
            return Err(AppError::ModelLoad(
                "n_neighbors must be at least 1".to_string(),
            ));
        }
        settings.metric.validate()?;

        Ok(Self {
            scaler,
            records,
            settings,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn settings(&self) -> NeighborSettings {
        self.settings
    }

    /// Replaces the neighbor count read from the artifact
    pub fn with_neighbor_count(mut self, n_neighbors: usize) -> Self {
        if n_neighbors > 0 {
            self.settings.n_neighbors = n_neighbors;
        }
        self
    }

    /// Peers for a profile using the configured neighbor count
    pub fn neighbors(&self, profile: &FinancialProfile) -> AppResult<Vec<Peer<'_>>> {
        self.find_peers(profile, self.settings.n_neighbors)
    }

    /// Returns up to `k` peers ordered by ascending distance
    ///
    /// Equal distances keep reference-population order. When the population is
    /// smaller than `k`, every record is returned.
    pub fn find_peers(&self, profile: &FinancialProfile, k: usize) -> AppResult<Vec<Peer<'_>>> {
        let query = self.scaler.transform(&profile.feature_vector())?;

        let mut ranked: Vec<(f64, usize)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (self.settings.metric.distance(&query, &record.features), i))
            .collect();

        // Stable sort keeps insertion order for ties
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(k);

        tracing::debug!(
            requested = k,
            found = ranked.len(),
            nearest = ranked.first().map(|(d, _)| *d),
            "Peer search completed"
        );

        Ok(ranked
            .into_iter()
            .map(|(distance, index)| Peer {
                index,
                distance,
                record: &self.records[index],
            })
            .collect())
    }
}

use crate::{
    error::AppResult,
    models::{DisplayAmounts, FinancialProfile, PredictionResult, RawInputs, TaxReport},
    services::{
        normalizer,
        peers::PeerIndex,
        recommendations::{self, DeductionTier, InvestmentTier},
        tax_estimator::TaxEstimator,
    },
};

/// Tax estimator and peer index loaded for the lifetime of the process
pub struct TaxAdvisor {
    estimator: TaxEstimator,
    peers: PeerIndex,
}

impl TaxAdvisor {
    pub fn new(estimator: TaxEstimator, peers: PeerIndex) -> Self {
        Self { estimator, peers }
    }

    pub fn estimator(&self) -> &TaxEstimator {
        &self.estimator
    }

    pub fn peers(&self) -> &PeerIndex {
        &self.peers
    }

    /// Estimates tax and peer-based recommendations for an annualized profile
    ///
    /// Profiles with no money in any field bypass both models and return zeros.
    pub fn predict(&self, profile: &FinancialProfile) -> AppResult<PredictionResult> {
        if profile.is_empty() {
            tracing::debug!(age = profile.age, "Empty profile, skipping models");
            return Ok(PredictionResult::default());
        }

        let estimated_tax = self.estimator.estimate(profile)?;
        let peers = self.peers.neighbors(profile)?;
        let (recommended_deduction, recommended_investment) = recommendations::aggregate(&peers);

        Ok(PredictionResult {
            estimated_tax,
            recommended_deduction,
            recommended_investment,
        })
    }

    /// Runs the full pipeline from raw form inputs to a rendered report
    pub fn optimize(&self, raw: &RawInputs) -> AppResult<TaxReport> {
        let profile = normalizer::normalize(raw);
        let result = self.predict(&profile)?;

        Ok(TaxReport {
            display: DisplayAmounts::from(&result),
            investment_advice: InvestmentTier::from_amount(result.recommended_investment).advice(),
            deduction_advice: DeductionTier::from_amount(result.recommended_deduction).advice(),
            result,
        })
    }
}

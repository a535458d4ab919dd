use serde::{Deserialize, Serialize};

use super::profile::FEATURE_COUNT;

/// One peer of the reference population
///
/// `features` are already scaled into the index coordinate system; the two
/// outcome totals stay in rupees and are only used for recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub features: [f64; FEATURE_COUNT],
    pub total_deductions: f64,
    pub total_investments: f64,
}

/// Raw reference table row as stored in `cf_reference.csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceRow {
    pub age: f64,
    pub total_income: f64,
    pub salary_income: f64,
    pub business_income: f64,
    pub capital_gains: f64,
    pub home_loan_interest: f64,
    pub education_loan_interest: f64,
    pub rent_paid: f64,
    pub mutual_funds: f64,
    pub fixed_deposits: f64,
    pub real_estate: f64,
    pub nps_contribution: f64,
    #[serde(rename = "section_80C")]
    pub section_80c: f64,
    #[serde(rename = "section_80D")]
    pub section_80d: f64,
    pub total_deductions: f64,
    pub total_investments: f64,
}

impl ReferenceRow {
    /// Unscaled features in `FEATURE_NAMES` order
    pub fn raw_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.total_income,
            self.salary_income,
            self.business_income,
            self.capital_gains,
            self.home_loan_interest,
            self.education_loan_interest,
            self.rent_paid,
            self.mutual_funds,
            self.fixed_deposits,
            self.real_estate,
            self.nps_contribution,
            self.section_80c,
            self.section_80d,
        ]
    }
}

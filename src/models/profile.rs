use serde::{Deserialize, Serialize};

/// Number of features consumed by every model
pub const FEATURE_COUNT: usize = 14;

/// Model input columns, in the order the models were trained on
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "total_income",
    "salary_income",
    "business_income",
    "capital_gains",
    "home_loan_interest",
    "education_loan_interest",
    "rent_paid",
    "mutual_funds",
    "fixed_deposits",
    "real_estate",
    "nps_contribution",
    "section_80C",
    "section_80D",
];

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 100;

/// Per-period values exactly as the user entered them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInputs {
    pub age: u32,
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
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            age: 30,
            total_income: 0.0,
            salary_income: 0.0,
            business_income: 0.0,
            capital_gains: 0.0,
            home_loan_interest: 0.0,
            education_loan_interest: 0.0,
            rent_paid: 0.0,
            mutual_funds: 0.0,
            fixed_deposits: 0.0,
            real_estate: 0.0,
            nps_contribution: 0.0,
            section_80c: 0.0,
            section_80d: 0.0,
        }
    }
}

impl RawInputs {
    /// Monetary inputs paired with their column names
    pub fn monetary_fields(&self) -> [(&'static str, f64); FEATURE_COUNT - 1] {
        [
            ("total_income", self.total_income),
            ("salary_income", self.salary_income),
            ("business_income", self.business_income),
            ("capital_gains", self.capital_gains),
            ("home_loan_interest", self.home_loan_interest),
            ("education_loan_interest", self.education_loan_interest),
            ("rent_paid", self.rent_paid),
            ("mutual_funds", self.mutual_funds),
            ("fixed_deposits", self.fixed_deposits),
            ("real_estate", self.real_estate),
            ("nps_contribution", self.nps_contribution),
            ("section_80C", self.section_80c),
            ("section_80D", self.section_80d),
        ]
    }
}

/// Annualized financial profile used as model input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub age: u32,
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
}

impl FinancialProfile {
    /// Feature vector in `FEATURE_NAMES` order
    pub fn feature_vector(&self) -> Vec<f64> {
        vec![
            f64::from(self.age),
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

    /// Sum of every monetary field; age is excluded
    pub fn monetary_total(&self) -> f64 {
        self.feature_vector().iter().skip(1).sum()
    }

    /// True when every monetary field is zero, which the models never saw in training
    pub fn is_empty(&self) -> bool {
        self.monetary_total() == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_follows_column_order() {
        let profile = FinancialProfile {
            age: 41,
            total_income: 1.0,
            section_80c: 12.0,
            section_80d: 13.0,
            ..Default::default()
        };
        let features = profile.feature_vector();
        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(features[0], 41.0);
        assert_eq!(features[1], 1.0);
        assert_eq!(features[12], 12.0);
        assert_eq!(features[13], 13.0);
    }

    #[test]
    fn test_monetary_total_excludes_age() {
        let profile = FinancialProfile {
            age: 99,
            ..Default::default()
        };
        assert_eq!(profile.monetary_total(), 0.0);
        assert!(profile.is_empty());

        let profile = FinancialProfile {
            age: 30,
            rent_paid: 0.01,
            ..Default::default()
        };
        assert!(!profile.is_empty());
    }

    #[test]
    fn test_raw_inputs_defaults_and_renames() {
        let raw: RawInputs = serde_json::from_str(r#"{"section_80C": 150.0}"#).unwrap();
        assert_eq!(raw.age, 30);
        assert_eq!(raw.section_80c, 150.0);
        assert_eq!(raw.total_income, 0.0);
    }

    #[test]
    fn test_monetary_field_names_match_columns() {
        let raw = RawInputs::default();
        let names: Vec<&str> = raw.monetary_fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, FEATURE_NAMES[1..].to_vec());
    }
}

use crate::models::{FinancialProfile, RawInputs};

/// Annualizes a single per-period amount, rounded to paise
///
/// Every monetary input is multiplied by 12 even though the form labels most
/// of them as yearly. The trained models decide which scale is correct, so
/// the conversion is kept as-is.
///
/// Halfway cases round to the even cent. Amounts too large to scale to cents
/// are returned unrounded.
pub fn to_yearly(value: f64) -> f64 {
    let yearly = value * 12.0;
    let cents = yearly * 100.0;
    if !cents.is_finite() {
        return yearly;
    }
    cents.round_ties_even() / 100.0
}

/// Converts raw form inputs into the annualized profile the models consume
///
/// `age` passes through untouched.
pub fn normalize(raw: &RawInputs) -> FinancialProfile {
    FinancialProfile {
        age: raw.age,
        total_income: to_yearly(raw.total_income),
        salary_income: to_yearly(raw.salary_income),
        business_income: to_yearly(raw.business_income),
        capital_gains: to_yearly(raw.capital_gains),
        home_loan_interest: to_yearly(raw.home_loan_interest),
        education_loan_interest: to_yearly(raw.education_loan_interest),
        rent_paid: to_yearly(raw.rent_paid),
        mutual_funds: to_yearly(raw.mutual_funds),
        fixed_deposits: to_yearly(raw.fixed_deposits),
        real_estate: to_yearly(raw.real_estate),
        nps_contribution: to_yearly(raw.nps_contribution),
        section_80c: to_yearly(raw.section_80c),
        section_80d: to_yearly(raw.section_80d),
    }
}

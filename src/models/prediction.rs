use serde::{Deserialize, Serialize};

/// Core output for one profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub estimated_tax: f64,
    /// Mean `total_deductions` across the nearest peers
    pub recommended_deduction: f64,
    /// Mean `total_investments` across the nearest peers
    pub recommended_investment: f64,
}

/// A piece of advice selected from a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub tier: String,
    pub heading: String,
    pub tip: String,
}

/// Amounts formatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayAmounts {
    pub estimated_tax: String,
    pub recommended_deduction: String,
    pub recommended_investment: String,
}

impl From<&PredictionResult> for DisplayAmounts {
    fn from(result: &PredictionResult) -> Self {
        Self {
            estimated_tax: format_rupees(result.estimated_tax),
            recommended_deduction: format_rupees(result.recommended_deduction),
            recommended_investment: format_rupees(result.recommended_investment),
        }
    }
}

/// Full response returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxReport {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub display: DisplayAmounts,
    pub investment_advice: Advice,
    pub deduction_advice: Advice,
}

/// Formats an amount as rupees with thousands separators, e.g. `₹1,234,567.89`
///
/// Negative amounts carry the sign after the symbol: `₹-25,000.00`.
pub fn format_rupees(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("₹{}{}.{}", sign, grouped, fraction)
}

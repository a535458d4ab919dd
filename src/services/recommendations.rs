use serde::{Deserialize, Serialize};

use crate::{models::Advice, services::peers::Peer};

pub const INVESTMENT_HEADING: &str = "Personalized Investment Suggestions";
pub const DEDUCTION_HEADING: &str = "Deduction Maximization Tips";

/// Averages the outcome totals of the selected peers
///
/// Returns `(recommended_deduction, recommended_investment)`; an empty peer set
/// yields zeros.
pub fn aggregate(peers: &[Peer<'_>]) -> (f64, f64) {
    if peers.is_empty() {
        return (0.0, 0.0);
    }

    let n = peers.len() as f64;
    let deductions: f64 = peers.iter().map(|p| p.record.total_deductions).sum();
    let investments: f64 = peers.iter().map(|p| p.record.total_investments).sum();

    (deductions / n, investments / n)
}

/// Investment advice buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentTier {
    /// Nothing recommended yet
    LowRiskStarter,
    /// Below ₹1,00,000
    Starter,
    /// ₹1,00,000 to ₹2,50,000 inclusive
    Diversify,
    /// Above ₹2,50,000
    Aggressive,
}

impl InvestmentTier {
    pub fn from_amount(amount: f64) -> Self {
        if amount == 0.0 {
            InvestmentTier::LowRiskStarter
        } else if amount < 100_000.0 {
            InvestmentTier::Starter
        } else if amount <= 250_000.0 {
            InvestmentTier::Diversify
        } else {
            InvestmentTier::Aggressive
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InvestmentTier::LowRiskStarter => "low_risk_starter",
            InvestmentTier::Starter => "starter",
            InvestmentTier::Diversify => "diversify",
            InvestmentTier::Aggressive => "aggressive",
        }
    }

    pub fn tip(&self) -> &'static str {
        match self {
            InvestmentTier::LowRiskStarter => "Consider starting with ELSS Mutual Funds or Tax-saving Fixed Deposits (FDs) for low-risk options.",
            InvestmentTier::Starter => "Start with ELSS Mutual Funds or Tax-saving FDs for safe and low-minimum investment options.",
            InvestmentTier::Diversify => "Diversify: Allocate into NPS, Mutual Funds, and optionally start a Real Estate SIP.",
            InvestmentTier::Aggressive => "Go big: Combine NPS, Real Estate, and ELSS. Aim to use the ₹1.5L 80C limit and invest beyond for long-term growth.",
        }
    }

    pub fn advice(&self) -> Advice {
        Advice {
            tier: self.name().to_string(),
            heading: INVESTMENT_HEADING.to_string(),
            tip: self.tip().to_string(),
        }
    }
}

/// Deduction advice buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionTier {
    /// Nothing recommended yet
    Start80C,
    /// Below ₹1,00,000
    Basic80C,
    /// ₹1,00,000 to ₹2,00,000 inclusive
    Expanded,
    /// Above ₹2,00,000
    Niche,
}

impl DeductionTier {
    pub fn from_amount(amount: f64) -> Self {
        if amount == 0.0 {
            DeductionTier::Start80C
        } else if amount < 100_000.0 {
            DeductionTier::Basic80C
        } else if amount <= 200_000.0 {
            DeductionTier::Expanded
        } else {
            DeductionTier::Niche
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeductionTier::Start80C => "start_80c",
            DeductionTier::Basic80C => "basic_80c",
            DeductionTier::Expanded => "expanded",
            DeductionTier::Niche => "niche",
        }
    }

    pub fn tip(&self) -> &'static str {
        match self {
            DeductionTier::Start80C => {
                "Start with Section 80C investments like LIC, ELSS, PPF, and Tuition Fees."
            }
            DeductionTier::Basic80C => {
                "Use Section 80C instruments like LIC, ELSS, PPF, and Tuition Fees."
            }
            DeductionTier::Expanded => {
                "Include health insurance (80D), education/home loan interest, and NPS contributions."
            }
            DeductionTier::Niche => "Great job! You've covered most deductions. Check niche ones like 80E (education) or 80G (donations).",
        }
    }

    pub fn advice(&self) -> Advice {
        Advice {
            tier: self.name().to_string(),
            heading: DEDUCTION_HEADING.to_string(),
            tip: self.tip().to_string(),
        }
    }
}

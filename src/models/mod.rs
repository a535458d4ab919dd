mod prediction;
mod profile;
mod reference;

pub use prediction::{format_rupees, Advice, DisplayAmounts, PredictionResult, TaxReport};
pub use profile::{
    FinancialProfile, RawInputs, FEATURE_COUNT, FEATURE_NAMES, MAX_AGE, MIN_AGE,
};
pub use reference::{ReferenceRecord, ReferenceRow};

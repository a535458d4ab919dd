pub mod normalizer;
pub mod optimizer;
pub mod peers;
pub mod recommendations;
pub mod scaler;
pub mod tax_estimator;

pub use optimizer::TaxAdvisor;

pub mod loader;

pub use loader::{
    load_advisor, ModelArtifacts, NEIGHBORS_FILE, REFERENCE_FILE, SCALER_FILE, TAX_MODEL_FILE,
};

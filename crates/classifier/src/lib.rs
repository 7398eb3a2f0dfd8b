pub mod backend;
pub mod config;
pub mod decision;
pub mod diagnostics;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod labels;
pub mod preprocessing;
pub mod service;
pub mod weights;

// Re-export commonly used types for convenience
pub use backend::{InferenceBackend, RawModelOutput};
pub use config::{ClassifierConfig, OutputLayout};
pub use decision::{Decision, DecisionEngine};
pub use error::ClassifyError;
pub use extractor::{CategoryScore, ScoreExtractor};
pub use service::ClassifierService;

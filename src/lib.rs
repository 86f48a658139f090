pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AnalyzerConfig;

pub use adapters::LocalStorage;
pub use app::pipelines::FollowPipeline;
pub use core::engine::{AnalysisEngine, AnalysisReport};
pub use core::extractor::{extract_identifier, extract_identifiers, IdentifierExtractor};
pub use core::reconcile::{reconcile, reconcile_values};
pub use domain::model::{CanonicalList, Identifier, ReconciliationResult};
pub use utils::error::{AnalyzerError, Result};

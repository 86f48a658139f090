pub mod engine;
pub mod extractor;
pub mod normalize;
pub mod reconcile;
pub mod strategy;

pub use crate::domain::model::{CanonicalList, Identifier, LoadedLists, ReconciliationResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

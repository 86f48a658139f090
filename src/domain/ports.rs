use crate::domain::model::{AnalysisOutcome, InputMode, LoadedLists};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Removing a file that does not exist is not an error.
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_mode(&self) -> InputMode;
    fn followers_file(&self) -> Option<&str>;
    fn following_file(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress_output(&self) -> bool;
    /// `None` disables session persistence.
    fn state_file(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<LoadedLists>;
    async fn transform(&self, lists: LoadedLists) -> Result<AnalysisOutcome>;
    async fn load(&self, outcome: AnalysisOutcome) -> Result<String>;
}

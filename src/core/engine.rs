use crate::core::Pipeline;
use crate::domain::model::ResultSummary;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub output_path: String,
    pub followers: usize,
    pub following: usize,
    pub summary: ResultSummary,
}

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<AnalysisReport> {
        tracing::info!("Starting follow analysis...");

        // Extract
        tracing::info!("Loading username lists...");
        let lists = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} followers and {} following",
            lists.followers.len(),
            lists.following.len()
        );

        // Transform
        let outcome = self.pipeline.transform(lists).await?;
        let summary = outcome.result.summary();
        let followers = outcome.lists.followers.len();
        let following = outcome.lists.following.len();

        // Load
        tracing::info!("Writing results...");
        let output_path = self.pipeline.load(outcome).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(AnalysisReport {
            output_path,
            followers,
            following,
            summary,
        })
    }
}

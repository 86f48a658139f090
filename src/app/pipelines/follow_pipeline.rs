use crate::app::demo;
use crate::app::session::SessionStore;
use crate::core::extractor::IdentifierExtractor;
use crate::core::reconcile::reconcile;
use crate::core::{CanonicalList, ConfigProvider, LoadedLists, Pipeline, Storage};
use crate::domain::model::{
    AnalysisOutcome, InputMode, ListSide, ReconciliationResult, ResultSummary,
};
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{validate_export_file, validate_required_field};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const CSV_HEADER: [&str; 3] = ["category", "username", "profile_url"];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultsDocument<'a> {
    #[serde(flatten)]
    results: &'a ReconciliationResult,
    counts: ResultSummary,
    followers: usize,
    following: usize,
    generated_at: chrono::DateTime<chrono::Utc>,
}

/// Reads the two exports, reconciles them and writes the result files.
///
/// `source` resolves the export paths; `sink` is rooted at the output
/// directory and also holds the saved session.
pub struct FollowPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    extractor: IdentifierExtractor,
}

impl<S: Storage, C: ConfigProvider> FollowPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
            extractor: IdentifierExtractor::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: IdentifierExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    fn session(&self) -> Option<SessionStore<'_, S>> {
        self.config
            .state_file()
            .map(|path| SessionStore::new(&self.sink, path))
    }

    /// Reads one export and reduces it to a canonical list.
    ///
    /// Unlike the core extractor this fails loudly: a bad extension, broken
    /// JSON or an export without usernames is reported against the file.
    pub async fn read_export(&self, path: &str, side: ListSide) -> Result<CanonicalList> {
        validate_export_file(path)?;

        let data = self.source.read_file(path).await?;
        let raw: serde_json::Value =
            serde_json::from_slice(&data).map_err(|source| AnalyzerError::InvalidJson {
                file: path.to_string(),
                source,
            })?;

        let report = self.extractor.extract_with_report(&raw);
        tracing::debug!(
            "{}: {} records, {} skipped, {} duplicates",
            side,
            report.records_seen,
            report.records_skipped,
            report.duplicates_removed()
        );

        let list = report.into_result(path)?;
        tracing::info!("👥 {}: {} usernames loaded from {}", side, list.len(), path);
        Ok(list)
    }

    async fn read_exports(&self) -> Result<LoadedLists> {
        let followers_file = self.config.followers_file();
        let following_file = self.config.following_file();
        let followers_file = validate_required_field("followers", &followers_file)?;
        let following_file = validate_required_field("following", &following_file)?;

        Ok(LoadedLists {
            followers: self.read_export(followers_file, ListSide::Followers).await?,
            following: self.read_export(following_file, ListSide::Following).await?,
        })
    }

    fn csv_bytes(&self, result: &ReconciliationResult, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER)?;
        for (category, list) in result.categories() {
            for identifier in list {
                let url = identifier.profile_url();
                writer.write_record([category, identifier.as_str(), url.as_str()])?;
            }
        }

        writer
            .into_inner()
            .map_err(|e| AnalyzerError::IoError(e.into_error()))
    }

    fn render_outputs(&self, outcome: &AnalysisOutcome) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        for format in self.config.output_formats() {
            match format.as_str() {
                "json" => {
                    let document = ResultsDocument {
                        results: &outcome.result,
                        counts: outcome.result.summary(),
                        followers: outcome.lists.followers.len(),
                        following: outcome.lists.following.len(),
                        generated_at: chrono::Utc::now(),
                    };
                    files.push((
                        "results.json".to_string(),
                        serde_json::to_vec_pretty(&document)?,
                    ));
                }
                "csv" => files.push(("results.csv".to_string(), self.csv_bytes(&outcome.result, b',')?)),
                "tsv" => files.push(("results.tsv".to_string(), self.csv_bytes(&outcome.result, b'\t')?)),
                other => {
                    return Err(AnalyzerError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    })
                }
            }
        }

        Ok(files)
    }

    fn zip_bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for (name, data) in files {
            zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
            zip.write_all(data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FollowPipeline<S, C> {
    async fn extract(&self) -> Result<LoadedLists> {
        match self.config.input_mode() {
            InputMode::Files => self.read_exports().await,
            InputMode::Demo => {
                tracing::info!("🎲 Using built-in sample data");
                Ok(demo::sample_lists())
            }
            InputMode::SavedState => {
                let session = self.session().ok_or_else(|| AnalyzerError::ConfigError {
                    message: "saved-state input needs a state file".to_string(),
                })?;
                tracing::info!("📂 Restoring lists from {}", session.path());
                session.load_lists().await
            }
        }
    }

    async fn transform(&self, lists: LoadedLists) -> Result<AnalysisOutcome> {
        for side in [ListSide::Followers, ListSide::Following] {
            if lists.side(side).is_empty() {
                return Err(AnalyzerError::IncompleteInput { missing: side });
            }
        }

        let result = reconcile(&lists.following, &lists.followers);
        Ok(AnalysisOutcome { lists, result })
    }

    async fn load(&self, outcome: AnalysisOutcome) -> Result<String> {
        let files = self.render_outputs(&outcome)?;

        let output_path = if self.config.compress_output() {
            let name = format!(
                "follow-analysis-{}.zip",
                chrono::Utc::now().format("%Y-%m-%d")
            );
            let bundle = Self::zip_bundle(&files)?;
            tracing::debug!("Writing {} ({} bytes)", name, bundle.len());
            self.sink.write_file(&name, &bundle).await?;
            format!("{}/{}", self.config.output_path(), name)
        } else {
            for (name, data) in &files {
                tracing::debug!("Writing {} ({} bytes)", name, data.len());
                self.sink.write_file(name, data).await?;
            }
            self.config.output_path().to_string()
        };

        // 儲存失敗不影響已輸出的結果
        if let Some(session) = self.session() {
            if let Err(e) = session.save(&outcome.lists, &outcome.result).await {
                tracing::warn!("Could not save session to {}: {}", session.path(), e);
            }
        }

        Ok(output_path)
    }
}

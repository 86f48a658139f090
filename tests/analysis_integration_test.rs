use anyhow::Result;
use follow_analyzer::app::session::SessionStore;
use follow_analyzer::{AnalysisEngine, AnalyzerConfig, AnalyzerError, FollowPipeline, LocalStorage};
use serde_json::json;
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    root: String,
}

impl Workspace {
    fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let root = dir.path().to_str().unwrap().replace('\\', "/");
        Ok(Self { _dir: dir, root })
    }

    fn path(&self, name: &str) -> String {
        format!("{}/{}", self.root, name)
    }

    async fn write_json(&self, name: &str, value: serde_json::Value) -> Result<String> {
        let path = self.path(name);
        tokio::fs::write(&path, serde_json::to_vec_pretty(&value)?).await?;
        Ok(path)
    }

    fn config(&self, extra: &str) -> Result<AnalyzerConfig> {
        let content = format!(
            r#"
[analysis]
name = "integration"

[input]
followers = "{followers}"
following = "{following}"

[output]
path = "{output}"
formats = ["json", "csv"]
{extra}
"#,
            followers = self.path("followers_1.json"),
            following = self.path("following.json"),
            output = self.path("out"),
            extra = extra,
        );
        Ok(AnalyzerConfig::from_toml_str(&content)?)
    }

    fn pipeline(&self, config: AnalyzerConfig) -> FollowPipeline<LocalStorage, AnalyzerConfig> {
        FollowPipeline::new(
            LocalStorage::current_dir(),
            LocalStorage::new(self.path("out")),
            config,
        )
    }
}

async fn seed_exports(ws: &Workspace) -> Result<()> {
    ws.write_json(
        "followers_1.json",
        json!([
            {"string_list_data": [{"href": "https://www.instagram.com/ali_dev", "value": "ali_dev", "timestamp": 1}]},
            {"string_list_data": [{"href": "https://www.instagram.com/fan_only_1", "value": "Fan_Only_1", "timestamp": 2}]},
            {"string_list_data": [{"href": "https://www.instagram.com/ali_dev", "value": "ALI_DEV", "timestamp": 3}]}
        ]),
    )
    .await?;
    ws.write_json(
        "following.json",
        json!({"relationships_following": [
            {"title": "ali_dev", "string_list_data": [{"href": "https://www.instagram.com/ali_dev", "timestamp": 1}]},
            {"title": "unfollower_1", "string_list_data": [{"href": "https://www.instagram.com/unfollower_1", "timestamp": 2}]}
        ]}),
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_analysis() -> Result<()> {
    let ws = Workspace::new()?;
    seed_exports(&ws).await?;

    let engine = AnalysisEngine::new(ws.pipeline(ws.config("")?));
    let report = engine.run().await?;

    assert_eq!(report.followers, 2);
    assert_eq!(report.following, 2);
    assert_eq!(report.summary.not_following_back, 1);
    assert_eq!(report.summary.mutual, 1);
    assert_eq!(report.summary.fans, 1);
    assert_eq!(report.output_path, ws.path("out"));

    let results: serde_json::Value =
        serde_json::from_slice(&tokio::fs::read(ws.path("out/results.json")).await?)?;
    assert_eq!(results["notFollowingBack"], json!(["unfollower_1"]));
    assert_eq!(results["mutual"], json!(["ali_dev"]));
    assert_eq!(results["fans"], json!(["fan_only_1"]));

    let mut reader = csv::Reader::from_path(ws.path("out/results.csv"))?;
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "not_following_back");
    assert_eq!(&rows[0][2], "https://instagram.com/unfollower_1");

    let state: serde_json::Value = serde_json::from_slice(
        &tokio::fs::read(ws.path("out/follow-analyzer-state.json")).await?,
    )?;
    assert_eq!(state["followers"], json!(["ali_dev", "fan_only_1"]));
    assert!(state["savedAt"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_rerun_from_saved_state_skips_exports() -> Result<()> {
    let ws = Workspace::new()?;
    seed_exports(&ws).await?;
    AnalysisEngine::new(ws.pipeline(ws.config("")?)).run().await?;

    tokio::fs::remove_file(ws.path("followers_1.json")).await?;
    tokio::fs::remove_file(ws.path("following.json")).await?;

    let mut config = ws.config("")?;
    config.input.mode = Some(follow_analyzer::domain::model::InputMode::SavedState);
    let report = AnalysisEngine::new(ws.pipeline(config)).run().await?;
    assert_eq!(report.summary.mutual, 1);
    assert_eq!(report.summary.fans, 1);

    let sink = LocalStorage::new(ws.path("out"));
    SessionStore::new(&sink, "follow-analyzer-state.json").clear().await?;

    let mut config = ws.config("")?;
    config.input.mode = Some(follow_analyzer::domain::model::InputMode::SavedState);
    let err = AnalysisEngine::new(ws.pipeline(config)).run().await.unwrap_err();
    assert!(matches!(err, AnalyzerError::StateNotFound { .. }));

    Ok(())
}

#[tokio::test]
async fn test_compressed_bundle() -> Result<()> {
    let ws = Workspace::new()?;
    seed_exports(&ws).await?;

    let config = ws.config("\n[output.compression]\nenabled = true\n\n[state]\nenabled = false\n")?;
    let report = AnalysisEngine::new(ws.pipeline(config)).run().await?;
    assert!(report.output_path.ends_with(".zip"));

    let bundle = tokio::fs::read(&report.output_path).await?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bundle))?;
    let mut file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_string()))
        .collect::<std::result::Result<_, _>>()?;
    file_names.sort();
    assert_eq!(file_names, vec!["results.csv", "results.json"]);

    assert!(!std::path::Path::new(&ws.path("out/follow-analyzer-state.json")).exists());
    Ok(())
}

#[tokio::test]
async fn test_export_without_usernames_fails_with_file_name() -> Result<()> {
    let ws = Workspace::new()?;
    seed_exports(&ws).await?;
    ws.write_json("followers_1.json", json!({"media": [{"id": 1}, {"id": 2}]}))
        .await?;

    let err = AnalysisEngine::new(ws.pipeline(ws.config("")?))
        .run()
        .await
        .unwrap_err();
    match err {
        AnalyzerError::NoIdentifiersExtracted { file, records } => {
            assert!(file.ends_with("followers_1.json"));
            assert_eq!(records, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!std::path::Path::new(&ws.path("out/results.json")).exists());

    Ok(())
}

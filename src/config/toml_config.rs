use crate::core::ConfigProvider;
use crate::domain::model::InputMode;
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub analysis: Option<AnalysisInfo>,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub state: Option<StateConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub mode: Option<InputMode>,
    pub followers: Option<String>,
    pub following: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    pub enabled: bool,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl AnalyzerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalyzerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EXPORT_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_output_formats("output.formats", &self.output.formats)?;

        if let Some(name) = self.analysis.as_ref().map(|a| a.name.as_str()) {
            validation::validate_non_empty_string("analysis.name", name)?;
        }

        if let Some(file) = self.state.as_ref().and_then(|s| s.file.as_deref()) {
            validation::validate_path("state.file", file)?;
        }

        match self.input_mode() {
            InputMode::Files => {
                let followers =
                    validation::validate_required_field("input.followers", &self.input.followers)?;
                let following =
                    validation::validate_required_field("input.following", &self.input.following)?;
                validation::validate_export_file(followers)?;
                validation::validate_export_file(following)?;
            }
            InputMode::SavedState if self.state_file().is_none() => {
                return Err(AnalyzerError::ConfigValidationError {
                    field: "input.mode".to_string(),
                    message: "saved_state mode needs [state] enabled = true".to_string(),
                });
            }
            InputMode::SavedState | InputMode::Demo => {}
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        self.analysis
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or("follow-analysis")
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for AnalyzerConfig {
    fn input_mode(&self) -> InputMode {
        self.input.mode.unwrap_or_default()
    }

    fn followers_file(&self) -> Option<&str> {
        self.input.followers.as_deref()
    }

    fn following_file(&self) -> Option<&str> {
        self.input.following.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn compress_output(&self) -> bool {
        self.output
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    fn state_file(&self) -> Option<&str> {
        // 未設定 [state] 時預設啟用
        match &self.state {
            None => Some(crate::config::DEFAULT_STATE_FILE),
            Some(state) if state.enabled => Some(
                state
                    .file
                    .as_deref()
                    .unwrap_or(crate::config::DEFAULT_STATE_FILE),
            ),
            Some(_) => None,
        }
    }
}

impl Validate for AnalyzerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

use crate::config::DEFAULT_STATE_FILE;
use crate::core::ConfigProvider;
use crate::domain::model::InputMode;
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "follow-analyzer")]
#[command(about = "Compare followers/following exports: who doesn't follow back, mutuals and fans")]
pub struct CliConfig {
    /// Followers export, e.g. followers_1.json
    #[arg(long)]
    pub followers: Option<String>,

    /// Following export, e.g. following.json
    #[arg(long)]
    pub following: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json,csv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle all outputs into a single zip archive")]
    pub compress: bool,

    /// Session file, relative to the output path
    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    pub state_file: String,

    #[arg(long, help = "Do not read or write the saved session")]
    pub no_state: bool,

    #[arg(long, conflicts_with_all = ["from_state", "followers", "following"], help = "Analyze built-in sample data")]
    pub demo: bool,

    #[arg(long, conflicts_with_all = ["followers", "following"], help = "Re-analyze the lists from the saved session")]
    pub from_state: bool,

    #[arg(long, help = "Delete the saved session and exit")]
    pub clear: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn input_mode(&self) -> InputMode {
        if self.demo {
            InputMode::Demo
        } else if self.from_state {
            InputMode::SavedState
        } else {
            InputMode::Files
        }
    }

    fn followers_file(&self) -> Option<&str> {
        self.followers.as_deref()
    }

    fn following_file(&self) -> Option<&str> {
        self.following.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compress_output(&self) -> bool {
        self.compress
    }

    fn state_file(&self) -> Option<&str> {
        (!self.no_state).then_some(self.state_file.as_str())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_path", &self.output_path)?;

        if self.clear {
            return Ok(());
        }

        validation::validate_output_formats("formats", &self.formats)?;
        if !self.no_state {
            validation::validate_path("state_file", &self.state_file)?;
        }

        match self.input_mode() {
            InputMode::Files => {
                let followers = validation::validate_required_field("followers", &self.followers)?;
                let following = validation::validate_required_field("following", &self.following)?;
                validation::validate_export_file(followers)?;
                validation::validate_export_file(following)?;
            }
            InputMode::SavedState if self.no_state => {
                return Err(AnalyzerError::ConfigValidationError {
                    field: "from_state".to_string(),
                    message: "--from-state cannot be combined with --no-state".to_string(),
                });
            }
            InputMode::SavedState | InputMode::Demo => {}
        }

        Ok(())
    }
}

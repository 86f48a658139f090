#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::AnalyzerConfig;

/// Session file name, relative to the output directory.
pub const DEFAULT_STATE_FILE: &str = "follow-analyzer-state.json";

use clap::Parser;
use follow_analyzer::core::extractor::{IdentifierExtractor, ShapePreview};
use follow_analyzer::core::ConfigProvider;
use follow_analyzer::domain::model::InputMode;
use follow_analyzer::utils::error::ErrorSeverity;
use follow_analyzer::utils::{logger, validation::Validate};
use follow_analyzer::{AnalysisEngine, AnalyzerConfig, FollowPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-analyzer")]
#[command(about = "Follow analysis driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "follow-analyzer.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override compression setting from config
    #[arg(long)]
    compress: Option<bool>,

    /// Dry run - inspect the exports without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match AnalyzerConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based follow analysis '{}'", config.name());
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(enabled) = args.compress {
        config.output.compression = Some(follow_analyzer::config::toml_config::CompressionConfig { enabled });
        tracing::info!("🔧 Compression overridden to: {}", enabled);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = FollowPipeline::new(LocalStorage::current_dir(), sink, config);
    let engine = AnalysisEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Analysis completed successfully!");
            println!("✅ Analysis completed successfully!");
            println!(
                "💔 {} not following back | 🤝 {} mutual | 🌟 {} fans",
                report.summary.not_following_back, report.summary.mutual, report.summary.fans
            );
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &AnalyzerConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("   Input mode: {:?}", config.input_mode());
    if let Some(followers) = config.followers_file() {
        tracing::info!("   Followers export: {}", followers);
    }
    if let Some(following) = config.following_file() {
        tracing::info!("   Following export: {}", following);
    }
    tracing::info!("   Output: {} ({})", config.output_path(), config.output_formats().join(", "));
    tracing::info!("   Compression: {}", config.compress_output());
    tracing::info!("   Session file: {}", config.state_file().unwrap_or("disabled"));
}

/// Parses each export and reports what the extractor would find.
async fn perform_dry_run(config: &AnalyzerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.input_mode() != InputMode::Files {
        println!("🔍 Input mode {:?} reads no export files", config.input_mode());
        return Ok(());
    }

    let extractor = IdentifierExtractor::default();
    for path in [config.followers_file(), config.following_file()]
        .into_iter()
        .flatten()
    {
        let data = tokio::fs::read(path).await?;
        let raw: serde_json::Value = serde_json::from_slice(&data)?;
        let report = extractor.extract_with_report(&raw);

        println!("🔍 {}", path);
        println!("   shape: {}", ShapePreview::of(&raw));
        println!("   collection: {:?}", report.source);
        println!(
            "   records: {} ({} skipped, {} duplicates) -> {} usernames",
            report.records_seen,
            report.records_skipped,
            report.duplicates_removed(),
            report.identifiers.len()
        );
    }

    Ok(())
}

use clap::Parser;
use follow_analyzer::app::session::SessionStore;
use follow_analyzer::core::ConfigProvider;
use follow_analyzer::utils::error::{AnalyzerError, ErrorSeverity};
use follow_analyzer::utils::{logger, validation::Validate};
use follow_analyzer::{AnalysisEngine, AnalysisReport, CliConfig, FollowPipeline, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting follow-analyzer CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let sink = LocalStorage::new(config.output_path.clone());

    if config.clear {
        if let Some(state_file) = config.state_file() {
            SessionStore::new(&sink, state_file).clear().await?;
        }
        println!("🧹 Saved session cleared");
        return Ok(());
    }

    let pipeline = FollowPipeline::new(LocalStorage::current_dir(), sink, config);
    let engine = AnalysisEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => print_report(&report),
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("✅ Analysis complete");
    println!(
        "   👥 {} followers, 👤 {} following",
        report.followers, report.following
    );
    println!("   💔 not following back: {}", report.summary.not_following_back);
    println!("   🤝 mutual:             {}", report.summary.mutual);
    println!("   🌟 fans:               {}", report.summary.fans);
    println!("📁 Output saved to: {}", report.output_path);
}

fn exit_with(e: AnalyzerError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
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

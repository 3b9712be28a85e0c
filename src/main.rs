use clap::Parser;
use course_insights::config::settings::AnalysisSettings;
use course_insights::core::ConfigProvider;
use course_insights::utils::error::AnalysisError;
use course_insights::utils::{logger, validation::Validate};
use course_insights::{CliConfig, CoursePipeline, EtlEngine, LocalStorage, TomlConfig};

fn fail(error: AnalysisError) -> ! {
    tracing::error!(
        "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 Suggestion: {}", error.recovery_suggestion());
    std::process::exit(error.exit_code());
}

fn log_settings(config: &impl ConfigProvider) {
    let AnalysisSettings {
        outlier_rows,
        top_features,
        histogram_bins,
        competitor,
    } = config.analysis();
    tracing::info!("📁 Dataset: {} (sheet '{}')", config.dataset_path(), config.sheet_name());
    tracing::info!("📁 Output: {} (archive: {})", config.output_path(), config.archive());
    tracing::debug!(
        "Outlier rows {:?}, top {} features, {} histogram bins, competitor '{}' at {:.2}/h",
        outlier_rows,
        top_features,
        histogram_bins,
        competitor.name,
        competitor.hourly_rate()
    );
}

async fn run<C: ConfigProvider + Validate>(config: C, dry_run: bool) {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    log_settings(&config);

    let input = LocalStorage::new(".".to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let pipeline = CoursePipeline::new(input, output, config);
    let engine = EtlEngine::new(pipeline).dry_run(dry_run);

    match engine.run().await {
        Ok(outcome) => {
            tracing::info!("✅ Analysis completed successfully!");
            if let Some(path) = outcome.output_path {
                println!("✅ Analysis completed successfully!");
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => fail(e),
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting course-insights");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config, cli.dry_run).await,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => {
            let dry_run = cli.dry_run;
            run(cli, dry_run).await
        }
    }
}

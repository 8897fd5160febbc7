use clap::Parser;
use cpp_merge::core::ConfigProvider;
use cpp_merge::utils::{logger, validation::Validate};
use cpp_merge::{AmalgamationPipeline, CliConfig, LocalStorage, MergeEngine, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting cpp-merge");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match &config.config {
        Some(config_path) => {
            let toml_config = match TomlConfig::from_file(config_path) {
                Ok(toml_config) => toml_config,
                Err(e) => {
                    tracing::error!("❌ Failed to load config file '{}': {}", config_path, e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    std::process::exit(2);
                }
            };
            run_merge(toml_config).await;
        }
        None => run_merge(config).await,
    }

    Ok(())
}

async fn run_merge<C>(config: C)
where
    C: ConfigProvider + Validate,
{
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(2);
    }

    let storage = LocalStorage::new(config.project_root().to_string());
    let pipeline = AmalgamationPipeline::new(storage, config);
    let engine = MergeEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Merge completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Merge completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Merge failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                cpp_merge::utils::error::ErrorSeverity::Low => 0,
                cpp_merge::utils::error::ErrorSeverity::Medium => 2,
                cpp_merge::utils::error::ErrorSeverity::High => 1,
                cpp_merge::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

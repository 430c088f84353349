use anyhow::Context;
use clap::Parser;
use mexico_miles::core::ConfigProvider;
use mexico_miles::utils::logger::{self, LogFormat};
use mexico_miles::utils::validation::Validate;
use mexico_miles::{
    CliConfig, EtlEngine, EtlError, LocalStorage, MileagePipeline, RoutesClient, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_flag(cli.json_logs), cli.verbose)?;

    tracing::info!("Starting mexico-miles");
    tracing::debug!("CLI config: {:?}", cli);

    let outcome = match cli.config.clone() {
        Some(path) => {
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load configuration from {}", path))?;
            run(config).await
        }
        None => run(cli).await,
    };

    match outcome {
        Ok(output_path) => {
            println!("✅ Mexico miles written to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Run failed: {} (Severity: {:?})", e, e.severity());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<String, EtlError> {
    config.validate()?;

    let provider = Arc::new(RoutesClient::new(config.routes_config())?);
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = MileagePipeline::new(storage, config, provider);

    EtlEngine::new(pipeline).run().await
}

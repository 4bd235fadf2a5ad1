// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use image_moderation_gateway::{
    api::start_server,
    app::build_state,
    cli::Cli,
    config::GatewayConfig,
    logging::{init_logging, LogFormat},
    version,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    init_logging(cli.log_format.unwrap_or_else(LogFormat::from_env));
    info!("Starting {}", version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));

    let mut config = GatewayConfig::from_env().context("Invalid configuration")?;
    cli.apply(&mut config);

    let state = build_state(&config)?;

    if cli.check_config {
        println!("Configuration OK");
        println!("  listen:    {}", config.listen_addr());
        println!("  model:     {} ({})", config.vlm.model, config.vlm.base_url);
        println!("  extractor: {}", state.pipeline.extractor_name());
        println!("  keywords:  {}", state.pipeline.keyword_count());
        return Ok(());
    }

    start_server(&config.listen_addr(), state).await
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;

use crate::config::GatewayConfig;
use crate::logging::LogFormat;

/// Image moderation gateway
#[derive(Parser, Debug)]
#[command(name = "image-moderation-gateway")]
#[command(version)]
#[command(about = "HTTP gateway that moderates images with OCR, keyword screening and a vision model", long_about = None)]
pub struct Cli {
    /// Listen host (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Dotenv file to load instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Log output format (overrides LOG_FORMAT)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Validate configuration, keywords and models, then exit
    #[arg(long)]
    pub check_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

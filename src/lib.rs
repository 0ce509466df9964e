pub mod cli;
pub mod core;
pub mod providers;
pub mod service;

use crate::cli::convert::ConvertArgs;
use crate::core::config::{AppConfig, RateSource};
use crate::providers::ExchangeRateApiProvider;
use crate::service::ConversionService;
use anyhow::Result;
use std::io::BufReader;
use tracing::{debug, info};

pub enum AppCommand {
    Convert { args: ConvertArgs, pair: bool },
    Rate { base: String, target: String },
    Rates { base: String, only: Vec<String> },
    Codes,
}

/// Provider settings given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct ProviderOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    overrides: ProviderOverrides,
) -> Result<()> {
    info!("xconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    }
    .with_overrides(overrides.api_key, overrides.base_url);
    debug!("Loaded config: {config:#?}");

    let provider = ExchangeRateApiProvider::new(
        &config.provider.base_url,
        config.api_key()?,
        config.provider.timeout(),
    )?;

    let rate_source = match &command {
        AppCommand::Convert { pair: true, .. } => RateSource::Pair,
        _ => config.rate_source,
    };
    let service = ConversionService::new(provider, rate_source);

    match command {
        AppCommand::Convert { args, .. } => {
            cli::convert::run(
                &service,
                args,
                &config.defaults,
                BufReader::new(std::io::stdin()),
                std::io::stdout(),
            )
            .await
        }
        AppCommand::Rate { base, target } => cli::rates::run_pair(&service, &base, &target).await,
        AppCommand::Rates { base, only } => cli::rates::run_table(&service, &base, &only).await,
        AppCommand::Codes => cli::codes::run(&service).await,
    }
}

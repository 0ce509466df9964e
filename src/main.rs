use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;
use xconv::cli::{convert::ConvertArgs, setup::setup, ui};
use xconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// ExchangeRate-API key, overrides the configuration file
    #[arg(long, env = "XCONV_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the rate provider
    #[arg(long, env = "XCONV_BASE_URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount; prompts for anything not given
    Convert {
        /// Currency the amount is in, e.g. USD
        base: Option<String>,
        /// Currency to convert into, e.g. INR
        target: Option<String>,
        /// Amount to convert
        amount: Option<String>,
        /// Let the provider convert the pair instead of using the rate table
        #[arg(long)]
        pair: bool,
    },
    /// Display the rate for a single currency pair
    Rate { base: String, target: String },
    /// Display all rates for a base currency
    Rates {
        base: String,
        /// Only show these target currencies
        #[arg(long, num_args = 1..)]
        only: Vec<String>,
    },
    /// Display supported currencies
    Codes,
}

impl From<Commands> for xconv::AppCommand {
    fn from(cmd: Commands) -> xconv::AppCommand {
        match cmd {
            Commands::Convert {
                base,
                target,
                amount,
                pair,
            } => xconv::AppCommand::Convert {
                args: ConvertArgs {
                    base,
                    target,
                    amount,
                },
                pair,
            },
            Commands::Rate { base, target } => xconv::AppCommand::Rate { base, target },
            Commands::Rates { base, only } => xconv::AppCommand::Rates { base, only },
            Commands::Codes => xconv::AppCommand::Codes,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let overrides = xconv::ProviderOverrides {
        api_key: cli.api_key,
        base_url: cli.base_url,
    };
    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => xconv::run_command(cmd.into(), cli.config_path.as_deref(), overrides).await,
        None => Cli::command().print_help().map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            eprintln!("{}", ui::style_text(&format!("{e:#}"), ui::StyleType::Error));
            ExitCode::FAILURE
        }
    }
}

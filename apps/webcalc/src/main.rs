#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod logging;
mod paths;
mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use calculator::{Calculator, CalculatorSession, RemoteCalculatorClient, open_history};
use clap::{Parser, Subcommand};

use crate::config::{AppConfig, CliOverrides};

/// webcalc - keypad calculator backed by a remote calculation endpoint
#[derive(Parser)]
#[command(name = "webcalc")]
#[command(about = "webcalc - keypad calculator backed by a remote calculation endpoint")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Calculation endpoint URL (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive calculator
    Run,
    /// Feed a key sequence (for example "2+3=") and print the display
    Eval {
        /// Keys to press, in order
        keys: String,
    },
    /// Show stored calculation history, newest first
    History {
        /// Delete all stored history instead
        #[arg(long)]
        clear: bool,
    },
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // defaults -> YAML -> env (WEBCALC__*) -> CLI
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        endpoint: cli.endpoint.clone(),
    });
    let home_dir = config.normalize_home_dir()?;

    let _log_guard = logging::init_logging(&config.logging, cli.verbose, &home_dir)?;
    tracing::debug!(home_dir = %home_dir.display(), "configuration loaded");

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(ExitCode::SUCCESS);
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            config.validate()?;
            let session = build_session(&config, &home_dir).await?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            repl::run_repl(&session, stdin, &mut std::io::stdout()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Eval { keys } => {
            config.validate()?;
            let session = build_session(&config, &home_dir).await?;
            eval(&session, &keys).await
        }
        Commands::History { clear } => {
            let session = build_session(&config, &home_dir).await?;
            if clear {
                let removed = session.clear_history().await?;
                println!("cleared {removed} record(s)");
            } else {
                repl::print_history(&session, &mut std::io::stdout()).await?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<ExitCode> {
    tracing::info!("checking configuration");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_json()?);
    Ok(ExitCode::SUCCESS)
}

async fn eval(session: &CalculatorSession, keys: &str) -> Result<ExitCode> {
    let state = repl::feed_keys(session, keys).await?;
    println!("{}", state.display);
    if let Some(message) = state.error_message {
        eprintln!("Error: {message}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn build_session(config: &AppConfig, home_dir: &Path) -> Result<CalculatorSession> {
    let client = RemoteCalculatorClient::new(&config.calculator)
        .context("failed to build calculation client")?;
    let history = open_history(config.history.backend, &config.history_url(home_dir))
        .await
        .context("failed to open calculation history")?;
    tracing::info!(endpoint = client.endpoint(), "calculator ready");
    let calculator =
        Calculator::new(Arc::new(client), history).with_precision(config.calculator.precision);
    Ok(CalculatorSession::new(calculator))
}

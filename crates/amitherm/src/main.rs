//! `amitherm` binary entry point.

mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use amitherm_api::ApiConfig;
use amitherm_core::{DEFAULT_UPDATE_INTERVAL, Hub};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if output::use_color() {
                eprintln!("{} {e}", "error:".red().bold());
            } else {
                eprintln!("error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `watch` polls at its own cadence; everything else is one-shot and
    // never starts the periodic task anyway.
    let interval = match &cli.command {
        Command::Watch(args) => Duration::from_secs(args.interval),
        _ => DEFAULT_UPDATE_INTERVAL,
    };
    let hub = build_hub(&cli.global, interval)?;

    match cli.command {
        Command::Status => commands::status::handle(&hub, &cli.global).await,
        Command::Heating(args) => commands::heating::handle(&hub, args, &cli.global).await,
        Command::Vent(args) => commands::vent::handle(&hub, args, &cli.global).await,
        Command::Watch(args) => commands::watch::handle(&hub, args).await,
        Command::Check => commands::check::handle(&hub).await,
    }
}

fn build_hub(global: &GlobalOpts, interval: Duration) -> Result<Hub, CliError> {
    let host = global.host.clone().ok_or_else(|| {
        CliError::Usage("no PLC host given; pass --host or set AMITHERM_HOST".into())
    })?;
    let password = global.password.clone().ok_or_else(|| {
        CliError::Usage("no password given; pass --password or set AMITHERM_PASSWORD".into())
    })?;

    let config = ApiConfig {
        host,
        username: global.username.clone(),
        password: SecretString::from(password),
        timeout: Duration::from_secs(global.timeout),
    };
    Ok(Hub::with_update_interval(config, interval))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

//! OpenWheel daemon entry point.
//!
//! Reads 4-byte input reports from the ASUS dial's hidraw node and
//! republishes them as `org.asus.dial` broadcast signals on the session
//! bus. All failure paths other than malformed reports are fatal: log,
//! exit non-zero, and leave restarting to the process supervisor.

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands};

use openwheel::config::DaemonConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("openwheel=debug".parse().unwrap()),
        )
        .init();

    if let Err(e) = run(cli).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match cli.config {
        Some(ref path) => DaemonConfig::load(path)?,
        None => DaemonConfig::load_default()?,
    };

    if let Some(device) = cli.device {
        config.device.path = device.to_string_lossy().into_owned();
    }

    match cli.command {
        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Some(Commands::Run) | None => Ok(openwheel::daemon::run(config).await?),
    }
}

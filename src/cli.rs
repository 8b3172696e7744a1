// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "openwheel-daemon")]
#[command(author, version, about = "ASUS dial bridge daemon: HID reports to D-Bus signals")]
#[command(propagate_version = true)]
pub struct Cli {
    /// hidraw device path (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Configuration file (default: $XDG_CONFIG_HOME/openwheel/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bridge daemon (the default when no command is given)
    Run,

    /// Print the effective configuration as TOML
    #[command(visible_alias = "cfg")]
    Config,
}

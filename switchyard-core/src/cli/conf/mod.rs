mod check;
mod dump;

pub use check::*;
pub use dump::*;

use crate::conf::{ConfigError, HttpConfig, load_config};
use crate::runtime::{ServerConfiguration, new_server_configuration};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ConfCmd {
    /// Validate configuration and exit
    Check {
        /// Path to the configuration file
        #[arg(short, long, default_value = "gateway.hcl")]
        config: PathBuf,

        /// Listening port, overrides the settings block
        #[arg(short, long)]
        port: Option<u16>,

        /// Print errors without colors
        #[arg(long, default_value = "false")]
        plain: bool,
    },

    /// Print the compiled routing table
    Dump {
        /// Path to the configuration file
        #[arg(short, long, default_value = "gateway.hcl")]
        config: PathBuf,

        /// Listening port, overrides the settings block
        #[arg(short, long)]
        port: Option<u16>,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

/// Loads and compiles the configuration at `path`. The port flag is applied
/// before the environment.
pub fn compile(path: &Path, port: Option<u16>) -> Result<ServerConfiguration, ConfigError> {
    let conf = load_config(path)?;
    let http = HttpConfig::from_settings(&conf.settings)
        .with_port(port)
        .update_by_process_env()?;

    new_server_configuration(&conf, &http)
}

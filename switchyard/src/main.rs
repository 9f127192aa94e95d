use clap::Parser;
use switchyard_core::cli::conf::{ConfCmd, check, dump};
use switchyard_core::logging::{LogMode, default_log_mode, init_logging};

#[derive(Parser, Debug)]
#[command(
    name = "switchyard",
    version,
    about = "Switchyard: compiles gateway configuration into a routing table"
)]
struct Cli {
    #[command(subcommand)]
    command: ConfCmd,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging();

    match cli.command {
        ConfCmd::Check {
            config,
            port,
            plain,
        } => {
            let plain = plain || default_log_mode() == LogMode::Raw;
            check(config, port, plain)
        }

        ConfCmd::Dump {
            config,
            port,
            json,
            yaml,
        } => dump(config, port, json, yaml),
    }
}

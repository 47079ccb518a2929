pub mod host_path;
pub mod manifest;
pub mod output;
pub mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use manifest::{process_manifest_command, ManifestCommand};
use summary::{process_summary_command, SummaryCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    host::start_host,
    utils::{
        dir::resolve_application_path,
        logging::{enable_logging, CLI_PREFIX, HOST_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Tabtally", version, long_about = None)]
#[command(about = "Time spent on browser tabs, per day and domain", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default uses $XDG_STATE_HOME/tabtally or $HOME/.local/state/tabtally"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Display time spent per domain for every recorded day")]
    Summary {
        #[command(flatten)]
        command: SummaryCommand,
    },
    #[command(
        about = "Run the native messaging host in current console, reading events from stdin. Used for debugging"
    )]
    Serve {},
    #[command(about = "Print the native messaging host manifest to register with a browser")]
    Manifest {
        #[command(flatten)]
        command: ManifestCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let app_dir = resolve_application_path(args.dir)?;
    let prefix = match args.commands {
        Commands::Serve {} => HOST_PREFIX,
        _ => CLI_PREFIX,
    };
    enable_logging(prefix, &app_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Summary { command } => process_summary_command(app_dir, command).await,
        Commands::Serve {} => start_host(app_dir, tokio::io::stdin()).await,
        Commands::Manifest { command } => process_manifest_command(command),
    }
}

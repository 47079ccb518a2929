// The browser starts this binary for every connection of the extension and talks to it over
// stdin. Nothing but native messaging frames may ever be written to stdout.

use anyhow::Result;
use clap::Parser;
use tabtally::{
    host::{args::HostArgs, start_host},
    utils::{
        dir::resolve_application_path,
        logging::{enable_logging, HOST_PREFIX},
        runtime::single_thread_runtime,
    },
};
use tracing::{debug, error};

fn main() -> Result<()> {
    run(HostArgs::parse())
}

fn run(args: HostArgs) -> Result<()> {
    let app_dir = resolve_application_path(args.dir)?;
    enable_logging(HOST_PREFIX, &app_dir, args.log, args.log_console)?;
    debug!("Launched with {:?}", args.launcher_args);

    single_thread_runtime()?
        .block_on(async move { start_host(app_dir, tokio::io::stdin()).await })
        .inspect_err(|e| error!("Host stopped with an error {e:?}"))?;
    Ok(())
}

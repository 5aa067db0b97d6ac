mod cli;
mod config;
mod filestore;
mod logging;
mod system;

use clap::Parser;
use std::process;
use tracing::debug;

fn main() {
    let args = cli::CliArgs::parse();
    logging::init(logging::resolve_level(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));
    debug!("Arguments: {:?}", args);

    // One command at a time, so a single threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            process::exit(1);
        }
    };

    let exit_code = rt.block_on(cli::run(&args));
    process::exit(exit_code);
}

//! Fieldbill - field-service invoicing from the command line
//!
//! Replays recorded invoice form sessions, exports and queues them, and
//! manages the local app state.

mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(e) = commands::execute(cli) {
        tracing::debug!("command failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

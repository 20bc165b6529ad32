//! `lector`: inspect what a captured page would read aloud.
//!
//! Reads a snapshot JSON file (the tree a host layer captures from a
//! rendered page) and prints the narration passages the engine extracts
//! from it, with embedded sub-documents served over the in-process frame
//! channel.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    if let Err(err) = commands::dispatch(cli).await {
        error!(target: "lector", error = %format!("{err:#}"), "command failed");
        std::process::exit(1);
    }
}

//! docfill CLI entry point
//!
//! Parses arguments, installs logging, runs the command and prints errors
//! with details and suggestions.

use anyhow::Result;
use clap::Parser;
use docfill::cli;
use docfill::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.init_logging();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}

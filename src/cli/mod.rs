//! Command-line interface for docfill.
//!
//! Each command lives in its own module with its argument structure and an
//! `execute` method. Commands are thin: they build requests, call the
//! [`Generator`](crate::generator::Generator) and print results.
//!
//! # Available Commands
//!
//! - `generate` - fill one template from a data file
//! - `batch` - generate every document listed in a batch file, concurrently
//! - `validate` - list tokens a template uses that the data does not define
//! - `templates` - list templates in the templates root
//! - `data-files` - list data files in a folder
//! - `new-data` - create a starter data file
//!
//! # Global Options
//!
//! - `--config <FILE>` (or `DOCFILL_CONFIG_PATH`) - configuration file
//! - `--verbose` - debug logging
//! - `--quiet` - errors only
//!
//! # Examples
//!
//! ```bash
//! docfill generate proposta Clientes/ACME/OBRA1/dados.md Clientes/ACME/OBRA1/proposta.docx
//! docfill validate modelos/resumo.pptx Clientes/ACME/dados.json --format json
//! docfill new-data Clientes/ACME/OBRA1 ACME --desc ACEITE
//! ```

mod batch;
mod catalog;
mod generate;
mod validate;

pub use batch::{BatchCommand, BatchEntry, BatchFile};
pub use catalog::{DataFilesCommand, NewDataCommand, TemplatesCommand};
pub use generate::GenerateCommand;
pub use validate::{OutputFormat, ValidateCommand};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::generator::Generator;

/// Main CLI structure.
#[derive(Parser, Debug)]
#[command(
    name = "docfill",
    about = "Fill @token placeholders in .docx and .pptx templates",
    version,
    long_about = None
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the configuration file.
    ///
    /// Defaults to `~/.docfill/config.toml`; a missing default file means
    /// default settings.
    #[arg(short, long, global = true, env = "DOCFILL_CONFIG_PATH", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a document from a template and a data file.
    Generate(GenerateCommand),

    /// Generate every document listed in a batch file.
    Batch(BatchCommand),

    /// Report tokens a template references that the data does not define.
    Validate(ValidateCommand),

    /// List available templates.
    Templates(TemplatesCommand),

    /// List data files in a folder.
    DataFiles(DataFilesCommand),

    /// Create a starter data file.
    NewData(NewDataCommand),
}

/// What every command gets to work with.
#[derive(Debug)]
pub struct CommandContext {
    /// Configured generation service
    pub generator: Generator,
    /// Suppress informational output
    pub quiet: bool,
}

impl Cli {
    /// Log filter implied by the verbosity flags.
    ///
    /// `RUST_LOG` applies only when neither flag is given.
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("docfill=debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docfill=info"))
        }
    }

    /// Install the global `tracing` subscriber, writing to stderr.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the configuration and run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = EngineConfig::load_with_optional(self.config.clone())?;
        let context = CommandContext {
            generator: Generator::new(config),
            quiet: self.quiet,
        };

        match self.command {
            Commands::Generate(cmd) => cmd.execute(&context),
            Commands::Batch(cmd) => cmd.execute(&context).await,
            Commands::Validate(cmd) => cmd.execute(&context),
            Commands::Templates(cmd) => cmd.execute(&context),
            Commands::DataFiles(cmd) => cmd.execute(&context),
            Commands::NewData(cmd) => cmd.execute(&context),
        }
    }
}

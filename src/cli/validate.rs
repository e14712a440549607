//! `docfill validate`

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CommandContext;
use crate::document::DocumentKind;

/// Output format for validation results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors
    Text,
    /// The report as JSON, for scripts
    Json,
}

/// Check a template against a data file without generating anything.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Template path, or a template name in the templates root
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Data file the template would be filled from
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Container kind; inferred from the template extension by default
    #[arg(long)]
    pub kind: Option<DocumentKind>,

    /// Output format: text or json
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Exit with an error when any token is missing
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Run the command.
    pub fn execute(self, context: &CommandContext) -> Result<()> {
        let template = context.generator.resolve_template(&self.template)?;
        let report = context.generator.validate_template_keys(&template, &self.data, self.kind)?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text if report.is_empty() => {
                if !context.quiet {
                    println!("{} Every token in {} has a value", "✓".green(), template.display());
                }
            }
            OutputFormat::Text => {
                println!("{} {} token(s) without value:", "✗".red(), report.len());
                for missing in &report.missing {
                    if missing.suggestions.is_empty() {
                        println!("    {}", missing.token);
                    } else {
                        println!("    {} (did you mean {}?)", missing.token, missing.suggestions.join(", "));
                    }
                }
            }
        }

        match report.to_error() {
            Some(error) if self.strict => Err(error.into()),
            _ => Ok(()),
        }
    }
}

//! `docfill generate`

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CommandContext;
use crate::document::DocumentKind;
use crate::generator::{GenerationReport, GenerationRequest};

/// Generate one document.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Template path, or a template name in the templates root
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Data file for this document (`.md`, `.txt` or `.json`)
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Where to write the generated document
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Container kind; inferred from the template extension by default
    #[arg(long)]
    pub kind: Option<DocumentKind>,
}

impl GenerateCommand {
    /// Run the command.
    pub fn execute(self, context: &CommandContext) -> Result<()> {
        let template = context.generator.resolve_template(&self.template)?;
        let mut request = GenerationRequest::new(template, self.data, self.output);
        if let Some(kind) = self.kind {
            request = request.with_kind(kind);
        }

        let report = context.generator.generate(&request)?;
        if !context.quiet {
            print_report(&report);
        }
        Ok(())
    }
}

/// Human-readable summary of a generation.
pub(crate) fn print_report(report: &GenerationReport) {
    println!(
        "{} Generated {} ({} replacement(s))",
        "✓".green(),
        report.output.display(),
        report.replacements
    );

    if !report.missing.is_empty() {
        let note = if report.placeholder_applied { " (filled with placeholder)" } else { "" };
        println!("{} {} token(s) without value{note}:", "⚠".yellow(), report.missing.len());
        for missing in &report.missing.missing {
            if missing.suggestions.is_empty() {
                println!("    {}", missing.token);
            } else {
                println!("    {} (did you mean {}?)", missing.token, missing.suggestions.join(", "));
            }
        }
    }

    for (key, reason) in &report.unresolved {
        println!("{} {key} left unresolved: {reason}", "⚠".yellow());
    }
}

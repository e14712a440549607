//! `docfill batch`
//!
//! The batch file lists one `[[document]]` table per output:
//!
//! ```toml
//! [[document]]
//! template = "proposta"
//! data = "Clientes/ACME/OBRA1/dados.md"
//! output = "Clientes/ACME/OBRA1/proposta.docx"
//!
//! [[document]]
//! template = "modelos/resumo.pptx"
//! data = "Clientes/ACME/OBRA1/dados.md"
//! output = "Clientes/ACME/OBRA1/resumo.pptx"
//! kind = "pptx"
//! ```

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Deserialize;
use std::path::PathBuf;

use super::CommandContext;
use super::generate::print_report;
use crate::config::parse_config;
use crate::document::DocumentKind;
use crate::generator::{GenerationRequest, generate_batch};
use crate::utils::progress::BatchProgress;

/// One entry of a batch file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchEntry {
    /// Template path or name
    pub template: String,
    /// Data file
    pub data: PathBuf,
    /// Output path
    pub output: PathBuf,
    /// Container kind
    #[serde(default)]
    pub kind: Option<DocumentKind>,
}

/// A parsed batch file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchFile {
    /// Documents to generate
    #[serde(default, rename = "document")]
    pub documents: Vec<BatchEntry>,
}

/// Generate several documents concurrently.
#[derive(Args, Debug)]
pub struct BatchCommand {
    /// Batch file (TOML) listing the documents
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl BatchCommand {
    /// Run the command.
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let batch: BatchFile = parse_config(&self.file)?;
        if batch.documents.is_empty() {
            if !context.quiet {
                println!("Nothing to generate in {}", self.file.display());
            }
            return Ok(());
        }

        let mut requests = Vec::with_capacity(batch.documents.len());
        for entry in batch.documents {
            let template = context.generator.resolve_template(&entry.template)?;
            let mut request = GenerationRequest::new(template, entry.data, entry.output);
            if let Some(kind) = entry.kind {
                request = request.with_kind(kind);
            }
            requests.push(request);
        }

        let progress = if context.quiet {
            BatchProgress::hidden(requests.len())
        } else {
            BatchProgress::new(requests.len())
        };
        let results = generate_batch(context.generator.clone(), requests, progress).await?;

        let mut failures = 0;
        for result in &results {
            match result {
                Ok(report) if !context.quiet => print_report(report),
                Ok(_) => {}
                Err(e) => {
                    failures += 1;
                    eprintln!("{} {e}", "✗".red());
                }
            }
        }

        if failures > 0 {
            bail!("{failures} of {} document(s) failed", results.len());
        }
        Ok(())
    }
}

//! `docfill templates`, `docfill data-files` and `docfill new-data`

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CommandContext;
use crate::document::DocumentKind;
use crate::generator::catalog::{DEFAULT_DESCRIPTION, DEFAULT_REVISION, DEFAULT_VERSION};
use crate::generator::{list_data_files, scaffold_data_file};

/// List templates in the templates root.
#[derive(Args, Debug)]
pub struct TemplatesCommand {
    /// Only templates with this extension (docx or pptx)
    #[arg(long, alias = "kind")]
    pub extension: Option<DocumentKind>,
}

impl TemplatesCommand {
    /// Run the command.
    pub fn execute(self, context: &CommandContext) -> Result<()> {
        let names = context.generator.list_templates(self.extension);
        if names.is_empty() && !context.quiet {
            println!(
                "No templates found in {}",
                context.generator.config().templates_root.display()
            );
        }
        for name in names {
            println!("{name}");
        }
        Ok(())
    }
}

/// List data files in a folder.
#[derive(Args, Debug)]
pub struct DataFilesCommand {
    /// Folder to list
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

impl DataFilesCommand {
    /// Run the command.
    pub fn execute(self, context: &CommandContext) -> Result<()> {
        let files = list_data_files(&self.dir);
        if files.is_empty() && !context.quiet {
            println!("No data files in {}", self.dir.display());
        }
        for file in files {
            println!("{}", file.display());
        }
        Ok(())
    }
}

/// Create `02-{CODE}_DOC_PC_{VER}_{REV}_{DESC}.md` in a folder.
#[derive(Args, Debug)]
pub struct NewDataCommand {
    /// Folder that receives the file
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Client or project code
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Version field
    #[arg(long, default_value = DEFAULT_VERSION)]
    pub ver: String,

    /// Revision field
    #[arg(long, default_value = DEFAULT_REVISION)]
    pub rev: String,

    /// Description field
    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    pub desc: String,
}

impl NewDataCommand {
    /// Run the command.
    pub fn execute(self, context: &CommandContext) -> Result<()> {
        let path = scaffold_data_file(&self.dir, &self.code, &self.ver, &self.rev, &self.desc)?;
        if !context.quiet {
            println!("{} {}", "✓".green(), path.display());
        }
        Ok(())
    }
}

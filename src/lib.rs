//! docfill - template resolution and substitution for office documents
//!
//! Fills `@token` placeholders in `.docx` and `.pptx` templates with values
//! gathered from a hierarchy of plain-text fact files, computed fields and
//! system variables.
//!
//! # Architecture Overview
//!
//! A generation request flows through four layers:
//!
//! 1. **Facts** - the document's data file, the context chain of versioned
//!    fact files from the clients root down to the data folder, and system
//!    variables, merged with later layers winning
//! 2. **Resolution** - computed fields (`[calculo: @valor * @qtd]`) are
//!    evaluated and numbers are rendered in the regional convention
//!    (`R$ 1.234,56`)
//! 3. **Validation** - tokens the template references but the data lacks are
//!    reported, with close-match suggestions
//! 4. **Substitution** - values are written into the document's text runs,
//!    including text boxes, headers, footers and table cells, and the
//!    package is saved atomically
//!
//! # Core Modules
//!
//! - [`facts`] - data file loading, context chain, system variables
//! - [`templating`] - token grammar, expressions, formatting, validation, substitution
//! - [`document`] - zip containers, markup scanning, template surfaces
//! - [`generator`] - the generation service (generate, validate, list, scaffold, batch)
//! - [`config`] - engine configuration
//! - [`core`] - error types and user-facing error reporting
//! - [`cli`] - the `docfill` command line
//! - [`utils`] - atomic writes, path expansion, progress bars
//!
//! # Example
//!
//! ```rust,no_run
//! use docfill::config::EngineConfig;
//! use docfill::generator::{GenerationRequest, Generator};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = EngineConfig::load_with_optional(None)?;
//! let generator = Generator::new(config);
//!
//! let report = generator.generate(&GenerationRequest::new(
//!     "modelos/proposta.docx",
//!     "Clientes/ACME/OBRA1/02-ACME_DOC_PC_00_R00_PROPOSTA.md",
//!     "Clientes/ACME/OBRA1/proposta.docx",
//! ))?;
//! println!("{} replacement(s)", report.replacements);
//! # Ok(())
//! # }
//! ```
//!
//! # Command Line
//!
//! ```bash
//! docfill generate proposta Clientes/ACME/OBRA1/dados.md Clientes/ACME/OBRA1/proposta.docx
//! docfill validate proposta Clientes/ACME/OBRA1/dados.md
//! docfill templates --extension pptx
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// Engine
pub mod document;
pub mod facts;
pub mod generator;
pub mod templating;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

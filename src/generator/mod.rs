//! Document generation service.
//!
//! [`Generator`] ties the layers together. For one request it:
//!
//! 1. loads the document's data file (malformed object notation is fatal)
//! 2. resolves the context chain from the data file's folder up to the
//!    clients root
//! 3. injects system variables (`@DataAtual`, `@ReferenciaCUB`, `@LinkCUB`)
//! 4. merges the layers: system < context < document
//! 5. resolves computed fields, then formats numbers
//! 6. opens the template and reports tokens with no value, optionally
//!    filling them with the configured placeholder
//! 7. substitutes every value and saves the output atomically
//! 8. appends a line to the output folder's `history.log`
//!
//! Each request owns its map and its document, so independent requests can
//! run concurrently ([`batch`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use docfill::config::EngineConfig;
//! use docfill::generator::{GenerationRequest, Generator};
//!
//! # fn example() -> Result<(), docfill::core::DocfillError> {
//! let generator = Generator::new(EngineConfig::default());
//! let request = GenerationRequest::new(
//!     "modelos/proposta.docx",
//!     "Clientes/ACME/OBRA1/02-ACME_DOC_PC_00_R00_PROPOSTA.md",
//!     "Clientes/ACME/OBRA1/proposta.docx",
//! );
//!
//! let report = generator.generate(&request)?;
//! for token in report.missing.tokens() {
//!     println!("sem valor: {token}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod catalog;
pub mod history;

pub use batch::generate_batch;
pub use catalog::{data_file_name, list_data_files, list_templates, resolve_template, scaffold_data_file};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::core::DocfillError;
use crate::document::{DocumentKind, open_document};
use crate::facts::{ContextResolver, FactMap, FactValue, load_fact_map, merge_layers, system_variables};
use crate::templating::{
    MissingTokenReport, SubstitutionEngine, SubstitutionStats, UnresolvedExpression, apply_formatting,
    extract_tokens, missing_tokens, resolve_expressions,
};

/// One document to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Template container
    pub template: PathBuf,
    /// Document data file; its folder anchors the context chain
    pub data: PathBuf,
    /// Where the generated document is written
    pub output: PathBuf,
    /// Container kind; inferred from the template extension when `None`
    pub kind: Option<DocumentKind>,
}

impl GenerationRequest {
    /// A request whose kind is inferred from the template.
    pub fn new(template: impl Into<PathBuf>, data: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            data: data.into(),
            output: output.into(),
            kind: None,
        }
    }

    /// Force the container kind.
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The explicit kind, or the one the template extension implies.
    pub fn resolved_kind(&self) -> Result<DocumentKind, DocfillError> {
        match self.kind {
            Some(kind) => Ok(kind),
            None => DocumentKind::from_path(&self.template),
        }
    }
}

/// Fully resolved data for one document.
#[derive(Debug, Clone, Default)]
pub struct ResolvedFacts {
    /// Merged, computed and formatted map
    pub facts: FactMap,
    /// Computed fields left in textual form
    pub unresolved: Vec<UnresolvedExpression>,
}

/// Outcome of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Written document
    pub output: PathBuf,
    /// Container kind
    pub kind: DocumentKind,
    /// Tokens the template references with no value in the data
    pub missing: MissingTokenReport,
    /// Whether missing tokens were filled with the placeholder
    pub placeholder_applied: bool,
    /// Computed fields that stayed unresolved, as `(key, reason)`
    pub unresolved: Vec<(String, String)>,
    /// Regions rewritten
    pub regions_rewritten: usize,
    /// Token occurrences replaced
    pub replacements: usize,
}

/// Generation service configured once and reused across requests.
#[derive(Debug, Clone)]
pub struct Generator {
    config: EngineConfig,
    today: Option<NaiveDate>,
}

impl Generator {
    /// Create a generator.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            today: None,
        }
    }

    /// Pin the date used for system variables.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn context_resolver(&self) -> ContextResolver {
        ContextResolver::new(absolute(&self.config.clients_root))
    }

    /// Document data and context chain for `data`, without system variables.
    fn load_layers(&self, data: &Path) -> Result<(FactMap, FactMap), DocfillError> {
        let document = load_fact_map(data)?;
        let folder = match data.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let context = self.context_resolver().resolve(&absolute(folder));

        if document.is_empty() && context.is_empty() {
            error!("No data loaded from {} or its context", data.display());
        }
        Ok((context, document))
    }

    /// Merge, compute and format every layer for `data`.
    ///
    /// # Errors
    ///
    /// [`DocfillError::DataSourceInvalid`] when the data file exists but is
    /// malformed.
    pub fn resolve_facts(&self, data: &Path) -> Result<ResolvedFacts, DocfillError> {
        let (context, document) = self.load_layers(data)?;
        let system = system_variables(self.today(), &self.config.cub_base_url);

        let mut facts = merge_layers([system, context, document]);
        let unresolved = resolve_expressions(&mut facts);
        apply_formatting(&mut facts);

        debug!("Resolved {} keys for {}", facts.len(), data.display());
        Ok(ResolvedFacts {
            facts,
            unresolved,
        })
    }

    /// Generate one document.
    ///
    /// # Errors
    ///
    /// Fails on a malformed data file, an unreadable or unsupported
    /// template, or a failed save. Missing tokens and unsafe expressions are
    /// reported in the [`GenerationReport`], not raised.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationReport, DocfillError> {
        let kind = request.resolved_kind()?;
        info!(
            "Generating {kind} document {} from {}",
            request.output.display(),
            request.template.display()
        );

        let ResolvedFacts {
            mut facts,
            unresolved,
        } = self.resolve_facts(&request.data)?;

        let mut document = open_document(kind, &request.template)?;

        let missing = missing_tokens(&extract_tokens(document.as_ref()), &facts);
        let placeholder_applied = !missing.is_empty() && self.config.clean_missing_variables;
        if !missing.is_empty() {
            warn!("{}", missing.to_error().map(|e| e.to_string()).unwrap_or_default());
            if placeholder_applied {
                info!(
                    "Filling {} missing token(s) with '{}'",
                    missing.len(),
                    self.config.missing_variable_placeholder
                );
                for token in missing.tokens() {
                    facts.insert(token, FactValue::from(self.config.missing_variable_placeholder.as_str()));
                }
            }
        }

        let engine = SubstitutionEngine::new(&facts, self.config.run_consolidation);
        let SubstitutionStats {
            rewritten,
            replacements,
            ..
        } = engine.apply(document.as_mut())?;

        document.save(&request.output)?;
        info!("Saved {} ({replacements} replacement(s))", request.output.display());

        if self.config.write_history {
            let now = Local::now().naive_local();
            if let Err(e) =
                history::record_generation(now, &request.output, kind, &request.template, &request.data)
            {
                error!("Failed to record generation history: {e:#}");
            }
        }

        Ok(GenerationReport {
            output: request.output.clone(),
            kind,
            missing,
            placeholder_applied,
            unresolved: unresolved.iter().map(|u| (u.key.clone(), u.reason.to_string())).collect(),
            regions_rewritten: rewritten,
            replacements,
        })
    }

    /// Tokens `template` references with no value for `data`.
    ///
    /// System variables count as defined. Nothing is written.
    pub fn validate_template_keys(
        &self,
        template: &Path,
        data: &Path,
        kind: Option<DocumentKind>,
    ) -> Result<MissingTokenReport, DocfillError> {
        let kind = match kind {
            Some(kind) => kind,
            None => DocumentKind::from_path(template)?,
        };
        let (context, document) = self.load_layers(data)?;
        let system = system_variables(self.today(), &self.config.cub_base_url);
        let facts = merge_layers([system, context, document]);

        let template = open_document(kind, template)?;
        let report = missing_tokens(&extract_tokens(template.as_ref()), &facts);
        if !report.is_empty() {
            warn!("Missing tokens: {}", report.tokens().join(", "));
        }
        Ok(report)
    }

    /// Template names under the configured templates root.
    pub fn list_templates(&self, kind: Option<DocumentKind>) -> Vec<String> {
        list_templates(&self.config.templates_root, kind)
    }

    /// Locate a template by path or by name under the templates root.
    pub fn resolve_template(&self, name: &str) -> Result<PathBuf, DocfillError> {
        resolve_template(&self.config.templates_root, name)
    }
}

/// Absolute form of `path`, or `path` itself when the working directory is unknown.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

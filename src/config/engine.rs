//! Engine settings.
//!
//! # File Format
//!
//! ```toml
//! clients_root = "~/Clientes"
//! templates_root = "~/Clientes/_modelos"
//! clean_missing_variables = true
//! missing_variable_placeholder = "---"
//! write_history = true
//! run_consolidation = "paragraph"   # or "token-spans"
//! cub_base_url = "https://www.sinduscongoias.com.br/arquivos/download/cub"
//! ```
//!
//! Every key is optional. Paths accept `~/` and `$VAR`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::parser::parse_config;
use crate::constants::{DEFAULT_CUB_BASE_URL, DEFAULT_MISSING_PLACEHOLDER};
use crate::core::DocfillError;
use crate::templating::RunConsolidation;
use crate::utils::platform::{get_home_dir, resolve_path};

fn default_clients_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_templates_root() -> PathBuf {
    PathBuf::from("templates")
}

fn default_placeholder() -> String {
    DEFAULT_MISSING_PLACEHOLDER.to_string()
}

const fn default_true() -> bool {
    true
}

fn default_cub_base_url() -> String {
    DEFAULT_CUB_BASE_URL.to_string()
}

/// Configuration handed to the generator.
///
/// # Examples
///
/// ```rust
/// use docfill::config::EngineConfig;
/// use docfill::templating::RunConsolidation;
///
/// let config: EngineConfig = toml::from_str(r#"
///     clients_root = "Clientes"
///     clean_missing_variables = true
///     run_consolidation = "token-spans"
/// "#).unwrap();
///
/// assert!(config.clean_missing_variables);
/// assert_eq!(config.missing_variable_placeholder, "---");
/// assert_eq!(config.run_consolidation, RunConsolidation::TokenSpans);
/// assert!(config.write_history);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root of the client folder tree; context chains stop below it.
    pub clients_root: PathBuf,

    /// Directory holding `.docx`/`.pptx` templates.
    pub templates_root: PathBuf,

    /// Fill tokens with no value with [`missing_variable_placeholder`](Self::missing_variable_placeholder).
    pub clean_missing_variables: bool,

    /// Text written over unresolved tokens when cleaning is on.
    pub missing_variable_placeholder: String,

    /// Append a line to `history.log` next to each generated document.
    pub write_history: bool,

    /// How fragmented runs are merged before substitution.
    pub run_consolidation: RunConsolidation,

    /// Base URL of the monthly cost index bulletins (`@LinkCUB`).
    pub cub_base_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clients_root: default_clients_root(),
            templates_root: default_templates_root(),
            clean_missing_variables: false,
            missing_variable_placeholder: default_placeholder(),
            write_history: default_true(),
            run_consolidation: RunConsolidation::default(),
            cub_base_url: default_cub_base_url(),
        }
    }
}

impl EngineConfig {
    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// [`DocfillError::ConfigNotFound`] for a missing explicit path; read,
    /// parse and path expansion failures otherwise.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(DocfillError::ConfigNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                Self::load_from(&path)
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    debug!("No configuration at {}; using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load and expand a configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let config: Self = parse_config(path)?;
        config.expand_paths()
    }

    /// `~/.docfill/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_home_dir()?.join(".docfill").join("config.toml"))
    }

    /// Expand `~/` and `$VAR` in both roots.
    pub fn expand_paths(mut self) -> Result<Self> {
        self.clients_root = expand(&self.clients_root).context("Invalid clients_root")?;
        self.templates_root = expand(&self.templates_root).context("Invalid templates_root")?;
        Ok(self)
    }
}

fn expand(path: &Path) -> Result<PathBuf> {
    resolve_path(&path.to_string_lossy())
}

//! Generic TOML parsing with file path context.
//!
//! Read and parse failures name the file that caused them:
//!
//! ```text
//! Failed to parse config file: /home/ana/.docfill/config.toml
//! Caused by:
//!     invalid type: string "sim", expected a boolean
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into `T`.
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::config::{EngineConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: EngineConfig = parse_config(Path::new("docfill.toml"))?;
/// println!("templates in {}", config.templates_root.display());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

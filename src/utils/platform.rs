//! Platform-specific helpers: home directory and path expansion.
//!
//! Configured roots such as `clients_root = "~/Clientes"` or
//! `templates_root = "$DOCFILL_HOME/modelos"` go through [`resolve_path`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use docfill::utils::platform::{get_home_dir, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let home = get_home_dir()?;
//! println!("Home directory: {}", home.display());
//!
//! let clients = resolve_path("~/Clientes")?;
//! println!("Clients: {}", clients.display());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Gets the home directory path for the current user.
///
/// # Errors
///
/// Fails when the home directory cannot be determined (`HOME` or
/// `USERPROFILE` unset).
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Resolves a path with `~/` home expansion and `$VAR` / `${VAR}` expansion.
///
/// # Errors
///
/// - `~user` forms are rejected; only `~/` is supported
/// - an undefined environment variable is an error
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::utils::platform::resolve_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let path = resolve_path("~/Clientes/ACME")?;
/// let other = resolve_path("$HOME/modelos")?;
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = if let Some(stripped) = path.strip_prefix("~/") {
        get_home_dir()?.join(stripped)
    } else if path == "~" {
        get_home_dir()?
    } else if path.starts_with('~') {
        return Err(anyhow::anyhow!(
            "Invalid path: {path}\n\n\
            Tilde expansion only supports '~/' for home directory.\n\
            Use '~/' followed by a relative path, like '~/Clientes'"
        ));
    } else {
        PathBuf::from(path)
    };

    let path_str = expanded.to_string_lossy();
    let expanded_str = shellexpand::env(&path_str)
        .with_context(|| {
            format!(
                "Failed to expand environment variables in path: {path_str}\n\n\
                Common issues:\n\
                - Undefined environment variable (e.g., $UNDEFINED_VAR)\n\
                - Invalid variable syntax (use $VAR or ${{VAR}})"
            )
        })?
        .into_owned();

    Ok(PathBuf::from(expanded_str))
}

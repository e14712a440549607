//! Cross-platform utilities and helpers
//!
//! - [`fs`] - atomic writes, directory creation and append-only logs
//! - [`platform`] - home directory lookup and `~`/`$VAR` path expansion
//! - [`progress`] - batch progress bars
//!
//! # Example
//!
//! ```rust,no_run
//! use docfill::utils::{atomic_write, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("saida/propostas"))?;
//! atomic_write(Path::new("saida/propostas/notas.txt"), b"conteudo")?;
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{append_line, atomic_write, ensure_dir};
pub use platform::{get_home_dir, is_windows, resolve_path};
pub use progress::BatchProgress;

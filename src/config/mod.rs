//! Configuration management for docfill
//!
//! The engine reads a single TOML file. Its location is, in order:
//!
//! 1. `--config <path>` on the command line
//! 2. the `DOCFILL_CONFIG_PATH` environment variable
//! 3. `~/.docfill/config.toml`
//!
//! An explicit path (1 or 2) must exist. A missing default file means
//! defaults for every setting.
//!
//! The loaded [`EngineConfig`] is passed to the generator by value; nothing
//! here is process-global.
//!
//! # Modules
//!
//! - `engine` - the [`EngineConfig`] structure and its loading rules
//! - `parser` - generic TOML parsing with file path context

mod engine;
mod parser;

pub use engine::EngineConfig;
pub use parser::parse_config;

//! Shared helpers for the unit and integration suites.
//!
//! [`TestWorkspace`] lays out a clients root and a templates root inside a
//! temporary directory:
//!
//! ```text
//! <temp>/
//! ├── clientes/     <- clients root
//! └── modelos/      <- templates root
//! ```

#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use chrono::NaiveDate;
use docfill::config::EngineConfig;
use docfill::generator::Generator;
use docfill::test_utils::init_test_logging;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The date every generator in the suites runs on.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 29).unwrap()
}

/// A temporary clients root plus templates root.
pub struct TestWorkspace {
    temp: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace with both roots present.
    pub fn new() -> Result<Self> {
        init_test_logging(None);
        let temp = tempfile::tempdir()?;
        std::fs::create_dir_all(temp.path().join("clientes"))?;
        std::fs::create_dir_all(temp.path().join("modelos"))?;
        Ok(Self {
            temp,
        })
    }

    /// The temporary directory holding everything.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn clients_root(&self) -> PathBuf {
        self.path().join("clientes")
    }

    pub fn templates_root(&self) -> PathBuf {
        self.path().join("modelos")
    }

    /// A folder under the clients root, created on demand.
    pub fn client_dir(&self, relative: &str) -> Result<PathBuf> {
        let dir = self.clients_root().join(relative);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write `content` to `relative` under the clients root.
    pub fn write_client_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.clients_root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Path of a template under the templates root.
    pub fn template(&self, name: &str) -> PathBuf {
        self.templates_root().join(name)
    }

    /// Configuration pointing at this workspace.
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            clients_root: self.clients_root(),
            templates_root: self.templates_root(),
            ..EngineConfig::default()
        }
    }

    /// Generator over this workspace running on [`today`].
    pub fn generator(&self) -> Generator {
        Generator::new(self.config()).with_today(today())
    }

    /// Generator with a customized configuration.
    pub fn generator_with(&self, configure: impl FnOnce(&mut EngineConfig)) -> Generator {
        let mut config = self.config();
        configure(&mut config);
        Generator::new(config).with_today(today())
    }

    /// Write a config file for the CLI and return its path.
    pub fn write_config(&self, extra: &str) -> Result<PathBuf> {
        let path = self.path().join("config.toml");
        let content = format!(
            "clients_root = {:?}\ntemplates_root = {:?}\n{extra}",
            self.clients_root().display().to_string(),
            self.templates_root().display().to_string(),
        );
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

/// The `docfill` binary with a clean environment, running inside `dir`.
pub fn docfill_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docfill").unwrap();
    cmd.current_dir(dir)
        .env_remove("DOCFILL_CONFIG_PATH")
        .env_remove("RUST_LOG")
        .env("DOCFILL_NO_PROGRESS", "1")
        .env("NO_COLOR", "1");
    cmd
}

//! Context chain resolution.
//!
//! Client data lives in a folder hierarchy under a configured clients root:
//!
//! ```text
//! clientes/                                  <- root (never contributes)
//! └── ACME/
//!     ├── ACM_DOC_CD_00_R00_INFO-ACME.md
//!     ├── ACM_DOC_CD_00_R01_INFO-ACME.md     <- latest for "ACME"
//!     └── OBRA1/
//!         ├── ACMOBR_DOC_CD_01_R00_INFO-OBRA1.md
//!         └── 02-ACMOBR_DOC_PC_00_R00_proposta.md   <- document data
//! ```
//!
//! Each folder between the root (excluded) and the data file's folder
//! (included) contributes the latest fact file named after the folder itself.
//! Deeper folders overwrite shallower ones.

use glob::Pattern;
use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use super::{FactMap, load_fact_map};
use crate::constants::{DATA_FILE_EXTENSIONS, FACT_FILE_FALLBACK_PREFIX, FACT_FILE_INFIX};

/// `(VER, REV)` pair embedded in a fact file name.
///
/// Parsed from the two `_`-separated fields right before `INFO-`, e.g.
/// `ACM_DOC_CD_01_R02_INFO-ACME.md` is version `01`, revision `R02`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FactFileVersion {
    /// Version number (`VER`)
    pub ver: u32,
    /// Revision number (`REV`, without its `R` prefix)
    pub rev: u32,
}

impl FactFileVersion {
    /// Parse the version pair out of a fact file name.
    ///
    /// Returns `None` for names that do not follow the `..._VER_REV_INFO-...`
    /// convention, such as the plain `INFO-ACME.md` fallback.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.split_once(FACT_FILE_INFIX)?.0;
        let mut fields = stem.rsplit('_');
        let rev = fields.next()?;
        let ver = fields.next()?;

        let rev = rev.strip_prefix(['R', 'r']).unwrap_or(rev);
        Some(Self {
            ver: ver.parse().ok()?,
            rev: rev.parse().ok()?,
        })
    }
}

/// Order fact file names: versioned names by `(VER, REV)`, unversioned names
/// below them, ties broken by name.
fn compare_fact_files(a: &str, b: &str) -> Ordering {
    match (FactFileVersion::parse(a), FactFileVersion::parse(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Resolves the inherited facts for a target folder.
#[derive(Debug, Clone)]
pub struct ContextResolver {
    root: PathBuf,
}

impl ContextResolver {
    /// Create a resolver for the given clients root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// The configured clients root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folders contributing to `target`, in root-to-leaf order.
    ///
    /// The root itself is excluded and the target is included. When `target`
    /// is not inside the root, only the target contributes.
    pub fn context_chain(&self, target: &Path) -> Vec<PathBuf> {
        let root = normalize(&self.root);
        let target = normalize(target);

        let Ok(relative) = target.strip_prefix(&root) else {
            warn!(
                "{} is outside the clients root {}; using its own facts only",
                target.display(),
                root.display()
            );
            return vec![target];
        };

        let mut chain = Vec::new();
        let mut current = root;
        for component in relative.components() {
            current.push(component);
            chain.push(current.clone());
        }
        chain
    }

    /// The authoritative fact file for `alias` in `folder`, if any.
    ///
    /// Looks for `*_INFO-{alias}.*` first and falls back to `INFO-{alias}.*`.
    /// Only data file extensions are considered.
    pub fn latest_fact_file(&self, folder: &Path, alias: &str) -> Option<PathBuf> {
        let escaped = Pattern::escape(alias);
        let primary = Pattern::new(&format!("*{FACT_FILE_INFIX}{escaped}.*")).ok()?;
        let fallback = Pattern::new(&format!("{FACT_FILE_FALLBACK_PREFIX}{escaped}.*")).ok()?;

        let entries = match std::fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {}: {e}", folder.display());
                return None;
            }
        };

        let mut primary_hits = Vec::new();
        let mut fallback_hits = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !has_data_extension(&path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
                continue;
            };
            if primary.matches(&name) {
                primary_hits.push(name);
            } else if fallback.matches(&name) {
                fallback_hits.push(name);
            }
        }

        let candidates = if primary_hits.is_empty() { fallback_hits } else { primary_hits };
        candidates
            .into_iter()
            .max_by(|a, b| compare_fact_files(a, b))
            .map(|name| folder.join(name))
    }

    /// Merge the fact files of every folder in the chain of `target`.
    ///
    /// Missing or unreadable fact files are skipped; an empty chain yields an
    /// empty map.
    pub fn resolve(&self, target: &Path) -> FactMap {
        let mut facts = FactMap::new();

        for folder in self.context_chain(target) {
            let Some(alias) = folder.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(fact_file) = self.latest_fact_file(&folder, alias) else {
                debug!("No fact file for '{alias}' in {}", folder.display());
                continue;
            };

            match load_fact_map(&fact_file) {
                Ok(layer) => {
                    info!("Loading context from {}", fact_file.display());
                    facts.extend(layer);
                }
                Err(e) => warn!("Skipping context file: {e}"),
            }
        }

        facts
    }
}

fn has_data_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DATA_FILE_EXTENSIONS.iter().any(|d| e.eq_ignore_ascii_case(d)))
}

/// Lexically normalize a path: drop `.` and fold `..` without touching disk.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

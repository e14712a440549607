//! Rewriting template text with resolved values.
//!
//! Keys are applied one at a time, longest first, so `@ab` is always replaced
//! before `@a` can touch it. Matching goes through the shared token grammar:
//! `contato@nome.com` is never rewritten.
//!
//! # Run fragmentation
//!
//! Editors split text into formatting runs at arbitrary points, so `@nome`
//! may be stored as `@` + `nome`. Two strategies handle that:
//!
//! - [`RunConsolidation::Paragraph`]: when a paragraph segment contains the
//!   marker, all of its run texts are moved into the first run. Mixed inline
//!   formatting inside such a segment (a bold word, say) takes the first run's
//!   formatting. Tabs and line breaks delimit segments and stay in place.
//! - [`RunConsolidation::TokenSpans`]: only the runs an occurrence actually
//!   spans are touched; the value goes into the run where the occurrence
//!   starts. Formatting elsewhere in the paragraph is kept.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

use super::grammar::{has_marker, key_occurrences, replace_key};
use crate::core::DocfillError;
use crate::document::{Run, SurfaceRegion, TextSurfaceProvider};
use crate::facts::FactMap;

/// How fragmented runs are merged before matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunConsolidation {
    /// Merge every run of a segment that contains the marker
    #[default]
    Paragraph,
    /// Merge only the runs an occurrence spans
    TokenSpans,
}

impl fmt::Display for RunConsolidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunConsolidation::Paragraph => f.write_str("paragraph"),
            RunConsolidation::TokenSpans => f.write_str("token-spans"),
        }
    }
}

impl FromStr for RunConsolidation {
    type Err = DocfillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paragraph" => Ok(RunConsolidation::Paragraph),
            "token-spans" => Ok(RunConsolidation::TokenSpans),
            other => Err(DocfillError::ConfigError {
                message: format!(
                    "unknown run consolidation '{other}' (expected 'paragraph' or 'token-spans')"
                ),
            }),
        }
    }
}

/// Counters from one substitution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionStats {
    /// Regions visited
    pub regions: usize,
    /// Regions whose text changed
    pub rewritten: usize,
    /// Token occurrences replaced
    pub replacements: usize,
}

/// Replaces tokens with values across a template surface.
#[derive(Debug, Clone)]
pub struct SubstitutionEngine {
    entries: Vec<(String, String)>,
    consolidation: RunConsolidation,
}

impl SubstitutionEngine {
    /// Prepare an engine for `facts`.
    pub fn new(facts: &FactMap, consolidation: RunConsolidation) -> Self {
        let mut entries: Vec<(String, String)> =
            facts.iter().map(|(key, value)| (key.clone(), value.to_string())).collect();
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            entries,
            consolidation,
        }
    }

    /// Substitute every key into a plain string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use docfill::facts::FactMap;
    /// use docfill::templating::{RunConsolidation, SubstitutionEngine};
    ///
    /// let mut facts = FactMap::new();
    /// facts.insert("@nome".into(), "Ana".into());
    ///
    /// let engine = SubstitutionEngine::new(&facts, RunConsolidation::Paragraph);
    /// assert_eq!(engine.substitute_text("Cliente: @nome.").0, "Cliente: Ana.");
    /// assert_eq!(engine.substitute_text("contact@nome.com").0, "contact@nome.com");
    /// ```
    pub fn substitute_text(&self, text: &str) -> (String, usize) {
        let mut text = text.to_string();
        let mut count = 0;
        for (key, value) in &self.entries {
            if !text.contains(key.as_str()) {
                continue;
            }
            let (next, n) = replace_key(&text, key, value);
            text = next;
            count += n;
        }
        (text, count)
    }

    /// New run texts for a region, or `None` when nothing changes.
    pub fn rewrite_runs(&self, runs: &[Run]) -> Option<(Vec<String>, usize)> {
        let mut texts: Vec<String> = runs.iter().map(|run| run.text.clone()).collect();
        let mut count = 0;

        let mut start = 0;
        while start < runs.len() {
            let segment = runs[start].segment;
            let end = runs[start..]
                .iter()
                .position(|run| run.segment != segment)
                .map_or(runs.len(), |offset| start + offset);

            let group = &mut texts[start..end];
            if group.iter().any(|text| has_marker(text)) {
                if self.consolidation == RunConsolidation::Paragraph {
                    consolidate(group);
                }
                count += self.substitute_spanning(group);
            }
            start = end;
        }

        let changed = texts.iter().zip(runs).any(|(new, run)| *new != run.text);
        changed.then_some((texts, count))
    }

    /// Apply every key to a group of runs, treating them as one text.
    ///
    /// An occurrence spanning several runs is written into the run where it
    /// starts; its remaining characters are removed from the following runs.
    fn substitute_spanning(&self, runs: &mut [String]) -> usize {
        let mut count = 0;

        for (key, value) in &self.entries {
            let joined: String = runs.concat();
            if !joined.contains(key.as_str()) {
                continue;
            }
            let occurrences = key_occurrences(&joined, key);

            for &(start, end) in occurrences.iter().rev() {
                replace_span(runs, start, end, value);
            }
            count += occurrences.len();
        }

        count
    }

    /// Rewrite every region of `document`.
    pub fn apply(&self, document: &mut dyn TextSurfaceProvider) -> Result<SubstitutionStats, DocfillError> {
        let mut stats = SubstitutionStats::default();

        for region in document.regions() {
            stats.regions += 1;
            let Some((texts, count)) = self.rewrite_runs(region.runs()) else {
                continue;
            };

            trace!("Rewriting {} region {:?} ({count} replacement(s))", region.kind(), region.id());
            if let SurfaceRegion::RawMarkup { part, .. } = &region {
                trace!("Raw markup region in {part}");
            }
            document.rewrite(region.id(), texts)?;
            stats.rewritten += 1;
            stats.replacements += count;
        }

        debug!(
            "Substitution ({}): {} region(s), {} rewritten, {} replacement(s)",
            self.consolidation, stats.regions, stats.rewritten, stats.replacements
        );
        Ok(stats)
    }
}

/// Move all text of a multi-run group into its first run.
fn consolidate(runs: &mut [String]) {
    if runs.len() < 2 {
        return;
    }
    let full = runs.concat();
    runs[0] = full;
    for run in &mut runs[1..] {
        run.clear();
    }
}

/// Replace the byte span `[start, end)` of the concatenated runs with `value`.
fn replace_span(runs: &mut [String], start: usize, end: usize, value: &str) {
    let mut offset = 0;
    let mut placed = false;

    for run in runs.iter_mut() {
        let run_start = offset;
        let run_end = offset + run.len();
        offset = run_end;

        if run_end <= start || run.is_empty() {
            continue;
        }
        if run_start >= end {
            break;
        }

        let local_end = (end - run_start).min(run.len());
        if placed {
            run.replace_range(..local_end, "");
        } else {
            run.replace_range(start - run_start..local_end, value);
            placed = true;
        }
    }
}

//! Committed analysis results: ordered storage, labels, summaries
//!
//! One [`AnalysisResult`] per confirmed range analysis, held in insertion
//! order for the lifetime of the session. Statistics are frozen at commit
//! time; only the label may change afterwards. Lookups are non-throwing
//! (`Option`/`bool`) by contract.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::statistics::StatisticsSnapshot;

/// Longest accepted label, in characters.
pub const MAX_LABEL_LEN: usize = 50;

/// One committed range analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    /// User-facing name; unique among current results, mutable via rename.
    pub label: String,
    pub source_filename: String,
    pub mode_label: String,
    pub start_s: f64,
    pub end_s: f64,
    pub duration_s: f64,
    pub statistics: StatisticsSnapshot,
    pub created_at: DateTime<Utc>,
    pub chart_theme: String,
    /// Open key/value bag for collaborator annotations.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl AnalysisResult {
    /// One-line description used by pickers and logs.
    pub fn summary_text(&self) -> String {
        format!(
            "{} - {} ({:.3}s-{:.3}s)",
            self.label, self.mode_label, self.start_s, self.end_s
        )
    }
}

/// Input for [`ResultStore::add`]: everything a result needs except the
/// generated id, the creation timestamp and the default label.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub source_filename: String,
    pub mode_label: String,
    pub start_s: f64,
    pub end_s: f64,
    pub statistics: StatisticsSnapshot,
    pub chart_theme: String,
    pub label: Option<String>,
    pub metadata: Option<BTreeMap<String, Value>>,
}

/// Closed min/max interval over one summarized quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Single-pass summary over the whole store; zeroed when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub count: usize,
    pub modes: Vec<String>,
    pub files: Vec<String>,
    /// Over the results' average power, in mW.
    pub power_range_mw: ValueRange,
    /// Earliest start to latest end among the analyzed ranges.
    pub time_range_s: ValueRange,
}

/// One row of the canonical flattened view consumed by display tables and
/// the report generators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub id: Uuid,
    pub label: String,
    pub mode_label: String,
    pub source_filename: String,
    pub start_s: f64,
    pub end_s: f64,
    pub duration_s: f64,
    pub avg_power_mw: f64,
    pub max_power_mw: f64,
    pub avg_current_ma: f64,
    pub battery_hours: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&AnalysisResult> for ComparisonRow {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            id: result.id,
            label: result.label.clone(),
            mode_label: result.mode_label.clone(),
            source_filename: result.source_filename.clone(),
            start_s: result.start_s,
            end_s: result.end_s,
            duration_s: result.duration_s,
            avg_power_mw: result.statistics.avg_power_mw,
            max_power_mw: result.statistics.max_power_mw,
            avg_current_ma: result.statistics.avg_current_ma,
            battery_hours: result.statistics.battery_life.hours,
            created_at: result.created_at,
        }
    }
}

/// Ordered, session-owned collection of analysis results.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    results: Vec<AnalysisResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result and return its generated id.
    ///
    /// A missing label becomes `"Result {N}"` with N = current count + 1
    /// (count at insertion time, so numbers are reused after deletions),
    /// passed through [`ResultStore::unique_label`] so a reused number can
    /// never collide with a surviving label. Explicit labels are taken
    /// as-is; callers validate them first (see
    /// [`ResultStore::validate_label`]).
    pub fn add(&mut self, new: NewResult) -> Uuid {
        let label = match new.label {
            Some(label) => label,
            None => self.unique_label(&format!("Result {}", self.results.len() + 1)),
        };

        let id = Uuid::new_v4();
        let result = AnalysisResult {
            id,
            label,
            source_filename: new.source_filename,
            mode_label: new.mode_label,
            start_s: new.start_s,
            end_s: new.end_s,
            duration_s: new.end_s - new.start_s,
            statistics: new.statistics,
            created_at: Utc::now(),
            chart_theme: new.chart_theme,
            metadata: new.metadata.unwrap_or_default(),
        };

        debug!(%id, label = %result.label, "analysis result committed");
        self.results.push(result);
        id
    }

    /// Re-insert a previously exported result as-is, id and timestamp
    /// included. Used by the import path.
    pub fn insert(&mut self, result: AnalysisResult) {
        self.results.push(result);
    }

    pub fn get(&self, id: &Uuid) -> Option<&AnalysisResult> {
        self.results.iter().find(|r| r.id == *id)
    }

    /// Bounds-checked positional lookup; `None` on out-of-range.
    pub fn get_index(&self, index: usize) -> Option<&AnalysisResult> {
        self.results.get(index)
    }

    /// Change a result's label. Succeeds only if the id exists; uniqueness
    /// is a caller-side validation step, not enforced here.
    pub fn rename(&mut self, id: &Uuid, new_label: &str) -> bool {
        match self.results.iter_mut().find(|r| r.id == *id) {
            Some(result) => {
                result.label = new_label.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a result. Immediate and unrecoverable within the session.
    pub fn delete(&mut self, id: &Uuid) -> bool {
        let before = self.results.len();
        self.results.retain(|r| r.id != *id);
        self.results.len() < before
    }

    pub fn delete_index(&mut self, index: usize) -> bool {
        if index < self.results.len() {
            self.results.remove(index);
            true
        } else {
            false
        }
    }

    /// Remove every result; returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let count = self.results.len();
        self.results.clear();
        debug!(count, "result store cleared");
        count
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.iter()
    }

    pub fn find_by_mode(&self, mode_label: &str) -> Vec<&AnalysisResult> {
        self.results
            .iter()
            .filter(|r| r.mode_label == mode_label)
            .collect()
    }

    pub fn find_by_file(&self, source_filename: &str) -> Vec<&AnalysisResult> {
        self.results
            .iter()
            .filter(|r| r.source_filename == source_filename)
            .collect()
    }

    /// Single-pass summary; a zeroed structure when the store is empty,
    /// never a failure.
    pub fn summary(&self) -> ResultSummary {
        if self.results.is_empty() {
            return ResultSummary {
                count: 0,
                modes: Vec::new(),
                files: Vec::new(),
                power_range_mw: ValueRange { min: 0.0, max: 0.0 },
                time_range_s: ValueRange { min: 0.0, max: 0.0 },
            };
        }

        let mut modes = BTreeSet::new();
        let mut files = BTreeSet::new();
        let mut power_min = f64::INFINITY;
        let mut power_max = f64::NEG_INFINITY;
        let mut start_min = f64::INFINITY;
        let mut end_max = f64::NEG_INFINITY;

        for result in &self.results {
            modes.insert(result.mode_label.clone());
            files.insert(result.source_filename.clone());
            power_min = power_min.min(result.statistics.avg_power_mw);
            power_max = power_max.max(result.statistics.avg_power_mw);
            start_min = start_min.min(result.start_s);
            end_max = end_max.max(result.end_s);
        }

        ResultSummary {
            count: self.results.len(),
            modes: modes.into_iter().collect(),
            files: files.into_iter().collect(),
            power_range_mw: ValueRange {
                min: power_min,
                max: power_max,
            },
            time_range_s: ValueRange {
                min: start_min,
                max: end_max,
            },
        }
    }

    /// The canonical flatten of every result, in insertion order.
    pub fn comparison_table(&self) -> Vec<ComparisonRow> {
        self.results.iter().map(ComparisonRow::from).collect()
    }

    /// Check a candidate label: non-empty after trimming, at most
    /// [`MAX_LABEL_LEN`] characters, and not already in use (exact,
    /// case-sensitive match). The failure carries the human-readable
    /// reason.
    pub fn validate_label(&self, label: &str) -> Result<()> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(Error::LabelInvalid("label must not be empty".into()));
        }
        if trimmed.chars().count() > MAX_LABEL_LEN {
            return Err(Error::LabelInvalid(format!(
                "label must not exceed {MAX_LABEL_LEN} characters"
            )));
        }
        if self.results.iter().any(|r| r.label == trimmed) {
            return Err(Error::LabelInvalid(format!(
                "label '{trimmed}' is already in use"
            )));
        }
        Ok(())
    }

    /// Derive a label guaranteed absent from the store: `base` itself when
    /// free, otherwise `"{base} (n)"` with the smallest n starting at 1.
    pub fn unique_label(&self, base: &str) -> String {
        let taken = |candidate: &str| self.results.iter().any(|r| r.label == candidate);

        if !taken(base) {
            return base.to_string();
        }
        let mut counter = 1u32;
        loop {
            let candidate = format!("{base} ({counter})");
            if !taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

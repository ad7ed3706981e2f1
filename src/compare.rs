//! Cross-result comparison: aggregate statistics and baseline rankings

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::results::{AnalysisResult, ResultStore};

/// Min/max/mean/std/range over one compared quantity.
///
/// Std here is the population standard deviation, so a single-result
/// comparison yields std = 0 and range = 0 rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub range: f64,
}

impl AggregateStats {
    fn over(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            min,
            max,
            mean,
            std: variance.sqrt(),
            range: max - min,
        }
    }
}

/// Aggregate comparison over a selected set of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub count: usize,
    pub modes: Vec<String>,
    pub files: Vec<String>,
    /// Over average power, in mW.
    pub power_stats: AggregateStats,
    /// Over projected battery life, in hours.
    pub battery_stats: AggregateStats,
    /// Over the analyzed span, in seconds.
    pub duration_stats: AggregateStats,
}

/// One result's power draw relative to the set baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineEntry {
    pub id: Uuid,
    pub label: String,
    pub avg_power_w: f64,
    /// Increase over the baseline (the set's minimum average power), in
    /// percent; 0.0 for the baseline itself and whenever the baseline
    /// draws no power.
    pub power_increase_percent: f64,
}

/// Aggregate the selected results. Requires at least one resolvable id;
/// ids not present in the store are skipped.
pub fn compare(store: &ResultStore, ids: &[Uuid]) -> Result<ComparisonSummary> {
    let selected = resolve(store, ids)?;

    let powers: Vec<f64> = selected.iter().map(|r| r.statistics.avg_power_mw).collect();
    let batteries: Vec<f64> = selected
        .iter()
        .map(|r| r.statistics.battery_life.hours)
        .collect();
    let durations: Vec<f64> = selected.iter().map(|r| r.duration_s).collect();

    let mut modes: Vec<String> = selected.iter().map(|r| r.mode_label.clone()).collect();
    modes.sort();
    modes.dedup();
    let mut files: Vec<String> = selected
        .iter()
        .map(|r| r.source_filename.clone())
        .collect();
    files.sort();
    files.dedup();

    Ok(ComparisonSummary {
        count: selected.len(),
        modes,
        files,
        power_stats: AggregateStats::over(&powers),
        battery_stats: AggregateStats::over(&batteries),
        duration_stats: AggregateStats::over(&durations),
    })
}

/// Rank the selected results against the lowest average power among them.
pub fn baseline_relative(store: &ResultStore, ids: &[Uuid]) -> Result<Vec<BaselineEntry>> {
    let selected = resolve(store, ids)?;

    let baseline_power = selected
        .iter()
        .map(|r| r.statistics.avg_power_w)
        .fold(f64::INFINITY, f64::min);

    Ok(selected
        .iter()
        .map(|r| {
            let avg_power_w = r.statistics.avg_power_w;
            let power_increase_percent = if baseline_power > 0.0 {
                (avg_power_w - baseline_power) / baseline_power * 100.0
            } else {
                0.0
            };
            BaselineEntry {
                id: r.id,
                label: r.label.clone(),
                avg_power_w,
                power_increase_percent,
            }
        })
        .collect())
}

fn resolve<'a>(store: &'a ResultStore, ids: &[Uuid]) -> Result<Vec<&'a AnalysisResult>> {
    let selected: Vec<&AnalysisResult> = ids.iter().filter_map(|id| store.get(id)).collect();
    if selected.is_empty() {
        return Err(Error::EmptyInput(
            "comparison needs at least one stored result".into(),
        ));
    }
    Ok(selected)
}

//! Explicit per-session analysis context
//!
//! All core operations hang off one [`AnalysisSession`] value created at
//! session start and dropped at session end; nothing is process-global.
//! Each session assumes a single logical thread of control, so there is no
//! interior locking; concurrent sessions must each own their own
//! `AnalysisSession`.

use std::path::Path;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::export::{self, ExportDocument};
use crate::loader;
use crate::preview::{PreviewCache, RangePreview};
use crate::results::{NewResult, ResultStore};
use crate::series::PowerSeries;
use crate::types::{BatterySpec, TimeRange};

/// Plot theme recorded on committed results when none is configured.
pub const DEFAULT_CHART_THEME: &str = "plotly_white";

/// One user session: the loaded series, the preview cache, the committed
/// results, and the battery spec used for projections.
#[derive(Debug)]
pub struct AnalysisSession {
    series: Option<PowerSeries>,
    previews: PreviewCache,
    results: ResultStore,
    battery: BatterySpec,
    chart_theme: String,
}

impl AnalysisSession {
    pub fn new(battery: BatterySpec) -> Self {
        Self {
            series: None,
            previews: PreviewCache::new(),
            results: ResultStore::new(),
            battery,
            chart_theme: DEFAULT_CHART_THEME.to_string(),
        }
    }

    pub fn with_chart_theme(mut self, theme: impl Into<String>) -> Self {
        self.chart_theme = theme.into();
        self
    }

    /// Replace the loaded series.
    ///
    /// Cached previews were computed from the previous series' contents,
    /// so the cache is cleared here; this is the session's one implicit
    /// call to the explicit invalidation point.
    pub fn load_series(&mut self, series: PowerSeries) {
        info!(
            source = %series.source_name(),
            mode = %series.mode_label(),
            rows = series.len(),
            "series loaded"
        );
        self.previews.clear();
        self.series = Some(series);
    }

    /// Load a measurement CSV from disk and make it the current series.
    pub fn load_csv_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let series = loader::load_csv(path)?;
        self.load_series(series);
        Ok(())
    }

    pub fn series(&self) -> Option<&PowerSeries> {
        self.series.as_ref()
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut ResultStore {
        &mut self.results
    }

    pub fn battery(&self) -> &BatterySpec {
        &self.battery
    }

    /// Change the battery spec. Projections in cached previews were
    /// computed with the old spec, so the cache is cleared too.
    pub fn set_battery(&mut self, battery: BatterySpec) {
        self.previews.clear();
        self.battery = battery;
    }

    /// Cache statistics for diagnostics (hit/miss counters, entry count).
    pub fn preview_cache(&self) -> &PreviewCache {
        &self.previews
    }

    /// Evaluate a candidate range against the current series, memoized.
    pub fn preview(&mut self, start_s: f64, end_s: f64) -> Result<RangePreview> {
        let Some(series) = &self.series else {
            return Err(no_series());
        };
        self.previews
            .get_or_compute(series, TimeRange::new(start_s, end_s), &self.battery)
    }

    /// Commit a validated range analysis into the result store.
    ///
    /// An explicit label is validated first (non-empty, length bound,
    /// uniqueness) and the whole commit fails on a bad one; a missing
    /// label gets the store's default numbering. Returns the new result's
    /// id.
    pub fn commit(&mut self, start_s: f64, end_s: f64, label: Option<&str>) -> Result<Uuid> {
        let preview = self.preview(start_s, end_s)?;

        let label = match label {
            Some(raw) => {
                self.results.validate_label(raw)?;
                Some(raw.trim().to_string())
            }
            None => None,
        };

        let Some(series) = &self.series else {
            return Err(no_series());
        };
        let id = self.results.add(NewResult {
            source_filename: series.source_name().to_string(),
            mode_label: series.mode_label().to_string(),
            start_s,
            end_s,
            statistics: preview.stats,
            chart_theme: self.chart_theme.clone(),
            label,
            metadata: None,
        });
        Ok(id)
    }

    /// Append a previously exported document's results to this session.
    pub fn import_document(&mut self, document: ExportDocument) -> usize {
        export::import(&mut self.results, document)
    }

    /// Drop the loaded series, cached previews and stored results. The
    /// session stays usable afterwards.
    pub fn reset(&mut self) {
        debug!("session reset");
        self.series = None;
        self.previews.clear();
        self.results.clear_all();
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(BatterySpec::default())
    }
}

fn no_series() -> Error {
    Error::EmptyInput("no series loaded in this session".into())
}

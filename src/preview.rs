//! Memoized range evaluation for interactive previews
//!
//! While a range selector is dragged, the same (start, end) pair is
//! evaluated over and over. The cache keys evaluations at a fixed 1e-6 s
//! granularity so floating-point noise in the selector cannot blow up the
//! key space. The rounding is a contract, not an implementation detail.

use std::collections::HashMap;

use tracing::trace;

use crate::error::Result;
use crate::range::{filter_range, validate_range};
use crate::series::PowerSeries;
use crate::statistics::{self, StatisticsSnapshot};
use crate::types::{BatterySpec, PowerSample, TimeRange};

/// Microsecond-granularity cache key.
///
/// Two float presentations of a range that round to the same microsecond
/// deliberately collide to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeKey {
    start_us: i64,
    end_us: i64,
}

impl RangeKey {
    pub fn from_range(range: TimeRange) -> Self {
        Self {
            start_us: to_micros(range.start_s),
            end_us: to_micros(range.end_s),
        }
    }
}

fn to_micros(seconds: f64) -> i64 {
    (seconds * 1e6).round() as i64
}

/// One evaluated range: the filtered rows plus their statistics snapshot,
/// ready for chart rendering and metric display.
#[derive(Debug, Clone, PartialEq)]
pub struct RangePreview {
    pub range: TimeRange,
    pub data_points: usize,
    pub total_data_points: usize,
    /// Share of the loaded series selected by this range, in percent.
    pub coverage_percent: f64,
    pub stats: StatisticsSnapshot,
    pub samples: Vec<PowerSample>,
}

/// Memoizes validate -> filter -> compute results by rounded range key.
///
/// Entries never expire on their own: [`PreviewCache::clear`] is the only
/// invalidation point, called when a new series (or battery spec) replaces
/// the inputs the entries were computed from. Reads and writes happen on
/// the single session thread; no locking.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: HashMap<RangeKey, RangePreview>,
    hits: u64,
    misses: u64,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached preview for `range`, computing and storing it on
    /// a miss.
    ///
    /// On a miss the pipeline short-circuits on the first failure
    /// (validation, empty filter result, empty table) and nothing is
    /// cached for the failed key.
    pub fn get_or_compute(
        &mut self,
        series: &PowerSeries,
        range: TimeRange,
        battery: &BatterySpec,
    ) -> Result<RangePreview> {
        let key = RangeKey::from_range(range);

        if let Some(entry) = self.entries.get(&key) {
            self.hits += 1;
            trace!(?key, "preview cache hit");
            return Ok(entry.clone());
        }

        validate_range(range, series.metadata())?;
        let samples = filter_range(series, range)?;
        let stats = statistics::compute(&samples, battery)?;

        let preview = RangePreview {
            range,
            data_points: samples.len(),
            total_data_points: series.len(),
            coverage_percent: samples.len() as f64 / series.len() as f64 * 100.0,
            stats,
            samples,
        };

        self.misses += 1;
        trace!(?key, "preview cache miss");
        self.entries.insert(key, preview.clone());
        Ok(preview)
    }

    /// Drop every cached entry and reset the hit/miss counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

//! Time-range admissibility checks and series filtering

use crate::error::{Bound, Error, Result};
use crate::series::{PowerSeries, SeriesMetadata};
use crate::types::{PowerSample, TimeRange};

/// Minimum admissible span, in units of the series time resolution.
const MIN_SPAN_RESOLUTION_UNITS: f64 = 2.0;

/// Decide whether `range` may be analyzed against a series with `meta`.
///
/// Checks run in a fixed order so the reported failure is deterministic:
/// ordering, lower bound, upper bound, minimum span. The first failing
/// check wins.
pub fn validate_range(range: TimeRange, meta: &SeriesMetadata) -> Result<()> {
    if range.start_s >= range.end_s {
        return Err(Error::InvalidOrder {
            start: range.start_s,
            end: range.end_s,
        });
    }

    if range.start_s < meta.min_time_s {
        return Err(Error::OutOfBounds {
            bound: Bound::Lower,
            value: range.start_s,
            limit: meta.min_time_s,
        });
    }

    if range.end_s > meta.max_time_s {
        return Err(Error::OutOfBounds {
            bound: Bound::Upper,
            value: range.end_s,
            limit: meta.max_time_s,
        });
    }

    // A range covering the whole series is always admissible, even when
    // the series is so short that its full span sits below the usual
    // minimum (a 2-point series has total_duration < 2 x resolution).
    let covers_all = range.start_s <= meta.min_time_s && range.end_s >= meta.max_time_s;
    if meta.time_resolution_s > 0.0 && !covers_all {
        let min_span = MIN_SPAN_RESOLUTION_UNITS * meta.time_resolution_s;
        if range.span_s() < min_span {
            return Err(Error::RangeTooSmall {
                span: range.span_s(),
                min_span,
            });
        }
    }

    Ok(())
}

/// Project a series onto the rows whose time falls inside `range`,
/// inclusive on both ends.
///
/// The range must already have passed [`validate_range`]; an empty
/// selection is still possible with sparse, non-uniform sampling and is
/// reported as [`Error::EmptyResult`] rather than tolerated. The source
/// series is not mutated.
pub fn filter_range(series: &PowerSeries, range: TimeRange) -> Result<Vec<PowerSample>> {
    let rows: Vec<PowerSample> = series
        .samples()
        .iter()
        .filter(|s| s.time_s >= range.start_s && s.time_s <= range.end_s)
        .copied()
        .collect();

    if rows.is_empty() {
        return Err(Error::EmptyResult {
            start: range.start_s,
            end: range.end_s,
        });
    }

    Ok(rows)
}

//! Cleaned, time-sorted measurement series and its derived metadata

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::PowerSample;

/// Derived time-domain metadata for a loaded series.
///
/// Recomputed by [`PowerSeries::build`] whenever the underlying table
/// changes; read-only to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub min_time_s: f64,
    pub max_time_s: f64,
    pub total_duration_s: f64,
    pub data_points: usize,
    /// Mean of the strictly positive consecutive time deltas. 0.0 when the
    /// series has fewer than two rows or no positive deltas.
    pub time_resolution_s: f64,
}

/// A single loaded measurement source: the owned sample table plus its
/// metadata and the context strings supplied by the loader.
#[derive(Debug, Clone)]
pub struct PowerSeries {
    samples: Vec<PowerSample>,
    metadata: SeriesMetadata,
    source_name: String,
    mode_label: String,
}

impl PowerSeries {
    /// Build a series from raw samples.
    ///
    /// Rows whose time is non-finite count as failed numeric coercion and
    /// are dropped, as are rows with negative time; the survivors are
    /// sorted ascending by time. Dropping rows is not fatal unless nothing
    /// survives.
    pub fn build(
        samples: Vec<PowerSample>,
        source_name: impl Into<String>,
        mode_label: impl Into<String>,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptyInput("series input has no rows".into()));
        }

        let before = samples.len();
        let mut rows: Vec<PowerSample> = samples
            .into_iter()
            .filter(|s| s.time_s.is_finite() && s.time_s >= 0.0)
            .collect();
        if rows.is_empty() {
            return Err(Error::NonNumericTime);
        }
        if rows.len() < before {
            debug!(
                dropped = before - rows.len(),
                "dropped rows with unusable time values"
            );
        }

        rows.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        let metadata = compute_metadata(&rows);

        Ok(Self {
            samples: rows,
            metadata,
            source_name: source_name.into(),
            mode_label: mode_label.into(),
        })
    }

    pub fn samples(&self) -> &[PowerSample] {
        &self.samples
    }

    pub fn metadata(&self) -> &SeriesMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// File name (or synthetic name) of the loaded source.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Operating-mode label attached by the loader.
    pub fn mode_label(&self) -> &str {
        &self.mode_label
    }
}

fn compute_metadata(rows: &[PowerSample]) -> SeriesMetadata {
    let min_time_s = rows[0].time_s;
    let max_time_s = rows[rows.len() - 1].time_s;

    let mut delta_sum = 0.0;
    let mut delta_count = 0usize;
    for pair in rows.windows(2) {
        let dt = pair[1].time_s - pair[0].time_s;
        if dt > 0.0 {
            delta_sum += dt;
            delta_count += 1;
        }
    }
    let time_resolution_s = if delta_count > 0 {
        delta_sum / delta_count as f64
    } else {
        0.0
    };

    SeriesMetadata {
        min_time_s,
        max_time_s,
        total_duration_s: max_time_s - min_time_s,
        data_points: rows.len(),
        time_resolution_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64) -> PowerSample {
        PowerSample::new(t, 3.7, 0.0135, 0.05)
    }

    #[test]
    fn test_build_sorts_by_time() {
        let series =
            PowerSeries::build(vec![sample(2.0), sample(0.0), sample(1.0)], "log.csv", "Nolight")
                .unwrap();
        let times: Vec<f64> = series.samples().iter().map(|s| s.time_s).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_build_drops_unusable_time_rows() {
        let series = PowerSeries::build(
            vec![sample(0.0), sample(f64::NAN), sample(-1.0), sample(2.0)],
            "log.csv",
            "Nolight",
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.metadata().data_points, 2);
    }

    #[test]
    fn test_build_rejects_empty_input() {
        let err = PowerSeries::build(vec![], "log.csv", "Nolight").unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }

    #[test]
    fn test_build_rejects_all_rows_dropped() {
        let err = PowerSeries::build(
            vec![sample(f64::NAN), sample(-5.0)],
            "log.csv",
            "Nolight",
        )
        .unwrap_err();
        assert!(matches!(err, Error::NonNumericTime));
    }

    #[test]
    fn test_metadata_resolution_is_mean_positive_delta() {
        // Deltas 1.0, 0.0, 2.0 -> mean of the positive ones is 1.5
        let series = PowerSeries::build(
            vec![sample(0.0), sample(1.0), sample(1.0), sample(3.0)],
            "log.csv",
            "Nolight",
        )
        .unwrap();
        let meta = series.metadata();
        assert!((meta.time_resolution_s - 1.5).abs() < 1e-12);
        assert!((meta.total_duration_s - 3.0).abs() < 1e-12);
        assert_eq!(meta.data_points, 4);
    }

    #[test]
    fn test_metadata_single_row_has_zero_resolution() {
        let series = PowerSeries::build(vec![sample(5.0)], "log.csv", "Nolight").unwrap();
        let meta = series.metadata();
        assert_eq!(meta.time_resolution_s, 0.0);
        assert_eq!(meta.total_duration_s, 0.0);
        assert_eq!(meta.min_time_s, 5.0);
        assert_eq!(meta.max_time_s, 5.0);
    }
}

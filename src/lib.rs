//! # Powertrace
//!
//! Time-range analysis and battery-life projection for device power
//! measurement logs (time, voltage, current, power vs. time).
//!
//! ## Quick Start
//!
//! ```rust
//! use powertrace::{AnalysisSession, BatterySpec, PowerSample, PowerSeries};
//!
//! // Ten samples at a constant 50 mW draw
//! let samples: Vec<PowerSample> = (0..10)
//!     .map(|t| PowerSample::new(t as f64, 3.7, 0.0135, 0.05))
//!     .collect();
//! let series = PowerSeries::build(samples, "bench.csv", "Nolight").unwrap();
//!
//! let mut session = AnalysisSession::new(BatterySpec::default());
//! session.load_series(series);
//!
//! // Preview a sub-range, then commit it as a named result
//! let preview = session.preview(2.0, 8.0).unwrap();
//! assert_eq!(preview.data_points, 7);
//!
//! let id = session.commit(2.0, 8.0, Some("idle draw")).unwrap();
//! let result = session.results().get(&id).unwrap();
//! assert!((result.statistics.avg_power_mw - 50.0).abs() < 1e-9);
//! ```
//!
//! ## Pipeline
//!
//! 1. **Load**: CSV logs (time, voltage, current, power) become a cleaned,
//!    time-sorted [`PowerSeries`] with derived [`SeriesMetadata`].
//! 2. **Preview**: candidate ranges are validated, filtered and summarized
//!    through a memoized [`PreviewCache`] while a range selector is
//!    dragged.
//! 3. **Commit**: a confirmed range freezes its [`StatisticsSnapshot`]
//!    into an [`AnalysisResult`] held by the session's [`ResultStore`].
//! 4. **Compare / export**: committed results feed aggregate comparisons,
//!    a round-trippable JSON document, and CSV/Markdown reports.
//!
//! The core is synchronous and session-scoped: every operation runs on the
//! caller's thread against one [`AnalysisSession`], and sessions share
//! nothing.

pub mod compare;
pub mod error;
pub mod export;
pub mod loader;
pub mod preview;
pub mod range;
pub mod report;
pub mod results;
pub mod series;
pub mod session;
pub mod statistics;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Bound, Error, Result};
pub use export::ExportDocument;
pub use preview::{PreviewCache, RangeKey, RangePreview};
pub use results::{
    AnalysisResult, ComparisonRow, NewResult, ResultStore, ResultSummary, MAX_LABEL_LEN,
};
pub use series::{PowerSeries, SeriesMetadata};
pub use session::{AnalysisSession, DEFAULT_CHART_THEME};
pub use statistics::StatisticsSnapshot;
pub use types::{BatteryLife, BatterySpec, PowerSample, TimeRange};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!NAME.is_empty());
        assert!(!DESCRIPTION.is_empty());
    }

    #[test]
    fn test_types_export() {
        // Test that we can create and use exported types
        let spec = BatterySpec::default();
        assert!(spec.capacity_mah > 0.0);
        let sample = PowerSample::new(0.0, 3.7, 0.0135, 0.05);
        assert!(sample.is_finite());
    }
}

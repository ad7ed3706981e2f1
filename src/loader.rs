//! Measurement log ingestion
//!
//! Consumes CSV logs whose first four columns are, positionally, time,
//! voltage, current and power. Cells that fail numeric coercion make the
//! row unusable and the row is dropped; only a file yielding no usable
//! rows at all is an error.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::series::PowerSeries;
use crate::types::PowerSample;

/// Columns every log must carry, in order.
const REQUIRED_COLUMNS: usize = 4;

/// Load a measurement CSV from disk.
///
/// The source name is the file name and the mode label is guessed from it
/// via [`detect_mode_from_filename`].
pub fn load_csv(path: impl AsRef<Path>) -> Result<PowerSeries> {
    let path = path.as_ref();
    let source_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();
    let stem = path.file_stem().and_then(|n| n.to_str()).unwrap_or("");
    let mode_label = detect_mode_from_filename(stem);

    let file = std::fs::File::open(path)?;
    load_csv_reader(file, &source_name, mode_label)
}

/// Read a measurement log from any reader.
///
/// The first row is treated as a header; it must declare at least four
/// columns. Extra columns are ignored. Rows with a non-numeric cell in the
/// first four positions, or a negative power value, are dropped.
pub fn load_csv_reader<R: Read>(
    reader: R,
    source_name: &str,
    mode_label: &str,
) -> Result<PowerSeries> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.len() < REQUIRED_COLUMNS {
        return Err(Error::MissingTimeColumn {
            found: headers.len(),
        });
    }

    let mut samples = Vec::new();
    let mut dropped = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        let time_s = coerce(record.get(0));
        let voltage_v = coerce(record.get(1));
        let current_a = coerce(record.get(2));
        let power_w = coerce(record.get(3));

        let sample = PowerSample::new(time_s, voltage_v, current_a, power_w);
        if !sample.is_finite() || sample.power_w < 0.0 {
            dropped += 1;
            continue;
        }
        samples.push(sample);
    }

    if dropped > 0 {
        debug!(dropped, source = source_name, "dropped unusable rows during load");
    }
    if samples.is_empty() && dropped > 0 {
        return Err(Error::NonNumericTime);
    }

    PowerSeries::build(samples, source_name, mode_label)
}

fn coerce(cell: Option<&str>) -> f64 {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Guess the operating-mode label from a log's file name.
pub fn detect_mode_from_filename(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if lower.contains("nolight") || lower.contains("no light") {
        "Nolight"
    } else if lower.contains("breath") {
        "Breath"
    } else if lower.contains("colorcycle") || lower.contains("color cycle") || lower.contains("color")
    {
        "Colorcycle"
    } else if lower.contains("flash") {
        "Flash"
    } else {
        "Unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Time,Voltage,Current,Power
0.0,3.70,0.0135,0.050
1.0,3.69,0.0140,0.052
2.0,3.70,0.0130,0.048
";

    #[test]
    fn test_load_basic_log() {
        let series = load_csv_reader(SAMPLE_CSV.as_bytes(), "nolight_run1.csv", "Nolight").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.source_name(), "nolight_run1.csv");
        assert_eq!(series.mode_label(), "Nolight");
        assert!((series.metadata().total_duration_s - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rows_with_bad_cells_are_dropped() {
        let csv = "\
Time,Voltage,Current,Power
0.0,3.70,0.0135,0.050
oops,3.70,0.0135,0.050
2.0,3.70,0.0135,not-a-number
3.0,3.70,0.0135,-0.010
4.0,3.70,0.0135,0.049
";
        let series = load_csv_reader(csv.as_bytes(), "log.csv", "Unknown").unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_too_few_columns_is_rejected() {
        let csv = "Time,Voltage,Current\n0.0,3.7,0.01\n";
        let err = load_csv_reader(csv.as_bytes(), "log.csv", "Unknown").unwrap_err();
        assert!(matches!(err, Error::MissingTimeColumn { found: 3 }));
    }

    #[test]
    fn test_all_rows_unusable_is_non_numeric_time() {
        let csv = "Time,Voltage,Current,Power\nx,y,z,w\n";
        let err = load_csv_reader(csv.as_bytes(), "log.csv", "Unknown").unwrap_err();
        assert!(matches!(err, Error::NonNumericTime));
    }

    #[test]
    fn test_header_only_file_is_empty_input() {
        let csv = "Time,Voltage,Current,Power\n";
        let err = load_csv_reader(csv.as_bytes(), "log.csv", "Unknown").unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let csv = "Time,Voltage,Current,Power,Note\n0.0,3.7,0.01,0.04,warmup\n1.0,3.7,0.01,0.04,steady\n";
        let series = load_csv_reader(csv.as_bytes(), "log.csv", "Unknown").unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_mode_detection_heuristics() {
        assert_eq!(detect_mode_from_filename("NoLight_run3"), "Nolight");
        assert_eq!(detect_mode_from_filename("breath-2024"), "Breath");
        assert_eq!(detect_mode_from_filename("ColorCycle"), "Colorcycle");
        assert_eq!(detect_mode_from_filename("flash_test"), "Flash");
        assert_eq!(detect_mode_from_filename("baseline"), "Unknown");
    }
}

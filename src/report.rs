//! Human-facing reports over the comparison table
//!
//! Both generators consume [`ResultStore::comparison_table`], the same
//! flatten the display layer uses, so a report always matches what the
//! user saw on screen.

use std::fmt::Write as _;

use chrono::Utc;

use crate::compare;
use crate::error::Result;
use crate::results::ResultStore;
use uuid::Uuid;

/// Render the comparison table as CSV, omitting the internal id column.
pub fn csv_report(store: &ResultStore) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Label",
        "Mode",
        "File",
        "Start (s)",
        "End (s)",
        "Duration (s)",
        "Avg Power (mW)",
        "Max Power (mW)",
        "Avg Current (mA)",
        "Battery Life (h)",
        "Analyzed At",
    ])?;

    for row in store.comparison_table() {
        writer.write_record([
            row.label,
            row.mode_label,
            row.source_filename,
            format!("{:.3}", row.start_s),
            format!("{:.3}", row.end_s),
            format!("{:.3}", row.duration_s),
            format!("{:.2}", row.avg_power_mw),
            format!("{:.2}", row.max_power_mw),
            format!("{:.2}", row.avg_current_ma),
            format!("{:.1}", row.battery_hours),
            row.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render a Markdown report: one section per result, plus an aggregate
/// comparison block when more than one result exists.
pub fn markdown_report(store: &ResultStore) -> String {
    let summary = store.summary();
    if summary.count == 0 {
        return "# Time Range Analysis Report\n\nNo analysis results.\n".to_string();
    }

    let mut report = String::new();
    let _ = writeln!(report, "# Time Range Analysis Report\n");
    let _ = writeln!(
        report,
        "**Generated**: {}  ",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(report, "**Results**: {}  ", summary.count);
    let _ = writeln!(report, "**Modes**: {}  ", summary.modes.join(", "));
    let _ = writeln!(report, "**Files**: {}\n", summary.files.join(", "));
    let _ = writeln!(report, "## Analyzed Ranges\n");

    for (index, row) in store.comparison_table().into_iter().enumerate() {
        let _ = writeln!(report, "### {}. {}\n", index + 1, row.label);
        let _ = writeln!(report, "- **Mode**: {}", row.mode_label);
        let _ = writeln!(report, "- **File**: {}", row.source_filename);
        let _ = writeln!(
            report,
            "- **Time range**: {:.3}s - {:.3}s ({})",
            row.start_s,
            row.end_s,
            format_duration(row.duration_s)
        );
        let _ = writeln!(
            report,
            "- **Average power**: {}",
            format_power(row.avg_power_mw / 1000.0)
        );
        let _ = writeln!(
            report,
            "- **Maximum power**: {}",
            format_power(row.max_power_mw / 1000.0)
        );
        let _ = writeln!(report, "- **Average current**: {:.2} mA", row.avg_current_ma);
        let _ = writeln!(
            report,
            "- **Projected battery life**: {:.1} h",
            row.battery_hours
        );
        let _ = writeln!(
            report,
            "- **Analyzed at**: {}\n",
            row.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    if summary.count > 1 {
        let ids: Vec<Uuid> = store.iter().map(|r| r.id).collect();
        if let Ok(comparison) = compare::compare(store, &ids) {
            let power = comparison.power_stats;
            let _ = writeln!(report, "## Comparison\n");
            let _ = writeln!(report, "- **Highest average power**: {:.2} mW", power.max);
            let _ = writeln!(report, "- **Lowest average power**: {:.2} mW", power.min);
            let _ = writeln!(report, "- **Power spread**: {:.2} mW", power.range);
            let _ = writeln!(report, "- **Mean average power**: {:.2} mW", power.mean);
            let _ = writeln!(report, "- **Power std deviation**: {:.2} mW", power.std);
        }
        if let Ok(entries) = compare::baseline_relative(store, &ids) {
            let _ = writeln!(report, "\n### Relative to baseline\n");
            for entry in entries {
                let _ = writeln!(
                    report,
                    "- {}: +{:.1}% over baseline",
                    entry.label, entry.power_increase_percent
                );
            }
        }
    }

    report
}

/// Format a power value, auto-selecting W or mW.
pub fn format_power(power_w: f64) -> String {
    if power_w >= 1.0 {
        format!("{power_w:.3} W")
    } else {
        format!("{:.2} mW", power_w * 1000.0)
    }
}

/// Format a duration in seconds as seconds, minutes, hours or days.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{seconds:.1} s")
    } else if seconds < 3600.0 {
        format!("{:.1} min", seconds / 60.0)
    } else if seconds < 86400.0 {
        format!("{:.1} h", seconds / 3600.0)
    } else {
        format!("{:.1} d", seconds / 86400.0)
    }
}

//! `powertrace-report`: analyze measurement logs from the command line
//!
//! Loads one or more CSV logs, analyzes each file's full span, prints a
//! summary table with battery projections, and optionally writes the JSON
//! export document and a Markdown report.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use tracing_subscriber::EnvFilter;

use powertrace::{compare, export, report, AnalysisSession, BatterySpec};

#[derive(Debug, Parser)]
#[command(
    name = "powertrace-report",
    version,
    about = "Analyze device power measurement logs and project battery life"
)]
struct Args {
    /// Measurement CSV files (columns: time, voltage, current, power)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Battery capacity used for run-time projection, in mAh
    #[arg(long, default_value_t = 1000.0)]
    capacity_mah: f64,

    /// Battery voltage used for run-time projection, in volts
    #[arg(long, default_value_t = 3.7)]
    voltage: f64,

    /// Write the JSON export document to this path
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Write a Markdown report to this path
    #[arg(long)]
    markdown: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let battery = BatterySpec::new(args.capacity_mah, args.voltage);
    let mut session = AnalysisSession::new(battery);

    for path in &args.files {
        session
            .load_csv_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        let meta = *session
            .series()
            .context("no series loaded after a successful load")?
            .metadata();
        session
            .commit(meta.min_time_s, meta.max_time_s, None)
            .with_context(|| format!("failed to analyze {}", path.display()))?;
    }

    print_summary_table(&session);

    if session.results().len() > 1 {
        print_baseline_comparison(&session)?;
    }

    if let Some(path) = &args.export_json {
        let document = export::encode(session.results());
        fs::write(path, export::to_json(&document)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Export written to {}", path.display());
    }

    if let Some(path) = &args.markdown {
        fs::write(path, report::markdown_report(session.results()))
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_summary_table(session: &AnalysisSession) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header([
        "Label",
        "Mode",
        "File",
        "Duration",
        "Avg Power",
        "Max Power",
        "Avg Current",
        "Battery Life",
    ]);

    for row in session.results().comparison_table() {
        table.add_row([
            row.label,
            row.mode_label,
            row.source_filename,
            report::format_duration(row.duration_s),
            report::format_power(row.avg_power_mw / 1000.0),
            report::format_power(row.max_power_mw / 1000.0),
            format!("{:.2} mA", row.avg_current_ma),
            if row.battery_hours.is_finite() {
                format!("{:.1} h", row.battery_hours)
            } else {
                "unbounded".to_string()
            },
        ]);
    }

    println!("{table}");
}

fn print_baseline_comparison(session: &AnalysisSession) -> Result<()> {
    let ids: Vec<_> = session.results().iter().map(|r| r.id).collect();
    let entries = compare::baseline_relative(session.results(), &ids)?;

    println!("\nRelative to the lowest-power result:");
    for entry in entries {
        println!(
            "  {}: {} (+{:.1}%)",
            entry.label,
            report::format_power(entry.avg_power_w),
            entry.power_increase_percent
        );
    }
    Ok(())
}

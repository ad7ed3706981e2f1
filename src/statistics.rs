//! Descriptive statistics and battery-life projection
//!
//! Closed-form single-pass statistics over a sample table (full series or
//! filtered range): mean/min/max, sample standard deviation, trapezoidal
//! energy integral, and battery run-time projection from the average power
//! draw. Pure functions, no I/O.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{BatteryLife, BatterySpec, PowerSample};

/// Frozen statistics for one table.
///
/// Fixed, fully typed fields. Both SI and display-scaled (mA/mW) values
/// are part of the contract so consumers never rescale. Immutable once
/// produced; a committed result owns its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub data_points: usize,
    /// Actual covered span: max(time) - min(time) of the analyzed table,
    /// which may be narrower than the requested range at the edges.
    pub duration_s: f64,

    pub avg_voltage_v: f64,
    pub max_voltage_v: f64,
    pub min_voltage_v: f64,
    pub std_voltage_v: f64,

    pub avg_current_a: f64,
    pub avg_current_ma: f64,
    pub max_current_a: f64,
    pub max_current_ma: f64,
    pub min_current_a: f64,
    pub min_current_ma: f64,
    pub std_current_a: f64,
    pub std_current_ma: f64,

    pub avg_power_w: f64,
    pub avg_power_mw: f64,
    pub max_power_w: f64,
    pub max_power_mw: f64,
    pub min_power_w: f64,
    pub min_power_mw: f64,
    pub std_power_w: f64,
    pub std_power_mw: f64,

    /// Trapezoidal integral of power over time; 0.0 below two rows.
    pub total_energy_j: f64,
    /// std(power) / mean(power); 0.0 when the mean is not positive.
    pub cv_power: f64,
    pub battery_life: BatteryLife,
}

/// Compute a snapshot over `samples` with the given battery spec.
///
/// Fails only on an empty table.
pub fn compute(samples: &[PowerSample], battery: &BatterySpec) -> Result<StatisticsSnapshot> {
    if samples.is_empty() {
        return Err(Error::EmptyTable);
    }

    let times: Vec<f64> = samples.iter().map(|s| s.time_s).collect();
    let voltages: Vec<f64> = samples.iter().map(|s| s.voltage_v).collect();
    let currents: Vec<f64> = samples.iter().map(|s| s.current_a).collect();
    let powers: Vec<f64> = samples.iter().map(|s| s.power_w).collect();

    let min_time = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_time = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let voltage = ColumnStats::over(&voltages);
    let current = ColumnStats::over(&currents);
    let power = ColumnStats::over(&powers);

    let cv_power = if power.mean > 0.0 {
        power.std / power.mean
    } else {
        0.0
    };

    Ok(StatisticsSnapshot {
        data_points: samples.len(),
        duration_s: max_time - min_time,

        avg_voltage_v: voltage.mean,
        max_voltage_v: voltage.max,
        min_voltage_v: voltage.min,
        std_voltage_v: voltage.std,

        avg_current_a: current.mean,
        avg_current_ma: current.mean * 1000.0,
        max_current_a: current.max,
        max_current_ma: current.max * 1000.0,
        min_current_a: current.min,
        min_current_ma: current.min * 1000.0,
        std_current_a: current.std,
        std_current_ma: current.std * 1000.0,

        avg_power_w: power.mean,
        avg_power_mw: power.mean * 1000.0,
        max_power_w: power.max,
        max_power_mw: power.max * 1000.0,
        min_power_w: power.min,
        min_power_mw: power.min * 1000.0,
        std_power_w: power.std,
        std_power_mw: power.std * 1000.0,

        total_energy_j: trapezoid_energy(samples),
        cv_power,
        battery_life: battery_life(power.mean, battery),
    })
}

/// Project battery run time from an average power draw.
///
/// Zero or negative draw projects to `+inf` hours/days rather than an
/// error.
pub fn battery_life(avg_power_w: f64, battery: &BatterySpec) -> BatteryLife {
    let (hours, days) = if avg_power_w > 0.0 {
        let hours = battery.energy_j() / (avg_power_w * 3600.0);
        (hours, hours / 24.0)
    } else {
        (f64::INFINITY, f64::INFINITY)
    };

    BatteryLife {
        hours,
        days,
        capacity_mah: battery.capacity_mah,
        voltage_v: battery.voltage_v,
        avg_power_w,
    }
}

struct ColumnStats {
    mean: f64,
    min: f64,
    max: f64,
    std: f64,
}

impl ColumnStats {
    fn over(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            mean,
            min,
            max,
            std: sample_std(values, mean),
        }
    }
}

/// Sample standard deviation (n - 1 denominator); 0.0 below two values.
fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

fn trapezoid_energy(samples: &[PowerSample]) -> f64 {
    samples
        .windows(2)
        .map(|w| 0.5 * (w[0].power_w + w[1].power_w) * (w[1].time_s - w[0].time_s))
        .sum()
}

//! Core value types shared across the crate

use serde::{Deserialize, Serialize};

/// One cleaned measurement row: voltage, current and power at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    /// Seconds since the start of the measurement run
    pub time_s: f64,
    /// Supply voltage in volts
    pub voltage_v: f64,
    /// Drawn current in amperes
    pub current_a: f64,
    /// Instantaneous power in watts
    pub power_w: f64,
}

impl PowerSample {
    pub fn new(time_s: f64, voltage_v: f64, current_a: f64, power_w: f64) -> Self {
        Self {
            time_s,
            voltage_v,
            current_a,
            power_w,
        }
    }

    /// True when every field holds a finite value.
    pub fn is_finite(&self) -> bool {
        self.time_s.is_finite()
            && self.voltage_v.is_finite()
            && self.current_a.is_finite()
            && self.power_w.is_finite()
    }
}

/// A candidate sub-interval of a loaded series.
///
/// Plain data on purpose: admissibility is decided by
/// [`crate::range::validate_range`] against the series metadata, never by
/// the range itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_s: f64,
    pub end_s: f64,
}

impl TimeRange {
    pub fn new(start_s: f64, end_s: f64) -> Self {
        Self { start_s, end_s }
    }

    pub fn span_s(&self) -> f64 {
        self.end_s - self.start_s
    }
}

/// Battery parameters used for run-time projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatterySpec {
    pub capacity_mah: f64,
    pub voltage_v: f64,
}

impl BatterySpec {
    pub fn new(capacity_mah: f64, voltage_v: f64) -> Self {
        Self {
            capacity_mah,
            voltage_v,
        }
    }

    /// Total stored energy in joules: mAh × V × 3.6.
    pub fn energy_j(&self) -> f64 {
        self.capacity_mah * self.voltage_v * 3.6
    }
}

impl Default for BatterySpec {
    fn default() -> Self {
        Self {
            capacity_mah: 1000.0,
            voltage_v: 3.7,
        }
    }
}

/// Projected run time for a measured average power draw.
///
/// `hours` and `days` are `+inf` when the average power is zero or
/// negative; that is a sentinel, not an error. The non-finite values
/// serialize as the string `"inf"` so the export document stays valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryLife {
    #[serde(with = "json_float")]
    pub hours: f64,
    #[serde(with = "json_float")]
    pub days: f64,
    pub capacity_mah: f64,
    pub voltage_v: f64,
    pub avg_power_w: f64,
}

/// Serde adapter for floats that may be non-finite.
///
/// JSON has no literal for infinities, and serde_json would emit `null`
/// and break the round trip; non-finite values are encoded as the strings
/// `"inf"`, `"-inf"` and `"nan"` instead.
pub(crate) mod json_float {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    struct FloatOrStr;

    impl Visitor<'_> for FloatOrStr {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or one of \"inf\", \"-inf\", \"nan\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                "inf" | "+inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(FloatOrStr)
    }
}

//! Sensor, sample and health-status enumerations.
//!
//! The on-disk formats carry these as integer ordinals. Every enum here has a
//! single name table (`name`/`label`) and a checked conversion from the
//! ordinal; an ordinal outside the defined range has no value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Physical sensing modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    Oximeter,
    Accelerometer,
    Gps,
}

impl SensorType {
    /// All variants in ordinal order.
    pub const ALL: [SensorType; 3] = [Self::Oximeter, Self::Accelerometer, Self::Gps];

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Canonical name as written in config comments.
    pub fn name(self) -> &'static str {
        match self {
            Self::Oximeter => "OXIMETER",
            Self::Accelerometer => "ACCELEROMETER",
            Self::Gps => "GPS",
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Oximeter => "Oximeter",
            Self::Accelerometer => "Accelerometer",
            Self::Gps => "GPS",
        }
    }

    /// Cycle to the next variant, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    /// Cycle to the previous variant, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Specific measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleType {
    Spo2,
    HeartRate,
    Temperature,
    Latitude,
    Longitude,
    Altitude,
    Satellites,
    SpeedKph,
    Accel,
}

impl SampleType {
    /// All variants in ordinal order.
    pub const ALL: [SampleType; 9] = [
        Self::Spo2,
        Self::HeartRate,
        Self::Temperature,
        Self::Latitude,
        Self::Longitude,
        Self::Altitude,
        Self::Satellites,
        Self::SpeedKph,
        Self::Accel,
    ];

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Canonical name as written in config comments.
    pub fn name(self) -> &'static str {
        match self {
            Self::Spo2 => "SPO2",
            Self::HeartRate => "HEART_RATE",
            Self::Temperature => "TEMPERATURE",
            Self::Latitude => "LATITUDE",
            Self::Longitude => "LONGITUDE",
            Self::Altitude => "ALTITUDE",
            Self::Satellites => "SATELLITES",
            Self::SpeedKph => "SPEED_KPH",
            Self::Accel => "ACCEL",
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Spo2 => "SpO2",
            Self::HeartRate => "Heart Rate",
            Self::Temperature => "Temperature",
            Self::Latitude => "Latitude",
            Self::Longitude => "Longitude",
            Self::Altitude => "Altitude",
            Self::Satellites => "Satellites",
            Self::SpeedKph => "Speed KPH",
            Self::Accel => "Acceleration",
        }
    }

    /// Cycle to the next variant, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    /// Cycle to the previous variant, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Discretized severity bucket assigned to a reading.
///
/// Ordered from `ExtremelyLow` to `ExtremelyHigh`, matching the ordinals
/// written by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    ExtremelyLow,
    Low,
    Normal,
    High,
    ExtremelyHigh,
}

impl HealthStatus {
    /// All variants in ordinal order.
    pub const ALL: [HealthStatus; 5] = [
        Self::ExtremelyLow,
        Self::Low,
        Self::Normal,
        Self::High,
        Self::ExtremelyHigh,
    ];

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Display name used in the distribution chart.
    pub fn name(self) -> &'static str {
        match self {
            Self::ExtremelyLow => "EXTREMELY LOW",
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::ExtremelyHigh => "EXTREMELY HIGH",
        }
    }

    /// Returns a short symbol for table cells and bar labels.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::ExtremelyLow => "XLO",
            Self::Low => "LO",
            Self::Normal => "OK",
            Self::High => "HI",
            Self::ExtremelyHigh => "XHI",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the ordinal or the canonical name, case-insensitively.
impl FromStr for SensorType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s, &Self::ALL, |k| k.name(), |k| k.ordinal())
            .ok_or_else(|| DashboardError::UnknownKind(s.to_string()))
    }
}

/// Accepts either the ordinal or the canonical name, case-insensitively.
impl FromStr for SampleType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s, &Self::ALL, |k| k.name(), |k| k.ordinal())
            .ok_or_else(|| DashboardError::UnknownKind(s.to_string()))
    }
}

fn lookup<T: Copy>(
    s: &str,
    all: &[T],
    name: impl Fn(T) -> &'static str,
    ordinal: impl Fn(T) -> i64,
) -> Option<T> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return all.iter().copied().find(|k| ordinal(*k) == n);
    }
    let wanted = s.replace('-', "_");
    all.iter().copied().find(|k| name(*k).eq_ignore_ascii_case(&wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_wire_format() {
        assert_eq!(SensorType::from_ordinal(0), Some(SensorType::Oximeter));
        assert_eq!(SensorType::from_ordinal(2), Some(SensorType::Gps));
        assert_eq!(SampleType::from_ordinal(8), Some(SampleType::Accel));
        assert_eq!(HealthStatus::from_ordinal(4), Some(HealthStatus::ExtremelyHigh));
        assert_eq!(SampleType::SpeedKph.ordinal(), 7);
    }

    #[test]
    fn test_out_of_range_ordinals() {
        assert_eq!(SensorType::from_ordinal(3), None);
        assert_eq!(SensorType::from_ordinal(-1), None);
        assert_eq!(SampleType::from_ordinal(9), None);
        assert_eq!(HealthStatus::from_ordinal(5), None);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(SensorType::Gps.next(), SensorType::Oximeter);
        assert_eq!(SensorType::Oximeter.prev(), SensorType::Gps);
        assert_eq!(SampleType::Accel.next(), SampleType::Spo2);
    }

    #[test]
    fn test_parse_by_name_or_ordinal() {
        assert_eq!("gps".parse::<SensorType>().unwrap(), SensorType::Gps);
        assert_eq!("1".parse::<SensorType>().unwrap(), SensorType::Accelerometer);
        assert_eq!("heart-rate".parse::<SampleType>().unwrap(), SampleType::HeartRate);
        assert!("barometer".parse::<SensorType>().is_err());
        assert!("12".parse::<SampleType>().is_err());
    }
}

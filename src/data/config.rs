//! Threshold configuration: parsing, editing and generation.
//!
//! # Format
//!
//! ```text
//! # comment lines and blank lines are ignored
//! sensorType,sampleType,threshold1,threshold2,threshold3,threshold4,threshold5
//! ```
//!
//! Lines that do not have exactly seven fields are skipped without an error,
//! and so are lines whose sensor or sample ordinal is not a known kind. This
//! tolerance is intentional: a partially corrupt file still loads every good
//! row. A threshold that is not a number is kept as NaN and only rejected
//! when the collection is saved (see [`ConfigSet::validate`]).

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::kinds::{HealthStatus, SampleType, SensorType};
use super::lines::{float_field, int_field, records};
use crate::error::DashboardError;

/// Number of comma-separated fields in a config line.
const CONFIG_FIELDS: usize = 7;

/// Number of severity boundaries per row.
pub const THRESHOLD_COUNT: usize = 5;

/// Header written at the top of generated config files.
const CONFIG_HEADER: &str = "\
# Analyzer thresholds
# Format: sensorType,sampleType,threshold1,threshold2,threshold3,threshold4,threshold5
# sensorType: 0=OXIMETER, 1=ACCELEROMETER, 2=GPS
# sampleType: 0=SPO2, 1=HEART_RATE, 2=TEMPERATURE, 3=LATITUDE, 4=LONGITUDE, 5=ALTITUDE, 6=SATELLITES, 7=SPEED_KPH, 8=ACCEL
";

/// Calibration data for one (sensor kind, sample kind) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdConfig {
    pub sensor_type: SensorType,
    pub sample_type: SampleType,
    /// Ascending severity boundaries. Ordering is not enforced.
    pub thresholds: [f64; THRESHOLD_COUNT],
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            sensor_type: SensorType::Oximeter,
            sample_type: SampleType::Spo2,
            thresholds: [0.0; THRESHOLD_COUNT],
        }
    }
}

/// An editable field of a [`ThresholdConfig`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdField {
    SensorType,
    SampleType,
    Threshold1,
    Threshold2,
    Threshold3,
    Threshold4,
    Threshold5,
}

impl ThresholdField {
    /// Fields in column order.
    pub const ALL: [ThresholdField; 7] = [
        Self::SensorType,
        Self::SampleType,
        Self::Threshold1,
        Self::Threshold2,
        Self::Threshold3,
        Self::Threshold4,
        Self::Threshold5,
    ];

    /// Index into [`ThresholdConfig::thresholds`], if this is a threshold.
    pub fn threshold_index(self) -> Option<usize> {
        match self {
            Self::SensorType | Self::SampleType => None,
            Self::Threshold1 => Some(0),
            Self::Threshold2 => Some(1),
            Self::Threshold3 => Some(2),
            Self::Threshold4 => Some(3),
            Self::Threshold5 => Some(4),
        }
    }

    /// The threshold field for a 0-based index.
    pub fn threshold(index: usize) -> Option<Self> {
        Self::ALL.get(index + 2).copied()
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Column header for this field.
    pub fn label(self) -> &'static str {
        match self {
            Self::SensorType => "Sensor",
            Self::SampleType => "Sample",
            Self::Threshold1 => "Threshold 1",
            Self::Threshold2 => "Threshold 2",
            Self::Threshold3 => "Threshold 3",
            Self::Threshold4 => "Threshold 4",
            Self::Threshold5 => "Threshold 5",
        }
    }
}

impl fmt::Display for ThresholdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed value for [`ThresholdConfig::set`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Sensor(SensorType),
    Sample(SampleType),
    Number(f64),
}

impl ThresholdConfig {
    /// Assign `value` to `field`.
    ///
    /// Returns false (and changes nothing) when the value kind does not fit
    /// the field, e.g. a number for the sensor column.
    pub fn set(&mut self, field: ThresholdField, value: FieldValue) -> bool {
        match (field, value) {
            (ThresholdField::SensorType, FieldValue::Sensor(s)) => self.sensor_type = s,
            (ThresholdField::SampleType, FieldValue::Sample(s)) => self.sample_type = s,
            (field, FieldValue::Number(n)) => match field.threshold_index() {
                Some(i) => self.thresholds[i] = n,
                None => return false,
            },
            _ => return false,
        }
        true
    }

    /// Step an enum-valued field forwards or backwards. Thresholds are left alone.
    pub fn cycle(&mut self, field: ThresholdField, forward: bool) {
        match field {
            ThresholdField::SensorType => {
                self.sensor_type =
                    if forward { self.sensor_type.next() } else { self.sensor_type.prev() };
            }
            ThresholdField::SampleType => {
                self.sample_type =
                    if forward { self.sample_type.next() } else { self.sample_type.prev() };
            }
            _ => {}
        }
    }

    /// Display text for a field.
    pub fn display(&self, field: ThresholdField) -> String {
        match field {
            ThresholdField::SensorType => self.sensor_type.label().to_string(),
            ThresholdField::SampleType => self.sample_type.label().to_string(),
            other => other
                .threshold_index()
                .map(|i| format!("{}", self.thresholds[i]))
                .unwrap_or_default(),
        }
    }

    /// Map a reading to a health status the way the device analyzer does.
    ///
    /// Thresholds are scanned in order and the first one the value strictly
    /// exceeds selects the status with the same index. A value above none of
    /// them (or NaN) is `Normal`.
    pub fn classify(&self, value: f64) -> HealthStatus {
        self.thresholds
            .iter()
            .position(|t| value > *t)
            .and_then(|i| HealthStatus::from_ordinal(i as i64))
            .unwrap_or(HealthStatus::Normal)
    }

    /// The data line for this row, without a trailing newline.
    pub fn to_line(&self) -> String {
        let thresholds: Vec<String> = self.thresholds.iter().map(|t| t.to_string()).collect();
        format!(
            "{},{},{}",
            self.sensor_type.ordinal(),
            self.sample_type.ordinal(),
            thresholds.join(",")
        )
    }
}

/// Parse threshold configuration text.
///
/// Output order is input line order. Malformed lines are dropped silently.
pub fn parse_config(text: &str) -> Vec<ThresholdConfig> {
    records(text, true)
        .filter_map(|(line_no, fields)| {
            let row = parse_config_fields(&fields);
            if row.is_none() {
                debug!(line = line_no, fields = fields.len(), "Skipping config line");
            }
            row
        })
        .collect()
}

fn parse_config_fields(fields: &[&str]) -> Option<ThresholdConfig> {
    if fields.len() != CONFIG_FIELDS {
        return None;
    }
    let sensor_type = SensorType::from_ordinal(int_field(fields[0])?)?;
    let sample_type = SampleType::from_ordinal(int_field(fields[1])?)?;
    let mut thresholds = [0.0; THRESHOLD_COUNT];
    for (slot, field) in thresholds.iter_mut().zip(&fields[2..]) {
        *slot = float_field(field);
    }
    Some(ThresholdConfig {
        sensor_type,
        sample_type,
        thresholds,
    })
}

/// Generate config file text for `configs`.
///
/// The output parses back to the same rows with [`parse_config`].
pub fn render_config(configs: &[ThresholdConfig]) -> String {
    let mut out = String::from(CONFIG_HEADER);
    out.push('\n');
    for config in configs {
        out.push_str(&format!(
            "# {} - {}\n{}\n\n",
            config.sensor_type.name(),
            config.sample_type.name(),
            config.to_line()
        ));
    }
    out
}

/// The editable threshold collection of a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSet {
    rows: Vec<ThresholdConfig>,
}

impl ConfigSet {
    pub fn new(rows: Vec<ThresholdConfig>) -> Self {
        Self { rows }
    }

    /// Parse a whole config file into a new collection.
    pub fn parse(text: &str) -> Self {
        Self::new(parse_config(text))
    }

    /// The configuration preloaded when no file is given.
    pub fn demo() -> Self {
        let row = |sensor_type, sample_type, thresholds| ThresholdConfig {
            sensor_type,
            sample_type,
            thresholds,
        };
        Self::new(vec![
            row(SensorType::Oximeter, SampleType::Spo2, [0.0, 90.0, 98.0, 200.0, 300.0]),
            row(SensorType::Oximeter, SampleType::HeartRate, [0.0, 60.0, 100.0, 140.0, 180.0]),
            row(SensorType::Oximeter, SampleType::Temperature, [0.0, 35.0, 37.0, 39.0, 42.0]),
            row(SensorType::Accelerometer, SampleType::Accel, [0.0, 0.5, 0.75, 1.2, 2.0]),
        ])
    }

    pub fn rows(&self) -> &[ThresholdConfig] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ThresholdConfig> {
        self.rows.get_mut(index)
    }

    /// Append a default row (oximeter/SpO2, all thresholds zero) and return its index.
    pub fn push_default(&mut self) -> usize {
        self.rows.push(ThresholdConfig::default());
        self.rows.len() - 1
    }

    /// Remove the row at `index`, if it exists.
    pub fn remove(&mut self, index: usize) -> Option<ThresholdConfig> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// First row configured for the given pair.
    pub fn find(&self, sensor: SensorType, sample: SampleType) -> Option<&ThresholdConfig> {
        self.rows.iter().find(|c| c.sensor_type == sensor && c.sample_type == sample)
    }

    /// Check that every threshold is a number.
    ///
    /// Reports the first offending row (0-based) and field.
    pub fn validate(&self) -> Result<(), DashboardError> {
        for (row, config) in self.rows.iter().enumerate() {
            if let Some(i) = config.thresholds.iter().position(|t| t.is_nan()) {
                let field = ThresholdField::threshold(i).unwrap_or(ThresholdField::Threshold1);
                return Err(DashboardError::InvalidThreshold { row, field });
            }
        }
        Ok(())
    }

    /// Generate config file text for this collection.
    pub fn render(&self) -> String {
        render_config(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = "\
# Analyzer thresholds
# comment

0,0,0.0,90.0,98.0,200.0,300.0
0,1,0,60,100,140,180
1,8,0.0,0.5,0.75,1.2,2.0
";

    #[test]
    fn test_parse_config() {
        let configs = parse_config(SAMPLE_CONFIG);
        assert_eq!(configs.len(), 3);
        assert_eq!(configs[0].sensor_type, SensorType::Oximeter);
        assert_eq!(configs[0].sample_type, SampleType::Spo2);
        assert_eq!(configs[0].thresholds, [0.0, 90.0, 98.0, 200.0, 300.0]);
        assert_eq!(configs[1].sample_type, SampleType::HeartRate);
        assert_eq!(configs[2].sensor_type, SensorType::Accelerometer);
        assert_eq!(configs[2].thresholds[3], 1.2);
    }

    #[test]
    fn test_parse_config_skips_wrong_field_count() {
        let text = "0,0,1,2,3,4\n0,0,1,2,3,4,5\n0,0,1,2,3,4,5,6\n";
        let configs = parse_config(text);
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].thresholds, [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_parse_config_non_numeric_threshold_is_nan() {
        let configs = parse_config("0,1,0,abc,100,140,180\n");
        assert_eq!(configs.len(), 1);
        assert!(configs[0].thresholds[1].is_nan());
        assert_eq!(configs[0].thresholds[2], 100.0);
    }

    #[test]
    fn test_parse_config_drops_unknown_kinds() {
        let text = "3,0,1,2,3,4,5\n0,9,1,2,3,4,5\nx,0,1,2,3,4,5\n2,0,1,2,3,4,5\n";
        let configs = parse_config(text);
        assert_eq!(configs.len(), 1);
        // No pairing rule between sensor and sample kinds.
        assert_eq!(configs[0].sensor_type, SensorType::Gps);
        assert_eq!(configs[0].sample_type, SampleType::Spo2);
    }

    #[test]
    fn test_render_config_round_trip() {
        let configs = ConfigSet::demo();
        let text = configs.render();
        assert!(text.starts_with("# Analyzer thresholds\n"));
        assert!(text.contains("# OXIMETER - HEART_RATE\n0,1,0,60,100,140,180\n"));
        assert!(text.contains("# ACCELEROMETER - ACCEL\n1,8,0,0.5,0.75,1.2,2\n"));
        assert_eq!(ConfigSet::parse(&text), configs);
    }

    #[test]
    fn test_render_empty_has_only_header() {
        let text = render_config(&[]);
        assert_eq!(text.lines().count(), 5);
        assert!(parse_config(&text).is_empty());
    }

    #[test]
    fn test_set_fields() {
        let mut config = ThresholdConfig::default();
        assert!(config.set(ThresholdField::SensorType, FieldValue::Sensor(SensorType::Gps)));
        assert!(config.set(ThresholdField::SampleType, FieldValue::Sample(SampleType::Altitude)));
        assert!(config.set(ThresholdField::Threshold3, FieldValue::Number(7.5)));
        assert!(!config.set(ThresholdField::SensorType, FieldValue::Number(1.0)));
        assert!(!config.set(ThresholdField::Threshold1, FieldValue::Sensor(SensorType::Gps)));

        assert_eq!(config.sensor_type, SensorType::Gps);
        assert_eq!(config.sample_type, SampleType::Altitude);
        assert_eq!(config.thresholds, [0.0, 0.0, 7.5, 0.0, 0.0]);
    }

    #[test]
    fn test_cycle_enum_fields() {
        let mut config = ThresholdConfig::default();
        config.cycle(ThresholdField::SensorType, false);
        config.cycle(ThresholdField::SampleType, true);
        config.cycle(ThresholdField::Threshold1, true);
        assert_eq!(config.sensor_type, SensorType::Gps);
        assert_eq!(config.sample_type, SampleType::HeartRate);
        assert_eq!(config.thresholds[0], 0.0);
    }

    #[test]
    fn test_classify_matches_device_analyzer() {
        let config = ThresholdConfig {
            sensor_type: SensorType::Accelerometer,
            sample_type: SampleType::Accel,
            thresholds: [3.0, 2.0, 1.0, 0.5, 0.0],
        };
        assert_eq!(config.classify(3.5), HealthStatus::ExtremelyLow);
        assert_eq!(config.classify(1.5), HealthStatus::Normal);
        assert_eq!(config.classify(0.7), HealthStatus::High);
        assert_eq!(config.classify(0.2), HealthStatus::ExtremelyHigh);
        assert_eq!(config.classify(-1.0), HealthStatus::Normal);
        assert_eq!(config.classify(f64::NAN), HealthStatus::Normal);
    }

    #[test]
    fn test_config_set_add_remove() {
        let mut set = ConfigSet::demo();
        let index = set.push_default();
        assert_eq!(index, 4);
        assert_eq!(set.rows()[4], ThresholdConfig::default());
        assert!(set.remove(0).is_some());
        assert!(set.remove(10).is_none());
        assert_eq!(set.len(), 4);
        assert_eq!(set.rows()[0].sample_type, SampleType::HeartRate);
    }

    #[test]
    fn test_validate_reports_first_nan() {
        let mut set = ConfigSet::demo();
        assert!(set.validate().is_ok());
        set.get_mut(2)
            .unwrap()
            .set(ThresholdField::Threshold4, FieldValue::Number(f64::NAN));
        match set.validate() {
            Err(DashboardError::InvalidThreshold { row, field }) => {
                assert_eq!(row, 2);
                assert_eq!(field, ThresholdField::Threshold4);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_find() {
        let set = ConfigSet::demo();
        let found = set.find(SensorType::Oximeter, SampleType::Temperature).unwrap();
        assert_eq!(found.thresholds[2], 37.0);
        assert!(set.find(SensorType::Gps, SampleType::Latitude).is_none());
    }
}

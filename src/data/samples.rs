//! Sensor sample log parsing.
//!
//! Each data line is `sensorType,sampleType,timestamp,data,healthStatus`.
//! Blank lines are ignored; there is no comment syntax. A row is dropped
//! without an error, so that one bad row never blocks the rest of the log,
//! when:
//!
//! - it does not have exactly five fields;
//! - the sensor or sample ordinal is not a known kind;
//! - the health ordinal is not an integer in `0..=4`;
//! - the timestamp is not a number. Decimal timestamps such as `8370.0`
//!   are truncated and kept.
//!
//! A non-numeric reading is kept as NaN.

use serde::Serialize;
use tracing::debug;

use super::kinds::{HealthStatus, SampleType, SensorType};
use super::lines::{float_field, int_field, records, timestamp_field};

/// Number of comma-separated fields in a sample line.
const SAMPLE_FIELDS: usize = 5;

/// One observation from the device log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSample {
    pub sensor_type: SensorType,
    pub sample_type: SampleType,
    /// Milliseconds; only used as an ordering key and for duration.
    pub timestamp: i64,
    pub data: f64,
    pub health_status: HealthStatus,
}

impl SensorSample {
    pub fn new(
        sensor_type: SensorType,
        sample_type: SampleType,
        timestamp: i64,
        data: f64,
        health_status: HealthStatus,
    ) -> Self {
        Self {
            sensor_type,
            sample_type,
            timestamp,
            data,
            health_status,
        }
    }
}

/// Parse a sample log. Output order is input line order.
pub fn parse_samples(text: &str) -> Vec<SensorSample> {
    records(text, false)
        .filter_map(|(line_no, fields)| {
            let sample = parse_sample_fields(&fields);
            if sample.is_none() {
                debug!(line = line_no, fields = fields.len(), "Skipping sample line");
            }
            sample
        })
        .collect()
}

fn parse_sample_fields(fields: &[&str]) -> Option<SensorSample> {
    if fields.len() != SAMPLE_FIELDS {
        return None;
    }
    Some(SensorSample {
        sensor_type: SensorType::from_ordinal(int_field(fields[0])?)?,
        sample_type: SampleType::from_ordinal(int_field(fields[1])?)?,
        timestamp: timestamp_field(fields[2])?,
        data: float_field(fields[3]),
        health_status: HealthStatus::from_ordinal(int_field(fields[4])?)?,
    })
}

/// The sample log preloaded when no data file is given.
pub fn demo_samples() -> Vec<SensorSample> {
    use HealthStatus::*;
    use SampleType::*;
    use SensorType::*;

    vec![
        SensorSample::new(Accelerometer, Accel, 8370, 1.008798, ExtremelyHigh),
        SensorSample::new(Accelerometer, Accel, 8381, 1.003714, ExtremelyHigh),
        SensorSample::new(Accelerometer, Accel, 8398, 1.006280, ExtremelyHigh),
        SensorSample::new(Oximeter, Spo2, 13199, 86.511078, ExtremelyLow),
        SensorSample::new(Oximeter, HeartRate, 13208, 65.0, Low),
        SensorSample::new(Oximeter, Temperature, 13214, 34.625, ExtremelyLow),
    ]
}

/// [`demo_samples`] in log file format.
pub fn demo_log() -> String {
    demo_samples()
        .iter()
        .map(|s| {
            format!(
                "{},{},{},{:.6},{}\n",
                s.sensor_type.ordinal(),
                s.sample_type.ordinal(),
                s.timestamp,
                s.data,
                s.health_status.ordinal()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_samples() {
        let text = "1,8,8370,1.008798,4\n\n  0,1,13208,65.000000,1  \n";
        let samples = parse_samples(text);
        assert_eq!(samples.len(), 2);
        assert_eq!(
            samples[0],
            SensorSample::new(
                SensorType::Accelerometer,
                SampleType::Accel,
                8370,
                1.008798,
                HealthStatus::ExtremelyHigh
            )
        );
        assert_eq!(samples[1].sample_type, SampleType::HeartRate);
        assert_eq!(samples[1].health_status, HealthStatus::Low);
    }

    #[test]
    fn test_parse_samples_drops_malformed_rows() {
        let text = "\
1,8,8370,1.0,4
1,8,8370,1.0
1,8,8370,1.0,4,9
9,8,8370,1.0,4
1,8,later,1.0,4
1,8,8371,1.0,7
# 1,8,8372,1.0,4
1,8,8373,1.0,2
";
        let samples = parse_samples(text);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, 8370);
        assert_eq!(samples[1].timestamp, 8373);
    }

    #[test]
    fn test_parse_samples_decimal_timestamp_and_bad_health() {
        let samples = parse_samples("1,8,8370,1.0,7\n1,8,8370.0,1.0,4\n1,8,8371,1.0,4\n");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, 8370);
        assert_eq!(samples[1].timestamp, 8371);
    }

    #[test]
    fn test_parse_samples_nan_reading_kept() {
        let samples = parse_samples("0,0,1,n/a,2\n");
        assert_eq!(samples.len(), 1);
        assert!(samples[0].data.is_nan());
    }

    #[test]
    fn test_demo_log_parses_to_demo_samples() {
        assert_eq!(parse_samples(&demo_log()), demo_samples());
    }
}

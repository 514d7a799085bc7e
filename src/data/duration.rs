use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60_000_000_000.0),
];

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Parse duration strings like "1s", "500ms", "2m"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Invalid duration: {}", s)
            }
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Span between two millisecond timestamps, in minutes.
///
/// Computed in floating point, so any pair of `i64` timestamps is accepted.
pub fn span_minutes(first_ms: i64, last_ms: i64) -> f64 {
    (last_ms as f64 - first_ms as f64) / MILLIS_PER_MINUTE
}

/// Format a millisecond timestamp as a wall-clock label (`HH:MM:SS`, UTC).
///
/// Device timestamps are usually a counter from power-on, so small values
/// show up as times shortly after midnight.
pub fn format_timestamp(ms: i64) -> String {
    let secs = ms.div_euclid(1000);
    let h = secs.div_euclid(3600).rem_euclid(24);
    let m = secs.div_euclid(60).rem_euclid(60);
    let s = secs.rem_euclid(60);
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Format a duration in minutes for display
pub fn format_minutes(minutes: f64) -> String {
    if minutes.is_nan() {
        "NaN".to_string()
    } else if minutes < 1.0 {
        format!("{:.1}s", minutes * 60.0)
    } else {
        format!("{:.1}min", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("1.5s").unwrap();
        assert!((d.as_secs_f64() - 1.5).abs() < 0.0001);
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("250ms").unwrap();
        assert_eq!(d.as_millis(), 250);
    }

    #[test]
    fn test_parse_minutes() {
        let d = parse_duration("2m").unwrap();
        assert_eq!(d.as_secs(), 120);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("10").is_err());
    }

    #[test]
    fn test_span_minutes() {
        assert!((span_minutes(8370, 8398) - 28.0 / 60_000.0).abs() < 1e-12);
        assert_eq!(span_minutes(0, 120_000), 2.0);
    }

    #[test]
    fn test_span_minutes_extreme_timestamps() {
        let span = span_minutes(i64::MIN, i64::MAX);
        assert!(span.is_finite());
        assert!((span - 2f64.powi(64) / 60_000.0).abs() / span < 1e-9);
        assert_eq!(span_minutes(i64::MAX, i64::MAX), 0.0);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(8370), "00:00:08");
        assert_eq!(format_timestamp(3_723_000), "01:02:03");
        assert_eq!(format_timestamp(86_400_000 + 1000), "00:00:01");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0.5), "30.0s");
        assert_eq!(format_minutes(2.5), "2.5min");
        assert_eq!(format_minutes(f64::NAN), "NaN");
    }
}

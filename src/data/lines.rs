//! Line and field splitting shared by the config and sample parsers.

/// Iterate over the data lines of `text` as `(line_number, fields)`.
///
/// Lines are trimmed; empty lines are skipped, and so are lines starting
/// with `#` when `skip_comments` is set. Line numbers are 1-based.
pub(crate) fn records(
    text: &str,
    skip_comments: bool,
) -> impl Iterator<Item = (usize, Vec<&str>)> + '_ {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(move |(_, line)| !line.is_empty() && !(skip_comments && line.starts_with('#')))
        .map(|(n, line)| (n, line.split(',').collect()))
}

/// Parse an integer field. Surrounding whitespace is ignored.
pub(crate) fn int_field(field: &str) -> Option<i64> {
    field.trim().parse().ok()
}

/// Parse a timestamp field. Integers are taken as is; a finite decimal such
/// as `8370.0` is truncated toward zero.
pub(crate) fn timestamp_field(field: &str) -> Option<i64> {
    int_field(field).or_else(|| {
        let value: f64 = field.trim().parse().ok()?;
        value.is_finite().then(|| value.trunc() as i64)
    })
}

/// Parse a floating-point field; anything unparseable becomes NaN.
pub(crate) fn float_field(field: &str) -> f64 {
    field.trim().parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_skip_blank_and_comments() {
        let text = "# header\n\n  1,2,3  \r\n#x,y\n4,5\n";
        let rows: Vec<_> = records(text, true).collect();
        assert_eq!(rows, vec![(3, vec!["1", "2", "3"]), (5, vec!["4", "5"])]);
    }

    #[test]
    fn test_records_keep_comments_when_asked() {
        let rows: Vec<_> = records("#a,b\n", false).collect();
        assert_eq!(rows, vec![(1, vec!["#a", "b"])]);
    }

    #[test]
    fn test_numeric_fields() {
        assert_eq!(int_field(" 42 "), Some(42));
        assert_eq!(int_field("x"), None);
        assert_eq!(float_field("1.5"), 1.5);
        assert!(float_field("abc").is_nan());
        assert!(float_field("").is_nan());
    }

    #[test]
    fn test_timestamp_field() {
        assert_eq!(timestamp_field("8370"), Some(8370));
        assert_eq!(timestamp_field(" 8370.0 "), Some(8370));
        assert_eq!(timestamp_field("8370.9"), Some(8370));
        assert_eq!(timestamp_field("-1.5"), Some(-1));
        assert_eq!(timestamp_field("later"), None);
        assert_eq!(timestamp_field("NaN"), None);
        assert_eq!(timestamp_field("inf"), None);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters the ranking lists use to annotate a mark (altitude, converted, ...)
const MARKERS: [char; 2] = ['#', '@'];

/// Error types for race time parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Empty time string")]
    Empty,

    #[error("Invalid minutes component: {0:?}")]
    InvalidMinutes(String),

    #[error("Invalid seconds component: {0:?}")]
    InvalidSeconds(String),

    #[error("Too many ':' separators in {0:?}")]
    TooManySeparators(String),

    #[error("Time out of range: {0:?}")]
    OutOfRange(String),
}

/// Result type for race time parsing
pub type TimeResult<T> = Result<T, TimeParseError>;

/// A race time in seconds.
///
/// Always finite and non-negative; NaN can never be stored here, a bad mark
/// surfaces as [`TimeParseError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TimeValue(f64);

impl TimeValue {
    pub const ZERO: TimeValue = TimeValue(0.0);

    /// Wrap a number of seconds, rejecting NaN, infinities and negatives
    pub fn new(seconds: f64) -> Option<Self> {
        if seconds.is_finite() && seconds >= 0.0 {
            // normalises -0.0
            Some(Self(seconds + 0.0))
        } else {
            None
        }
    }

    /// Get the value in seconds
    pub fn seconds(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for TimeValue {
    type Error = TimeParseError;

    fn try_from(seconds: f64) -> TimeResult<Self> {
        Self::new(seconds).ok_or_else(|| TimeParseError::OutOfRange(seconds.to_string()))
    }
}

impl From<TimeValue> for f64 {
    fn from(value: TimeValue) -> Self {
        value.0
    }
}

impl FromStr for TimeValue {
    type Err = TimeParseError;

    fn from_str(s: &str) -> TimeResult<Self> {
        parse_time(s)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time(self.0))
    }
}

/// Parse a race time such as `"4:01.20"`, `"#4:01.20"` or `"38.5"` into seconds.
///
/// Marker characters are stripped and surrounding whitespace trimmed. With a
/// `:` the left side is whole minutes and the right side seconds, otherwise
/// the whole text is seconds.
pub fn parse_time(text: &str) -> TimeResult<TimeValue> {
    let cleaned: String = text.chars().filter(|c| !MARKERS.contains(c)).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let seconds = match cleaned.split_once(':') {
        Some((minutes_part, seconds_part)) => {
            if seconds_part.contains(':') {
                return Err(TimeParseError::TooManySeparators(cleaned.to_string()));
            }

            let minutes_part = minutes_part.trim();
            if minutes_part.is_empty() || !is_digits(minutes_part) {
                return Err(TimeParseError::InvalidMinutes(minutes_part.to_string()));
            }
            let minutes: u64 = minutes_part
                .parse()
                .map_err(|_| TimeParseError::OutOfRange(cleaned.to_string()))?;

            let seconds_part = seconds_part.trim();
            let (whole, fraction) = split_decimal(seconds_part)
                .ok_or_else(|| TimeParseError::InvalidSeconds(seconds_part.to_string()))?;

            let total_whole = minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(whole))
                .ok_or_else(|| TimeParseError::OutOfRange(cleaned.to_string()))?;

            compose_decimal(total_whole, fraction, cleaned)?
        }
        None => {
            let (whole, fraction) = split_decimal(cleaned)
                .ok_or_else(|| TimeParseError::InvalidSeconds(cleaned.to_string()))?;
            compose_decimal(whole, fraction, cleaned)?
        }
    };

    TimeValue::new(seconds).ok_or_else(|| TimeParseError::OutOfRange(cleaned.to_string()))
}

/// Format seconds as `M:SS.ss` (e.g. `241.5` -> `"4:01.50"`).
///
/// The value is rounded to whole centiseconds before it is split, so
/// `59.999` becomes `"1:00.00"` rather than `"0:60.00"`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "-:--.--".to_string();
    }

    let sign = if seconds < 0.0 { "-" } else { "" };
    let centis = (seconds.abs() * 100.0).round() as u64;
    let minutes = centis / 6000;
    let rem = centis % 6000;

    format!("{}{}:{:02}.{:02}", sign, minutes, rem / 100, rem % 100)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Split `"12.34"` into `(12, "34")`; `None` if it is not a plain decimal
fn split_decimal(s: &str) -> Option<(u64, &str)> {
    let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !is_digits(whole) || !is_digits(fraction) {
        return None;
    }

    let whole = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    Some((whole, fraction))
}

// Parsing the recomposed decimal once keeps the result the correctly rounded
// double for the written value, so "4:01.20" and "241.20" are bit-identical.
fn compose_decimal(whole: u64, fraction: &str, original: &str) -> TimeResult<f64> {
    let text = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    };

    text.parse::<f64>()
        .map_err(|_| TimeParseError::InvalidSeconds(original.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(text: &str) -> f64 {
        parse_time(text).unwrap().seconds()
    }

    #[test]
    fn test_parse_minutes_seconds() {
        assert_eq!(secs("4:01.20"), 241.20);
        assert_eq!(secs("0:59.99"), 59.99);
        assert_eq!(secs("12:00"), 720.0);
    }

    #[test]
    fn test_parse_strips_markers() {
        assert_eq!(secs("#4:01.20"), 241.20);
        assert_eq!(secs("@4:01.20"), 241.20);
        assert_eq!(secs("  7.45# "), 7.45);
    }

    #[test]
    fn test_parse_plain_seconds() {
        assert_eq!(secs("38.5"), 38.5);
        assert_eq!(secs("6.70"), 6.70);
        assert_eq!(secs("47"), 47.0);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_time(""), Err(TimeParseError::Empty));
        assert_eq!(parse_time(" #@ "), Err(TimeParseError::Empty));
        assert!(matches!(parse_time("N/A"), Err(TimeParseError::InvalidSeconds(_))));
        assert!(matches!(parse_time("DNF"), Err(TimeParseError::InvalidSeconds(_))));
        assert!(matches!(parse_time("x:01.20"), Err(TimeParseError::InvalidMinutes(_))));
        assert!(matches!(parse_time("4:ab"), Err(TimeParseError::InvalidSeconds(_))));
        assert!(matches!(
            parse_time("1:02:03.4"),
            Err(TimeParseError::TooManySeparators(_))
        ));
    }

    #[test]
    fn test_parse_never_yields_nan() {
        for text in ["NaN", "inf", "-inf", "-3.2", "1e3", "+4.0"] {
            assert!(parse_time(text).is_err(), "{} should not parse", text);
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format_time(241.5), "4:01.50");
        assert_eq!(format_time(0.0), "0:00.00");
        assert_eq!(format_time(38.5), "0:38.50");
        assert_eq!(format_time(600.0), "10:00.00");
    }

    #[test]
    fn test_format_carries_rounded_seconds_into_minutes() {
        assert_eq!(format_time(59.999), "1:00.00");
        assert_eq!(format_time(119.996), "2:00.00");
        assert_eq!(format_time(119.994), "1:59.99");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_time(f64::NAN), "-:--.--");
        assert_eq!(format_time(-1.5), "-0:01.50");
    }

    #[test]
    fn test_round_trip_all_centiseconds_below_an_hour() {
        for centis in 0u64..360_000 {
            let v = centis as f64 / 100.0;
            let back = parse_time(&format_time(v)).unwrap().seconds();
            assert_eq!(back, v, "round trip failed for {}", v);
        }
    }

    #[test]
    fn test_time_value_rejects_invalid() {
        assert!(TimeValue::new(f64::NAN).is_none());
        assert!(TimeValue::new(-0.01).is_none());
        assert!(TimeValue::new(f64::INFINITY).is_none());
        assert_eq!(TimeValue::new(-0.0), Some(TimeValue::ZERO));
    }

    #[test]
    fn test_time_value_display_and_from_str() {
        let v: TimeValue = "#4:01.20".parse().unwrap();
        assert_eq!(v.to_string(), "4:01.20");
    }
}

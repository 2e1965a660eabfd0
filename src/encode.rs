//! Primitive encodings required by the Kinesis sequence schema.
//!
//! - Durations are whole milliseconds, truncated toward zero.
//! - Relative displacements are split into a magnitude and a direction code
//!   (`1` forward, `2` backward). Zero counts as backward.
//! - Booleans are the literal words `true` / `false`.
//! - Decimals never use exponent notation (`xsd:decimal` forbids it).

use crate::error::{AppResult, SequenceError};

/// Motion direction as understood by the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Positive displacement, code `1`.
    Forward,
    /// Zero or negative displacement, code `2`.
    Backward,
}

impl Direction {
    /// Integer code written into the `Direction` parameter.
    pub fn code(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => 2,
        }
    }
}

/// Reject NaN and infinities, the values no schema primitive can carry.
pub fn ensure_finite(field: &'static str, value: f64) -> AppResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SequenceError::invalid(
            field,
            format!("expected a finite number, got {}", value),
        ))
    }
}

/// Largest millisecond count an `xsd:int` can carry.
pub const MAX_DURATION_MS: i64 = i32::MAX as i64;

/// Convert seconds to integer milliseconds (`floor(seconds * 1000)`).
///
/// # Errors
/// Fails on non-finite or negative durations, and on durations whose
/// millisecond count exceeds [`MAX_DURATION_MS`].
pub fn encode_duration_ms(seconds: f64) -> AppResult<i64> {
    let seconds = ensure_finite("duration", seconds)?;
    if seconds < 0.0 {
        return Err(SequenceError::invalid(
            "duration",
            format!("must not be negative, got {} s", seconds),
        ));
    }

    let ms = (seconds * 1000.0).trunc();
    if ms > MAX_DURATION_MS as f64 {
        return Err(SequenceError::invalid(
            "duration",
            format!(
                "{} s exceeds the {} ms an xsd:int can hold",
                seconds, MAX_DURATION_MS
            ),
        ));
    }
    Ok(ms as i64)
}

/// Split a signed displacement into `(magnitude, direction)`.
pub fn encode_direction(displacement: f64) -> AppResult<(f64, Direction)> {
    let displacement = ensure_finite("displacement", displacement)?;
    let direction = if displacement > 0.0 {
        Direction::Forward
    } else {
        Direction::Backward
    };
    Ok((displacement.abs(), direction))
}

/// Canonical lowercase rendering of a flag.
pub fn encode_bool(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

/// Render a finite decimal without exponent notation.
pub fn encode_decimal(value: f64) -> String {
    // -0.0 would otherwise print as "-0"
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_truncates() {
        let cases = [
            (0.0, 0),
            (0.5, 500),
            (1.0, 1000),
            (0.0019, 1),
            (2.9999, 2999),
            (12.5, 12500),
        ];
        for (seconds, expected) in cases {
            assert_eq!(
                encode_duration_ms(seconds).unwrap(),
                expected,
                "seconds = {}",
                seconds
            );
        }
    }

    #[test]
    fn test_duration_matches_floor() {
        let mut seconds = 0.0;
        while seconds < 5.0 {
            let expected = (seconds * 1000.0_f64).floor() as i64;
            assert_eq!(encode_duration_ms(seconds).unwrap(), expected);
            seconds += 0.0137;
        }
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = encode_duration_ms(-0.1).unwrap_err();
        assert!(matches!(
            err,
            SequenceError::InvalidInput {
                field: "duration",
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(encode_duration_ms(f64::NAN).is_err());
        assert!(encode_duration_ms(f64::INFINITY).is_err());
        assert!(encode_direction(f64::NAN).is_err());
        assert!(encode_direction(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_duration_overflow_rejected() {
        assert!(encode_duration_ms(1e300).is_err());
    }

    #[test]
    fn test_duration_limited_to_xsd_int() {
        assert_eq!(encode_duration_ms(2_147_483.647).unwrap(), 2_147_483_647);
        let err = encode_duration_ms(2_147_483.648).unwrap_err();
        assert!(matches!(
            err,
            SequenceError::InvalidInput {
                field: "duration",
                ..
            }
        ));
    }

    #[test]
    fn test_direction_codes() {
        assert_eq!(encode_direction(2.5).unwrap(), (2.5, Direction::Forward));
        assert_eq!(encode_direction(-2.5).unwrap(), (2.5, Direction::Backward));
        assert_eq!(encode_direction(0.0).unwrap(), (0.0, Direction::Backward));
        assert_eq!(Direction::Forward.code(), 1);
        assert_eq!(Direction::Backward.code(), 2);
    }

    #[test]
    fn test_bool_and_decimal() {
        assert_eq!(encode_bool(true), "true");
        assert_eq!(encode_bool(false), "false");
        assert_eq!(encode_decimal(2.5), "2.5");
        assert_eq!(encode_decimal(-0.0), "0");
        assert_eq!(encode_decimal(0.00001), "0.00001");
        assert_eq!(encode_decimal(1e21), "1000000000000000000000");
    }
}

// ABOUTME: Compact duration parser for test scripts ("2d5h10m30s" -> milliseconds)
// ABOUTME: Units d/h/m/s, case-insensitive, tokens summed in any order

use std::time::Duration;
use thiserror::Error;

pub const MILLIS_PER_SECOND: u64 = 1_000;
pub const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("Invalid duration unit: {0}")]
    InvalidUnit(char),
    #[error("Missing unit after '{0}'")]
    MissingUnit(String),
    #[error("Duration is too large")]
    Overflow,
}

/// Milliseconds for a unit letter, `None` if the letter is not a unit
pub fn unit_millis(unit: char) -> Option<u64> {
    match unit.to_ascii_lowercase() {
        'd' => Some(MILLIS_PER_DAY),
        'h' => Some(MILLIS_PER_HOUR),
        'm' => Some(MILLIS_PER_MINUTE),
        's' => Some(MILLIS_PER_SECOND),
        _ => None,
    }
}

#[derive(Clone, Copy)]
enum State {
    Idle,
    /// `gap` holds the whitespace seen after the digits, if any
    AccumulatingDigits {
        start: usize,
        value: u64,
        gap: Option<char>,
    },
}

/// Parse a duration string into total milliseconds.
///
/// Digits accumulate until a unit letter closes the token. Whitespace is
/// skipped, and may sit between a number and its unit, but not inside a
/// number. A stray character with no pending number is ignored; a pending
/// number followed by anything other than `d`, `h`, `m` or `s` is an error,
/// as is a number left without a unit at the end of input.
pub fn parse_millis(input: &str) -> Result<u64, DurationError> {
    let mut total: u64 = 0;
    let mut state = State::Idle;

    for (idx, c) in input.char_indices() {
        if c.is_whitespace() {
            if let State::AccumulatingDigits {
                start,
                value,
                gap: None,
            } = state
            {
                state = State::AccumulatingDigits {
                    start,
                    value,
                    gap: Some(c),
                };
            }
            continue;
        }

        if let Some(digit) = c.to_digit(10) {
            let (start, value) = match state {
                State::Idle => (idx, 0),
                State::AccumulatingDigits { gap: Some(ws), .. } => {
                    return Err(DurationError::InvalidUnit(ws))
                }
                State::AccumulatingDigits { start, value, .. } => (start, value),
            };
            let value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or(DurationError::Overflow)?;
            state = State::AccumulatingDigits {
                start,
                value,
                gap: None,
            };
            continue;
        }

        if let State::AccumulatingDigits { value, .. } = state {
            let factor = unit_millis(c).ok_or(DurationError::InvalidUnit(c))?;
            let token = value.checked_mul(factor).ok_or(DurationError::Overflow)?;
            total = total.checked_add(token).ok_or(DurationError::Overflow)?;
            state = State::Idle;
        }
    }

    match state {
        State::Idle => Ok(total),
        State::AccumulatingDigits { start, .. } => {
            Err(DurationError::MissingUnit(input[start..].trim_end().to_string()))
        }
    }
}

/// Parse a duration string into a `Duration`
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    parse_millis(input).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(parse_millis(""), Ok(0));
    }

    #[test]
    fn test_single_units() {
        assert_eq!(parse_millis("30m"), Ok(1_800_000));
        assert_eq!(parse_millis("45s"), Ok(45_000));
        assert_eq!(parse_millis("2d"), Ok(172_800_000));
        assert_eq!(parse_millis("1h"), Ok(3_600_000));
    }

    #[test]
    fn test_compound() {
        assert_eq!(parse_millis("1h30m"), Ok(5_400_000));
        assert_eq!(parse_millis("2d5h10m"), Ok(191_400_000));
        assert_eq!(parse_millis("2d5h10m30s"), Ok(191_430_000));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse_millis("2D"), parse_millis("2d"));
        assert_eq!(parse_millis("1H30M15S"), parse_millis("1h30m15s"));
    }

    #[test]
    fn test_order_and_repetition() {
        assert_eq!(parse_millis("10m1h"), parse_millis("1h10m"));
        assert_eq!(parse_millis("30s30s"), Ok(60_000));
        assert_eq!(parse_millis("5m2d5m"), Ok(2 * MILLIS_PER_DAY + 10 * MILLIS_PER_MINUTE));
    }

    #[test]
    fn test_invalid_unit() {
        assert_eq!(parse_millis("10x"), Err(DurationError::InvalidUnit('x')));
        assert_eq!(parse_millis("1h5w"), Err(DurationError::InvalidUnit('w')));
        assert_eq!(
            DurationError::InvalidUnit('x').to_string(),
            "Invalid duration unit: x"
        );
    }

    #[test]
    fn test_stray_characters_without_number_are_ignored() {
        assert_eq!(parse_millis("1h-30m"), Ok(5_400_000));
        assert_eq!(parse_millis("x"), Ok(0));
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(parse_millis("1h 30m"), Ok(5_400_000));
        assert_eq!(parse_millis(" 10 m "), Ok(600_000));
        assert_eq!(parse_millis("10\tm"), Ok(600_000));
    }

    #[test]
    fn test_whitespace_inside_number_rejected() {
        assert_eq!(parse_millis("1 0m"), Err(DurationError::InvalidUnit(' ')));
        assert_eq!(parse_millis("1h 3  0m"), Err(DurationError::InvalidUnit(' ')));
        assert_eq!(parse_millis("5\t5s"), Err(DurationError::InvalidUnit('\t')));
    }

    #[test]
    fn test_trailing_digits_rejected() {
        assert_eq!(
            parse_millis("100"),
            Err(DurationError::MissingUnit("100".to_string()))
        );
        assert_eq!(
            parse_millis("1h30"),
            Err(DurationError::MissingUnit("30".to_string()))
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(parse_millis("99999999999999999999s"), Err(DurationError::Overflow));
        assert_eq!(parse_millis("999999999999999d"), Err(DurationError::Overflow));
    }

    #[test]
    fn test_non_ascii_digits_are_not_numbers() {
        // Arabic-Indic five: not part of the number, so it is ignored while idle
        assert_eq!(parse_millis("\u{0665}1s"), Ok(1_000));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1m1s").unwrap(), Duration::from_secs(61));
    }
}

#[doc(hidden)]
pub mod duration;

use crate::Error;

/// Rendering for durations given as a count of seconds
pub trait SecondsExt {
    /// Formats the duration as a zero-padded `HH:MM:SS` clock.
    ///
    /// Hours are not capped at two digits; from 100 hours up the field
    /// simply widens.
    fn to_clock(&self) -> String;

    /// Formats the duration in a humanized way, for example 22m30s.
    fn to_human(&self) -> String;
}

impl SecondsExt for u32 {
    fn to_clock(&self) -> String {
        let hours = self / 3600;
        let minutes = (self % 3600) / 60;
        let seconds = self % 60;

        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    fn to_human(&self) -> String {
        use std::fmt::Write;

        if *self == 0 {
            return "0s".to_string();
        }

        let hours = self / 3600;
        let minutes = (self % 3600) / 60;
        let seconds = self % 60;

        let mut acc = String::new();

        if hours > 0 {
            write!(acc, "{}h", hours).unwrap();
        }

        if minutes > 0 {
            write!(acc, "{}m", minutes).unwrap();
        }

        if seconds > 0 {
            write!(acc, "{}s", seconds).unwrap();
        }

        acc
    }
}

/// Parse raw user input into a positive number of seconds.
///
/// Rejects anything that is not a positive integer: non-numeric text, zero,
/// negative numbers, and values past `u32::MAX`. The error carries the
/// offending input.
pub fn parse_seconds(raw: &str) -> Result<u32, Error> {
    let invalid = || Error::InvalidDuration {
        input: raw.to_string(),
    };

    let seconds: i64 = raw.trim().parse().map_err(|_| invalid())?;

    if seconds <= 0 {
        return Err(invalid());
    }

    u32::try_from(seconds).map_err(|_| invalid())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clock_test() {
        assert_eq!(3661u32.to_clock(), "01:01:01");
        assert_eq!(0u32.to_clock(), "00:00:00");
        assert_eq!(59u32.to_clock(), "00:00:59");
    }

    #[test]
    fn clock_widens_past_a_hundred_hours() {
        assert_eq!(360000u32.to_clock(), "100:00:00");
    }

    #[test]
    fn human_test() {
        assert_eq!(0u32.to_human(), "0s");
        assert_eq!(45u32.to_human(), "45s");
        assert_eq!(5400u32.to_human(), "1h30m");
        assert_eq!(3661u32.to_human(), "1h1m1s");
    }

    #[test]
    fn parses_a_positive_number_of_seconds() {
        assert_eq!(parse_seconds("90"), Ok(90));
        assert_eq!(parse_seconds(" 90 "), Ok(90));
        assert_eq!(parse_seconds("1"), Ok(1));
    }

    #[test]
    fn rejects_anything_else() {
        for raw in ["", "abc", "12.5", "0", "-5", "4294967296"] {
            let err = parse_seconds(raw).unwrap_err();

            assert_eq!(
                err,
                Error::InvalidDuration {
                    input: raw.to_string()
                }
            );
        }
    }
}

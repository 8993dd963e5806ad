use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::{anyhow, Context};

/// A non-negative amount of hours as typed by a user.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Hours(f64);

impl Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_hours(self.0))
    }
}

impl Hours {
    pub fn new_opt(value: f64) -> Option<Hours> {
        if value.is_finite() && value >= 0. {
            Some(Hours(value))
        } else {
            None
        }
    }

    /// Snaps to the closest quarter of an hour. Entries are logged in quarter hours.
    pub fn quarter_rounded(self) -> Hours {
        Hours(round_quarter(self.0))
    }
}

impl FromStr for Hours {
    type Err = anyhow::Error;

    /// Accepts `7.5`, `7.5h`, `7h30m`, `7h` and `45m`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = match s.split_once('h') {
            Some((hours, minutes)) => {
                let hours = hours
                    .parse::<f64>()
                    .with_context(|| format!("Can't parse {s} into hours"))?;
                let minutes = minutes.trim_end_matches('m');
                if minutes.is_empty() {
                    hours
                } else {
                    hours + parse_minutes(minutes, s)?
                }
            }
            None => match s.strip_suffix('m') {
                Some(minutes) => parse_minutes(minutes, s)?,
                None => s
                    .parse::<f64>()
                    .with_context(|| format!("Can't parse {s} into hours"))?,
            },
        };
        Hours::new_opt(value).ok_or_else(|| anyhow!("Can't parse {s} into hours"))
    }
}

fn parse_minutes(minutes: &str, whole: &str) -> anyhow::Result<f64> {
    let minutes = minutes
        .parse::<u32>()
        .with_context(|| format!("Can't parse {whole} into hours"))?;
    Ok(minutes as f64 / 60.)
}

impl Deref for Hours {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub fn round_quarter(value: f64) -> f64 {
    (value * 4.).round() / 4.
}

/// Formats like `7.50h`, after rounding to a quarter hour. Negative values keep their sign.
pub fn format_hours(value: f64) -> String {
    format!("{:.2}h", round_quarter(value))
}

/// Same as [format_hours] but always carries a sign, for deltas.
pub fn format_delta(value: f64) -> String {
    if value >= 0. {
        format!("+{}", format_hours(value))
    } else {
        format_hours(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hours() {
        assert_eq!(*"7.5".parse::<Hours>().unwrap(), 7.5);
        assert_eq!(*"7.5h".parse::<Hours>().unwrap(), 7.5);
        assert_eq!(*"7h".parse::<Hours>().unwrap(), 7.);
        assert_eq!(*"7h30m".parse::<Hours>().unwrap(), 7.5);
        assert_eq!(*"7h30".parse::<Hours>().unwrap(), 7.5);
        assert_eq!(*"45m".parse::<Hours>().unwrap(), 0.75);
        assert_eq!(*"0".parse::<Hours>().unwrap(), 0.);
    }

    #[test]
    fn test_parse_hours_rejects_garbage() {
        assert!("-1".parse::<Hours>().is_err());
        assert!("abc".parse::<Hours>().is_err());
        assert!("NaN".parse::<Hours>().is_err());
        assert!("1hxm".parse::<Hours>().is_err());
    }

    #[test]
    fn test_quarter_rounding() {
        assert_eq!(*Hours::new_opt(1.1).unwrap().quarter_rounded(), 1.0);
        assert_eq!(*Hours::new_opt(1.13).unwrap().quarter_rounded(), 1.25);
        assert_eq!(*Hours::new_opt(0.1).unwrap().quarter_rounded(), 0.0);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_hours(7.5), "7.50h");
        assert_eq!(format_hours(0.), "0.00h");
        assert_eq!(format_hours(-2.), "-2.00h");
        assert_eq!(format_delta(2.), "+2.00h");
        assert_eq!(format_delta(0.), "+0.00h");
        assert_eq!(format_delta(-0.25), "-0.25h");
    }
}

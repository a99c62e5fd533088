//! Lookback period strings ("10Y", "6MO", "YTD", ...) and their date ranges.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::provider::DataError;

/// How far back from the end date a fetch should reach.
///
/// Parsed case-insensitively from `<n>D`, `<n>WK`, `<n>MO`, `<n>Y`, `YTD` or `MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LookbackPeriod {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
}

impl LookbackPeriod {
    /// Earliest date covered when the range ends at `end` (inclusive).
    pub fn start_date(&self, end: NaiveDate) -> NaiveDate {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
        let start = match *self {
            Self::Days(n) => end.checked_sub_days(chrono::Days::new(n as u64)),
            Self::Weeks(n) => end.checked_sub_days(chrono::Days::new(n as u64 * 7)),
            Self::Months(n) => end.checked_sub_months(Months::new(n)),
            Self::Years(n) => end.checked_sub_months(Months::new(n.saturating_mul(12))),
            Self::YearToDate => NaiveDate::from_ymd_opt(end.year(), 1, 1),
            Self::Max => Some(epoch),
        };
        start.unwrap_or(epoch).max(epoch)
    }
}

impl Default for LookbackPeriod {
    fn default() -> Self {
        Self::Years(10)
    }
}

impl FromStr for LookbackPeriod {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "YTD" => return Ok(Self::YearToDate),
            "MAX" => return Ok(Self::Max),
            _ => {}
        }

        let split = upper
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| DataError::InvalidPeriod(s.to_string()))?;
        let (count, unit) = upper.split_at(split);
        let n: u32 = count
            .parse()
            .map_err(|_| DataError::InvalidPeriod(s.to_string()))?;
        if n == 0 {
            return Err(DataError::InvalidPeriod(s.to_string()));
        }

        match unit {
            "D" => Ok(Self::Days(n)),
            "WK" => Ok(Self::Weeks(n)),
            "MO" => Ok(Self::Months(n)),
            "Y" => Ok(Self::Years(n)),
            _ => Err(DataError::InvalidPeriod(s.to_string())),
        }
    }
}

impl TryFrom<String> for LookbackPeriod {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookbackPeriod> for String {
    fn from(period: LookbackPeriod) -> Self {
        period.to_string()
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(n) => write!(f, "{n}D"),
            Self::Weeks(n) => write!(f, "{n}WK"),
            Self::Months(n) => write!(f, "{n}MO"),
            Self::Years(n) => write!(f, "{n}Y"),
            Self::YearToDate => write!(f, "YTD"),
            Self::Max => write!(f, "MAX"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_periods() {
        assert_eq!("10Y".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::Years(10));
        assert_eq!("6mo".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::Months(6));
        assert_eq!("5d".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::Days(5));
        assert_eq!("1wk".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::Weeks(1));
        assert_eq!("ytd".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::YearToDate);
        assert_eq!("Max".parse::<LookbackPeriod>().unwrap(), LookbackPeriod::Max);
    }

    #[test]
    fn rejects_malformed_periods() {
        for bad in ["", "Y", "10", "0Y", "3H", "-1Y", "ten years"] {
            assert!(
                bad.parse::<LookbackPeriod>().is_err(),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for p in ["10Y", "6MO", "5D", "2WK", "YTD", "MAX"] {
            let parsed: LookbackPeriod = p.parse().unwrap();
            assert_eq!(parsed.to_string(), p);
        }
    }

    #[test]
    fn start_date_resolution() {
        let end = date(2024, 3, 31);
        assert_eq!(LookbackPeriod::Years(10).start_date(end), date(2014, 3, 31));
        assert_eq!(LookbackPeriod::Months(1).start_date(end), date(2024, 2, 29));
        assert_eq!(LookbackPeriod::Days(5).start_date(end), date(2024, 3, 26));
        assert_eq!(LookbackPeriod::Weeks(2).start_date(end), date(2024, 3, 17));
        assert_eq!(LookbackPeriod::YearToDate.start_date(end), date(2024, 1, 1));
        assert_eq!(LookbackPeriod::Max.start_date(end), date(1970, 1, 1));
    }

    #[test]
    fn huge_period_clamps_to_epoch() {
        let end = date(2024, 1, 1);
        assert_eq!(LookbackPeriod::Years(500).start_date(end), date(1970, 1, 1));
    }
}

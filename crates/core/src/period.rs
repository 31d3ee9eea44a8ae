use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn re_iso_date() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("invalid regex"))
}

fn re_month() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("invalid regex"))
}

/// Strict `YYYY-MM-DD` parsing. The components must name a real calendar
/// day, so `2024-02-30` is rejected rather than rolled over.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let caps = re_iso_date().captures(s.trim())?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A budget month such as `2025-03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BudgetMonth {
    year: i32,
    month: u32,
}

impl BudgetMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(BudgetMonth { year, month })
    }

}

impl fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BudgetMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = re_month()
            .captures(s.trim())
            .ok_or_else(|| format!("Invalid month: '{s}'"))?;
        let year: i32 = caps[1].parse().map_err(|_| format!("Invalid year: '{s}'"))?;
        let month: u32 = caps[2].parse().map_err(|_| format!("Invalid month: '{s}'"))?;
        BudgetMonth::new(year, month).ok_or_else(|| format!("Month out of range: '{s}'"))
    }
}

impl Serialize for BudgetMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BudgetMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_accepts_real_days() {
        assert_eq!(
            parse_iso_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_iso_date(" 2025-12-31 "), NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn iso_date_rejects_rollover_days() {
        assert_eq!(parse_iso_date("2024-02-30"), None);
        assert_eq!(parse_iso_date("2023-02-29"), None);
        assert_eq!(parse_iso_date("2024-13-01"), None);
        assert_eq!(parse_iso_date("2024-00-10"), None);
    }

    #[test]
    fn iso_date_rejects_loose_formats() {
        assert_eq!(parse_iso_date("2024-2-3"), None);
        assert_eq!(parse_iso_date("2024/02/03"), None);
        assert_eq!(parse_iso_date("2024-02-03T00:00"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn month_parse_and_display() {
        let m: BudgetMonth = "2025-03".parse().unwrap();
        assert_eq!(m, BudgetMonth::new(2025, 3).unwrap());
        assert_eq!(m.to_string(), "2025-03");
    }

    #[test]
    fn month_rejects_out_of_range() {
        assert!("2025-00".parse::<BudgetMonth>().is_err());
        assert!("2025-13".parse::<BudgetMonth>().is_err());
        assert!("2025-3".parse::<BudgetMonth>().is_err());
        assert!("March".parse::<BudgetMonth>().is_err());
    }

    #[test]
    fn month_serde_is_a_string() {
        let m = BudgetMonth::new(2026, 1).unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"2026-01\"");
        let back: BudgetMonth = serde_json::from_str("\"2026-01\"").unwrap();
        assert_eq!(back, m);
    }
}

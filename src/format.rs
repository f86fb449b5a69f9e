use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How dates are rendered to the user. Carried in plan files, never used for scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateFormat {
    #[default]
    IsoDate,
    MonthDayYear,
    DayMonthNameYear,
}

impl DateFormat {
    pub fn variants() -> &'static [(&'static str, &'static str)] {
        &[
            ("yyyy-MM-dd", "2025-06-20"),
            ("MM/dd/yyyy", "06/20/2025"),
            ("dd MMM yyyy", "20 Jun 2025"),
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::IsoDate => "yyyy-MM-dd",
            DateFormat::MonthDayYear => "MM/dd/yyyy",
            DateFormat::DayMonthNameYear => "dd MMM yyyy",
        }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        let pattern = match self {
            DateFormat::IsoDate => "%Y-%m-%d",
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthNameYear => "%d %b %Y",
        };
        date.format(pattern).to_string()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "yyyy-MM-dd" => Ok(DateFormat::IsoDate),
            "MM/dd/yyyy" => Ok(DateFormat::MonthDayYear),
            "dd MMM yyyy" => Ok(DateFormat::DayMonthNameYear),
            other => Err(format!("unknown date format '{other}'")),
        }
    }
}

// Unknown tokens in plan files render with the default format.
impl From<String> for DateFormat {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.as_str().to_string()
    }
}

/// Parse a calendar date from a plan file or user input.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps; timestamps are truncated to the date they name.
pub fn parse_plan_date(input: &str) -> Result<NaiveDate, String> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(stamp.date_naive());
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(stamp.date());
    }
    Err(format!("invalid date '{input}' (expected YYYY-MM-DD)"))
}

pub(crate) mod plan_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_plan_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

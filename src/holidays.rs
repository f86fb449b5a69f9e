//! Holiday feed ingestion.
//!
//! The feed is an iCalendar document whose `VEVENT`s mark public holidays.
//! Only the `DTSTART` date and the `SUMMARY` text are read.

use chrono::NaiveDate;
use ical::parser::ical::component::IcalEvent;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub label: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HolidayFeedError {
    #[error("unable to read holiday feed: {0}")]
    Io(#[from] io::Error),
    #[error("unable to parse holiday feed: {0}")]
    Parse(String),
}

/// Parse every event of an iCalendar feed into holidays, sorted by date.
///
/// Events without a usable `DTSTART` are skipped. When two events share a
/// date the first label wins.
pub fn parse_holiday_feed(content: &str) -> Result<Vec<Holiday>, HolidayFeedError> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !trimmed.starts_with("BEGIN:VCALENDAR") {
        return Err(HolidayFeedError::Parse(
            "feed does not start with BEGIN:VCALENDAR".into(),
        ));
    }

    let mut by_date: BTreeMap<NaiveDate, String> = BTreeMap::new();
    for calendar in ical::IcalParser::new(trimmed.as_bytes()) {
        let calendar = calendar.map_err(|err| HolidayFeedError::Parse(err.to_string()))?;
        for event in &calendar.events {
            match holiday_from_event(event) {
                Some(holiday) => {
                    by_date.entry(holiday.date).or_insert(holiday.label);
                }
                None => log::warn!("Skipping holiday event without a valid DTSTART"),
            }
        }
    }

    log::debug!("Parsed {} holidays from feed", by_date.len());
    Ok(by_date
        .into_iter()
        .map(|(date, label)| Holiday { date, label })
        .collect())
}

pub fn load_holiday_feed<P: AsRef<Path>>(path: P) -> Result<Vec<Holiday>, HolidayFeedError> {
    let content = fs::read_to_string(path)?;
    parse_holiday_feed(&content)
}

/// Like [`load_holiday_feed`], but a missing or broken feed just means no holidays.
pub fn load_holiday_feed_or_empty<P: AsRef<Path>>(path: P) -> Vec<Holiday> {
    let path = path.as_ref();
    match load_holiday_feed(path) {
        Ok(holidays) => holidays,
        Err(err) => {
            log::warn!(
                "Holiday feed {} unavailable, continuing without holidays: {}",
                path.display(),
                err
            );
            Vec::new()
        }
    }
}

pub fn holiday_set(holidays: &[Holiday]) -> BTreeSet<NaiveDate> {
    holidays.iter().map(|h| h.date).collect()
}

fn holiday_from_event(event: &IcalEvent) -> Option<Holiday> {
    let mut date = None;
    let mut label = String::new();
    for prop in &event.properties {
        match prop.name.as_str() {
            "DTSTART" => date = prop.value.as_deref().and_then(parse_compact_date),
            "SUMMARY" => label = prop.value.as_deref().map(unescape_text).unwrap_or_default(),
            _ => {}
        }
    }
    date.map(|date| Holiday { date, label })
}

// DTSTART is `YYYYMMDD`, optionally followed by a `THHMMSS[Z]` time part.
fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    let token = value.trim().get(..8)?;
    NaiveDate::parse_from_str(token, "%Y%m%d").ok()
}

fn unescape_text(value: &str) -> String {
    value
        .replace("\\,", ",")
        .replace("\\;", ";")
        .replace("\\n", " ")
        .replace("\\N", " ")
        .replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_dates_accept_date_and_datetime_values() {
        assert_eq!(
            parse_compact_date("20250101"),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(
            parse_compact_date("20251103T000000Z"),
            NaiveDate::from_ymd_opt(2025, 11, 3)
        );
        assert_eq!(parse_compact_date("2025-01"), None);
        assert_eq!(parse_compact_date("20251341"), None);
    }

    #[test]
    fn summary_escapes_are_removed() {
        assert_eq!(unescape_text("Foo\\, Bar\\; Baz"), "Foo, Bar; Baz");
    }
}

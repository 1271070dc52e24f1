use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Logical publication date of a run, as a civil date in Europe/Rome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicationDate(NaiveDate);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid publication date {input:?}, expected YYYY-MM-DD")]
pub struct DateParseError {
    pub input: String,
}

impl PublicationDate {
    pub fn today() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Civil date in Rome at the given instant.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        let local = instant + Duration::hours(rome_utc_offset_hours(instant));
        Self(local.date_naive())
    }
}

impl fmt::Display for PublicationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for PublicationDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Self)
            .map_err(|_| DateParseError {
                input: s.to_string(),
            })
    }
}

/// UTC offset of Europe/Rome: CEST (+2) between the last Sunday of March and
/// the last Sunday of October at 01:00 UTC, CET (+1) otherwise.
pub fn rome_utc_offset_hours(instant: DateTime<Utc>) -> i64 {
    let year = instant.year();
    match (last_sunday_at_one_utc(year, 3), last_sunday_at_one_utc(year, 10)) {
        (Some(start), Some(end)) if instant >= start && instant < end => 2,
        _ => 1,
    }
}

fn last_sunday_at_one_utc(year: i32, month: u32) -> Option<DateTime<Utc>> {
    let first_of_next = NaiveDate::from_ymd_opt(year, month + 1, 1)?;
    let last_day = first_of_next - Duration::days(1);
    let back = i64::from(last_day.weekday().num_days_from_sunday());
    let sunday = last_day - Duration::days(back);
    let at_one = sunday.and_hms_opt(1, 0, 0)?;
    Some(Utc.from_utc_datetime(&at_one))
}

//! Event start-date display formatting.
//!
//! The server serialises event timestamps as numeric arrays,
//! `[year, month, day, hour, minute]` with an optional trailing seconds
//! component. Cards show them as `"Sun - 12 May, 20:30"`.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::error::CoreError;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of leading components that carry meaning.
const DATE_COMPONENTS: usize = 5;

/// A calendar date and wall-clock time to minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<i64>")]
pub struct DateParts {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl DateParts {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// Parse the bracketed form `"[2024, 5, 12, 20, 30]"`. Brackets are
    /// optional; components past the fifth are ignored.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        let numbers = inner
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map_err(|_| CoreError::InvalidDate(format!("'{}' is not a number", part.trim())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::try_from(numbers)
    }
}

impl TryFrom<Vec<i64>> for DateParts {
    type Error = CoreError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        if values.len() < DATE_COMPONENTS {
            return Err(CoreError::InvalidDate(format!(
                "expected at least {DATE_COMPONENTS} components, got {}",
                values.len()
            )));
        }

        let component = |index: usize, name: &str| -> Result<u32, CoreError> {
            u32::try_from(values[index])
                .map_err(|_| CoreError::InvalidDate(format!("{name} out of range: {}", values[index])))
        };

        let year = i32::try_from(values[0])
            .map_err(|_| CoreError::InvalidDate(format!("year out of range: {}", values[0])))?;

        Ok(Self {
            year,
            month: component(1, "month")?,
            day: component(2, "day")?,
            hour: component(3, "hour")?,
            minute: component(4, "minute")?,
        })
    }
}

/// Render `parts` as `"{weekday} - {day} {month}, {HH}:{mm}"`.
///
/// Fails when the parts do not name a real calendar date and time.
pub fn format_date(parts: &DateParts) -> Result<String, CoreError> {
    let date = NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day)
        .ok_or_else(|| {
            CoreError::InvalidDate(format!(
                "{}-{}-{} is not a calendar date",
                parts.year, parts.month, parts.day
            ))
        })?;

    if parts.hour > 23 || parts.minute > 59 {
        return Err(CoreError::InvalidDate(format!(
            "{}:{} is not a time of day",
            parts.hour, parts.minute
        )));
    }

    let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
    let month = MONTHS[date.month0() as usize];

    Ok(format!(
        "{weekday} - {} {month}, {:02}:{:02}",
        date.day(),
        parts.hour,
        parts.minute
    ))
}

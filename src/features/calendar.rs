//! Holiday calendar
//!
//! Non-working days (weekends plus regional and national holidays) for a
//! single calendar year. A day absent from the calendar is a workday.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

use crate::{CalendarConfig, DayType, ParkingError, Result};

/// Weekends and holidays of 2023
#[rustfmt::skip]
const HOLIDAYS_2023: &[(u32, u32)] = &[
    // January
    (1, 1), (1, 6), (1, 7), (1, 8), (1, 14), (1, 15), (1, 21), (1, 22), (1, 28), (1, 29),
    // February
    (2, 2), (2, 4), (2, 5), (2, 11), (2, 12), (2, 18), (2, 19), (2, 25), (2, 26),
    // March
    (3, 4), (3, 5), (3, 11), (3, 12), (3, 17), (3, 18), (3, 19), (3, 25), (3, 26),
    // April
    (4, 1), (4, 2), (4, 8), (4, 9), (4, 15), (4, 16), (4, 22), (4, 23), (4, 29), (4, 30),
    // May
    (5, 1), (5, 6), (5, 7), (5, 13), (5, 14), (5, 20), (5, 21), (5, 27), (5, 28), (5, 30),
    // June
    (6, 3), (6, 4), (6, 10), (6, 11), (6, 17), (6, 18), (6, 24), (6, 25),
    // July
    (7, 1), (7, 2), (7, 8), (7, 9), (7, 15), (7, 16), (7, 22), (7, 23), (7, 29), (7, 30),
    // August
    (8, 5), (8, 6), (8, 12), (8, 13), (8, 15), (8, 19), (8, 20), (8, 26), (8, 27),
    // September
    (9, 2), (9, 3), (9, 9), (9, 10), (9, 16), (9, 17), (9, 23), (9, 24), (9, 30),
    // October
    (10, 1), (10, 7), (10, 8), (10, 12), (10, 14), (10, 15), (10, 21), (10, 22), (10, 28), (10, 29),
    // November
    (11, 1), (11, 4), (11, 5), (11, 11), (11, 12), (11, 18), (11, 19), (11, 25), (11, 26),
    // December
    (12, 2), (12, 3), (12, 6), (12, 8), (12, 9), (12, 10), (12, 16), (12, 17), (12, 23), (12, 24),
    (12, 25), (12, 30), (12, 31),
];

/// Regional and national fixed-date holidays of 2023
pub const FIXED_HOLIDAYS_2023: &[(u32, u32)] = &[
    (1, 1),
    (1, 6),
    (2, 2),
    (3, 17),
    (5, 1),
    (5, 30),
    (8, 15),
    (10, 12),
    (11, 1),
    (12, 6),
    (12, 8),
    (12, 25),
];

/// Set of non-working (month, day) pairs for one year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    year: i32,
    days: BTreeSet<(u32, u32)>,
}

impl HolidayCalendar {
    /// Hand-enumerated table for a year, if one is bundled
    pub fn builtin(year: i32) -> Result<Self> {
        match year {
            2023 => Ok(HolidayCalendar {
                year,
                days: HOLIDAYS_2023.iter().copied().collect(),
            }),
            _ => Err(ParkingError::Calendar(format!(
                "no built-in holiday table for {}; configure calendar.holidays",
                year
            ))),
        }
    }

    /// Every Saturday and Sunday of `year` plus the given fixed-date holidays
    pub fn from_rules(year: i32, fixed: &[(u32, u32)]) -> Result<Self> {
        let mut days = BTreeSet::new();

        let mut date = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| ParkingError::Calendar(format!("year out of range: {}", year)))?;
        while date.year() == year {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                days.insert((date.month(), date.day()));
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        for &(month, day) in fixed {
            if NaiveDate::from_ymd_opt(year, month, day).is_none() {
                return Err(ParkingError::Calendar(format!(
                    "invalid holiday {:02}-{:02} for {}",
                    month, day, year
                )));
            }
            days.insert((month, day));
        }

        Ok(HolidayCalendar { year, days })
    }

    /// Build the calendar described by the configuration
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        match &config.holidays {
            None => Self::builtin(config.year),
            Some(entries) => {
                let fixed = entries
                    .iter()
                    .map(|e| parse_month_day(e))
                    .collect::<Result<Vec<_>>>()?;
                Self::from_rules(config.year, &fixed)
            }
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Whether (month, day) is a non-working day. Unlisted days are workdays.
    pub fn is_holiday(&self, month: u32, day: u32) -> bool {
        self.days.contains(&(month, day))
    }

    pub fn day_type(&self, month: u32, day: u32) -> DayType {
        if self.is_holiday(month, day) {
            DayType::Holiday
        } else {
            DayType::Workday
        }
    }

    /// Number of days in `month` for the calendar's year
    pub fn days_in_month(&self, month: u32) -> Option<u32> {
        let first = NaiveDate::from_ymd_opt(self.year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(self.year, month + 1, 1)?
        };
        Some((next - first).num_days() as u32)
    }

    /// Non-working days of one month, ascending
    pub fn holidays_in_month(&self, month: u32) -> Vec<u32> {
        self.days
            .range((month, 0)..=(month, 31))
            .map(|&(_, d)| d)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Parse a "MM-DD" holiday entry
fn parse_month_day(entry: &str) -> Result<(u32, u32)> {
    let invalid = || ParkingError::Calendar(format!("expected MM-DD, got {:?}", entry));
    let (month, day) = entry.trim().split_once('-').ok_or_else(invalid)?;
    let month = month.parse().map_err(|_| invalid())?;
    let day = day.parse().map_err(|_| invalid())?;
    Ok((month, day))
}

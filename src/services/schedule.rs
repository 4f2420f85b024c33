//! Weekly operating-hours evaluation.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

use crate::models::ScheduleSlot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule has more than 7 slots")]
    TooManySlots,

    #[error("dayOfWeek {0} is outside 0..=6")]
    InvalidDay(u8),

    #[error("dayOfWeek {0} appears more than once")]
    DuplicateDay(u8),

    #[error("time {0:?} is not a valid HH:mm value")]
    InvalidTime(String),
}

/// Whether the establishment is open at `at` (server-local wall clock).
///
/// The interval is `[opens, closes)`. A day without a slot counts as closed.
pub fn is_open_at(schedule: &[ScheduleSlot], at: NaiveDateTime) -> bool {
    let today = at.weekday().num_days_from_sunday();
    let slot = match schedule
        .iter()
        .find(|slot| u32::from(slot.day_of_week) == today)
    {
        Some(slot) if !slot.closed => slot,
        _ => return false,
    };

    let (Some(opens), Some(closes)) = (minutes_of(&slot.opens), minutes_of(&slot.closes)) else {
        return false;
    };

    let now = at.hour() * 60 + at.minute();
    opens <= now && now < closes
}

/// Rejects anything [`is_open_at`] would silently treat as closed.
pub fn validate_schedule(schedule: &[ScheduleSlot]) -> Result<(), ScheduleError> {
    if schedule.len() > 7 {
        return Err(ScheduleError::TooManySlots);
    }

    let mut seen = HashSet::new();
    for slot in schedule {
        if slot.day_of_week > 6 {
            return Err(ScheduleError::InvalidDay(slot.day_of_week));
        }
        if !seen.insert(slot.day_of_week) {
            return Err(ScheduleError::DuplicateDay(slot.day_of_week));
        }
        for value in [&slot.opens, &slot.closes] {
            if minutes_of(value).is_none() {
                return Err(ScheduleError::InvalidTime(value.clone()));
            }
        }
    }
    Ok(())
}

/// Seven open slots, 08:00 to 22:00.
pub fn default_schedule() -> Vec<ScheduleSlot> {
    (0..7)
        .map(|day| ScheduleSlot {
            day_of_week: day,
            opens: "08:00".to_string(),
            closes: "22:00".to_string(),
            closed: false,
        })
        .collect()
}

/// Minutes since midnight for a strict `HH:mm` string.
fn minutes_of(value: &str) -> Option<u32> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 5
        && bytes[2] == b':'
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[3..].iter().all(u8::is_ascii_digit);
    if !shaped {
        return None;
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some(time.hour() * 60 + time.minute())
}

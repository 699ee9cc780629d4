//! # Dose Scheduler
//!
//! Derives a medication's daily dose times from its doses-per-day count and
//! finds the next dose after a given moment. Times are local wall-clock
//! values; nothing here reads the clock or touches shared state.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::error::{AdherenceError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// One dose per minute is the finest schedule accepted
pub const MAX_DOSES_PER_DAY: u32 = 24 * 60;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

fn validate_doses_per_day(doses_per_day: u32) -> Result<()> {
    if doses_per_day == 0 {
        return Err(AdherenceError::invalid_input(
            "doses per day must be at least 1",
        ));
    }
    if doses_per_day > MAX_DOSES_PER_DAY {
        return Err(AdherenceError::invalid_input(format!(
            "doses per day cannot exceed {MAX_DOSES_PER_DAY}, got {doses_per_day}"
        )));
    }
    Ok(())
}

/// Parse a doses-per-day count typed by the user
pub fn parse_doses_per_day(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    let count: i64 = trimmed.parse().map_err(|_| {
        AdherenceError::invalid_input(format!("doses per day is not a whole number: '{trimmed}'"))
    })?;
    if count < 1 {
        return Err(AdherenceError::invalid_input(format!(
            "doses per day must be at least 1, got {count}"
        )));
    }
    let count = u32::try_from(count).map_err(|_| {
        AdherenceError::invalid_input(format!("doses per day is too large: {count}"))
    })?;
    validate_doses_per_day(count)?;
    Ok(count)
}

fn midnight(day: NaiveDate) -> Result<NaiveDateTime> {
    day.and_hms_opt(0, 0, 0)
        .ok_or_else(|| AdherenceError::invalid_input(format!("no midnight on {day}")))
}

/// Dose times for one calendar day, evenly spaced from local midnight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseSchedule {
    doses_per_day: u32,
    day: NaiveDate,
    dose_times: Vec<NaiveDateTime>,
}

impl DoseSchedule {
    pub fn for_day(doses_per_day: u32, day: NaiveDate) -> Result<Self> {
        validate_doses_per_day(doses_per_day)?;
        let start = midnight(day)?;
        let n = i64::from(doses_per_day);

        // Offsets are computed in milliseconds from the exact fraction i/n of a
        // day so counts that do not divide 1440 stay evenly spaced.
        let dose_times = (0..n)
            .map(|i| {
                start
                    .checked_add_signed(Duration::milliseconds(i * MILLIS_PER_DAY / n))
                    .ok_or_else(|| AdherenceError::invalid_input(format!("dose time overflows on {day}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DoseSchedule {
            doses_per_day,
            day,
            dose_times,
        })
    }

    pub fn doses_per_day(&self) -> u32 {
        self.doses_per_day
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Minutes between consecutive doses (not truncated)
    pub fn interval_minutes(&self) -> f64 {
        (24.0 * 60.0) / f64::from(self.doses_per_day)
    }

    pub fn dose_times(&self) -> &[NaiveDateTime] {
        &self.dose_times
    }

    /// First dose strictly after `now`; when the day is used up, the first
    /// dose of the following day. A `now` on another date is scheduled from
    /// its own date.
    pub fn next_after(&self, now: NaiveDateTime) -> Result<NaiveDateTime> {
        if now.date() != self.day {
            return DoseSchedule::for_day(self.doses_per_day, now.date())?.next_after(now);
        }

        if let Some(next) = self.dose_times.iter().find(|t| **t > now) {
            return Ok(*next);
        }

        let tomorrow = self
            .day
            .succ_opt()
            .ok_or_else(|| AdherenceError::invalid_input(format!("no day after {}", self.day)))?;
        midnight(tomorrow)
    }
}

/// Next dose instant strictly after `now`
pub fn next_dose_time(doses_per_day: u32, now: NaiveDateTime) -> Result<NaiveDateTime> {
    DoseSchedule::for_day(doses_per_day, now.date())?.next_after(now)
}

/// Time remaining until the next dose; always positive
pub fn time_until_next_dose(doses_per_day: u32, now: NaiveDateTime) -> Result<Duration> {
    Ok(next_dose_time(doses_per_day, now)? - now)
}

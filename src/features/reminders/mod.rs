//! # Reminders Feature
//!
//! Daily dose schedules and next-dose lookup for medication reminders.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod scheduler;

pub use scheduler::{
    next_dose_time, parse_doses_per_day, time_until_next_dose, DoseSchedule, MAX_DOSES_PER_DAY,
};

//! # Feature Encoder
//!
//! Turns the user-observable context of an upcoming dose into the fixed-order
//! numeric vector consumed by the miss predictor.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::error::{AdherenceError, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Number of features produced by [`encode`]
pub const FEATURE_COUNT: usize = 4;

/// Feature names in encoding order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "time_of_day",
    "day_of_week",
    "device_online",
    "hours_since_last_dose",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Night,
}

impl TimeOfDay {
    /// Morning before noon, night from noon onwards
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            TimeOfDay::Morning
        } else {
            TimeOfDay::Night
        }
    }

    fn encoded(self) -> f64 {
        match self {
            TimeOfDay::Morning => 0.0,
            TimeOfDay::Night => 1.0,
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeOfDay::Morning => write!(f, "Morning"),
            TimeOfDay::Night => write!(f, "Night"),
        }
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = AdherenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "night" => Ok(TimeOfDay::Night),
            _ => Err(AdherenceError::invalid_input(format!(
                "unrecognized time of day: '{s}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// 0 for Monday through 6 for Sunday
    pub fn ordinal(self) -> u32 {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = AdherenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" => Ok(DayOfWeek::Monday),
            "tuesday" => Ok(DayOfWeek::Tuesday),
            "wednesday" => Ok(DayOfWeek::Wednesday),
            "thursday" => Ok(DayOfWeek::Thursday),
            "friday" => Ok(DayOfWeek::Friday),
            "saturday" => Ok(DayOfWeek::Saturday),
            "sunday" => Ok(DayOfWeek::Sunday),
            _ => Err(AdherenceError::invalid_input(format!(
                "unrecognized day of week: '{s}'"
            ))),
        }
    }
}

/// Context observed when the user asks for a miss prediction
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionContext {
    pub time_of_day: TimeOfDay,
    pub day_of_week: DayOfWeek,
    pub device_online: bool,
    pub hours_since_last_dose: f64,
}

impl PredictionContext {
    pub fn new(
        time_of_day: TimeOfDay,
        day_of_week: DayOfWeek,
        device_online: bool,
        hours_since_last_dose: f64,
    ) -> Result<Self> {
        validate_hours(hours_since_last_dose)?;
        Ok(Self {
            time_of_day,
            day_of_week,
            device_online,
            hours_since_last_dose,
        })
    }

    /// Build a context from raw form values. A blank hours field is missing
    /// input, not zero.
    pub fn from_form(
        time_of_day: &str,
        day_of_week: &str,
        device_online: bool,
        hours_since_last_dose: &str,
    ) -> Result<Self> {
        let hours = hours_since_last_dose.trim();
        if hours.is_empty() {
            return Err(AdherenceError::invalid_input(
                "hours since last dose is required",
            ));
        }
        let hours: f64 = hours.parse().map_err(|_| {
            AdherenceError::invalid_input(format!(
                "hours since last dose is not a number: '{hours}'"
            ))
        })?;

        Self::new(
            time_of_day.parse()?,
            day_of_week.parse()?,
            device_online,
            hours,
        )
    }
}

fn validate_hours(hours: f64) -> Result<()> {
    if !hours.is_finite() {
        return Err(AdherenceError::invalid_input(
            "hours since last dose must be a finite number",
        ));
    }
    if hours < 0.0 {
        return Err(AdherenceError::invalid_input(format!(
            "hours since last dose cannot be negative: {hours}"
        )));
    }
    Ok(())
}

/// Numeric encoding of a [`PredictionContext`], ordered as [`FEATURE_NAMES`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        FeatureVector(values)
    }
}

/// Encode a context. Pure; hours are passed through unscaled.
pub fn encode(context: &PredictionContext) -> FeatureVector {
    FeatureVector(vec![
        context.time_of_day.encoded(),
        f64::from(context.day_of_week.ordinal()),
        if context.device_online { 1.0 } else { 0.0 },
        context.hours_since_last_dose,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_friday_night_online() {
        let context =
            PredictionContext::new(TimeOfDay::Night, DayOfWeek::Friday, true, 10.0).unwrap();
        assert_eq!(encode(&context).values(), &[1.0, 4.0, 1.0, 10.0]);
    }

    #[test]
    fn test_encode_monday_morning_offline() {
        let context =
            PredictionContext::new(TimeOfDay::Morning, DayOfWeek::Monday, false, 1.0).unwrap();
        assert_eq!(encode(&context).values(), &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_encoded_length_matches_feature_count() {
        let context =
            PredictionContext::new(TimeOfDay::Night, DayOfWeek::Sunday, true, 0.0).unwrap();
        assert_eq!(encode(&context).len(), FEATURE_COUNT);
        assert_eq!(encode(&context).values()[1], 6.0);
    }

    #[test]
    fn test_day_parse() {
        assert_eq!("Friday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Friday);
        assert_eq!("sunday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Sunday);
        assert_eq!(" MONDAY ".parse::<DayOfWeek>().unwrap(), DayOfWeek::Monday);
        assert!(matches!(
            "Funday".parse::<DayOfWeek>(),
            Err(AdherenceError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_day_display_round_trips() {
        for day in DayOfWeek::ALL {
            assert_eq!(day.to_string().parse::<DayOfWeek>().unwrap(), day);
        }
    }

    #[test]
    fn test_day_from_chrono_weekday() {
        assert_eq!(DayOfWeek::from(Weekday::Mon).ordinal(), 0);
        assert_eq!(DayOfWeek::from(Weekday::Fri), DayOfWeek::Friday);
        assert_eq!(DayOfWeek::from(Weekday::Sun).ordinal(), 6);
    }

    #[test]
    fn test_time_of_day_parse_and_hour() {
        assert_eq!("night".parse::<TimeOfDay>().unwrap(), TimeOfDay::Night);
        assert_eq!("Morning".parse::<TimeOfDay>().unwrap(), TimeOfDay::Morning);
        assert!("noon".parse::<TimeOfDay>().is_err());
        assert_eq!(TimeOfDay::from_hour(7), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
    }

    #[test]
    fn test_from_form() {
        let context = PredictionContext::from_form("night", "Friday", true, " 10 ").unwrap();
        assert_eq!(context.time_of_day, TimeOfDay::Night);
        assert_eq!(context.day_of_week, DayOfWeek::Friday);
        assert!(context.device_online);
        assert_eq!(context.hours_since_last_dose, 10.0);
    }

    #[test]
    fn test_from_form_rejects_missing_hours() {
        let err = PredictionContext::from_form("night", "Friday", true, "  ").unwrap_err();
        assert!(err.is_user_recoverable());
    }

    #[test]
    fn test_from_form_rejects_bad_values() {
        assert!(PredictionContext::from_form("night", "Friday", true, "ten").is_err());
        assert!(PredictionContext::from_form("night", "Friday", true, "-2").is_err());
        assert!(PredictionContext::from_form("night", "Friday", true, "NaN").is_err());
        assert!(PredictionContext::from_form("dusk", "Friday", true, "2").is_err());
        assert!(PredictionContext::from_form("night", "Someday", true, "2").is_err());
    }
}

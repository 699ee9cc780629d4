//! # Prediction Entries
//!
//! The persisted record of a single miss prediction. Entries are created once
//! and never edited; the serialized form is a flat JSON object of strings,
//! numbers and booleans.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::features::prediction::{DayOfWeek, Prediction, PredictionContext, TimeOfDay};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionEntry {
    /// Creation time in epoch milliseconds, as a string
    pub id: String,
    pub time_of_day: TimeOfDay,
    pub day_of_week: DayOfWeek,
    pub device_online: bool,
    pub hours_since_last_dose: f64,
    /// In [0, 100], two decimals
    pub probability_percent: f64,
}

impl PredictionEntry {
    pub fn new(id: String, context: &PredictionContext, prediction: &Prediction) -> Self {
        PredictionEntry {
            id,
            time_of_day: context.time_of_day,
            day_of_week: context.day_of_week,
            device_online: context.device_online,
            hours_since_last_dose: context.hours_since_last_dose,
            probability_percent: prediction.probability_percent(),
        }
    }

    /// Creation time recovered from the id, if the id is one we issued
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }

    pub fn is_alert(&self, threshold: f64) -> bool {
        self.probability_percent / 100.0 > threshold
    }
}

/// Issues creation-time ids that strictly increase even when the wall clock
/// repeats or steps backwards.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    last: AtomicI64,
}

impl EntryIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        self.next_id_at(Utc::now())
    }

    pub fn next_id_at(&self, now: DateTime<Utc>) -> String {
        let candidate = now.timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let issued = candidate.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, issued, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return issued.to_string(),
                Err(actual) => last = actual,
            }
        }
    }
}

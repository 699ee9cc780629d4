//! Display helpers for adherence history: the probability-over-time series
//! and a compact summary.

use super::entry::PredictionEntry;
use crate::features::prediction::ALERT_THRESHOLD;

/// Chart points: x is the insertion index, y the miss probability in percent
pub fn probability_series(entries: &[PredictionEntry]) -> Vec<(usize, f64)> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (index, entry.probability_percent))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub count: usize,
    pub latest: f64,
    pub average: f64,
    pub peak: f64,
    /// Entries above the alert threshold
    pub alerts: usize,
    pub has_data: bool,
}

impl HistorySummary {
    pub fn from_entries(entries: &[PredictionEntry]) -> Self {
        Self::with_threshold(entries, ALERT_THRESHOLD)
    }

    pub fn with_threshold(entries: &[PredictionEntry], threshold: f64) -> Self {
        if entries.is_empty() {
            return Self {
                count: 0,
                latest: 0.0,
                average: 0.0,
                peak: 0.0,
                alerts: 0,
                has_data: false,
            };
        }

        let latest = entries.last().map(|e| e.probability_percent).unwrap_or(0.0);
        let sum: f64 = entries.iter().map(|e| e.probability_percent).sum();
        let peak = entries
            .iter()
            .map(|e| e.probability_percent)
            .fold(0.0_f64, |a, b| a.max(b));
        let alerts = entries.iter().filter(|e| e.is_alert(threshold)).count();

        Self {
            count: entries.len(),
            latest,
            average: sum / entries.len() as f64,
            peak,
            alerts,
            has_data: true,
        }
    }

    /// One-line text rendering for list headers and logs
    pub fn format(&self) -> String {
        if !self.has_data {
            return "No predictions yet".to_string();
        }
        format!(
            "{} predictions | latest {:.2}% | avg {:.2}% | peak {:.2}% | {} alerts",
            self.count, self.latest, self.average, self.peak, self.alerts
        )
    }
}

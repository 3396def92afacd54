//! Core data types for the health journal
//!
//! This module defines the records the analysis engine computes over:
//! - `HealthEntry`: One dated user submission
//! - `SymptomObservation`: A named symptom with a severity score
//! - `TimeWindow`: The `[reference - days, reference]` interval used for analysis

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowest accepted severity score
pub const MIN_SEVERITY: u8 = 1;
/// Highest accepted severity score
pub const MAX_SEVERITY: u8 = 10;
/// Lowest accepted mood rating
pub const MIN_MOOD: u8 = 1;
/// Highest accepted mood rating
pub const MAX_MOOD: u8 = 5;

/// One user-submitted journal record
///
/// Entries are immutable snapshots once created; nothing in the crate
/// mutates an entry after ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthEntry {
    /// Unique identifier
    pub id: String,
    /// When the symptoms occurred (may differ from `created_at`)
    pub date: DateTime<Utc>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Free-text description, never parsed
    #[serde(default)]
    pub input_text: String,
    /// Structured symptoms, in the order they were reported
    #[serde(default)]
    pub symptoms: Vec<SymptomObservation>,
    /// Optional mood rating (1-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<u8>,
    /// Free-form tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl HealthEntry {
    /// Create an entry dated `date`, created now
    pub fn new(id: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            date,
            created_at: Utc::now(),
            input_text: String::new(),
            symptoms: Vec::new(),
            mood: None,
            tags: BTreeSet::new(),
        }
    }

    /// Builder method: add a symptom
    pub fn symptom(mut self, name: impl Into<String>, severity: u8) -> Self {
        self.symptoms.push(SymptomObservation::new(name, severity));
        self
    }

    /// Builder method: add a fully described symptom
    pub fn observation(mut self, observation: SymptomObservation) -> Self {
        self.symptoms.push(observation);
        self
    }

    /// Builder method: set the free-text description
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.input_text = text.into();
        self
    }

    /// Builder method: set the mood rating
    pub fn mood(mut self, mood: u8) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Builder method: add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Builder method: set the creation timestamp
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Highest severity reported in this entry
    pub fn max_severity(&self) -> Option<u8> {
        self.symptoms.iter().map(|s| s.severity).max()
    }
}

/// One symptom within an entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SymptomObservation {
    /// Symptom label; compared case-insensitively after trimming
    pub name: String,
    /// Severity score (1-10)
    pub severity: u8,
    /// Free text, e.g. "2 days"
    #[serde(default)]
    pub duration: String,
    /// Free text, e.g. "intermittent"
    #[serde(default)]
    pub frequency: String,
}

impl SymptomObservation {
    pub fn new(name: impl Into<String>, severity: u8) -> Self {
        Self {
            name: name.into(),
            severity,
            duration: String::new(),
            frequency: String::new(),
        }
    }

    /// Builder method: set the duration text
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Builder method: set the frequency text
    pub fn frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = frequency.into();
        self
    }

    /// Key used to group observations of the same symptom
    pub fn normalized_name(&self) -> String {
        normalize_symptom_name(&self.name)
    }
}

/// Trim and lowercase a symptom label
pub fn normalize_symptom_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Closed time interval `[start, end]` ending at a reference time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window covering the `days` days before `reference`
    pub fn ending_at(reference: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: reference - Duration::days(days),
            end: reference,
        }
    }

    /// Window covering the last `days` days
    pub fn last_days(days: i64) -> Self {
        Self::ending_at(Utc::now(), days)
    }

    /// Check if a timestamp falls within the window (inclusive on both ends)
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// Midpoint of the window
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }

    /// Window length in fractional days
    pub fn length_days(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / MILLIS_PER_DAY
    }
}

pub(crate) const MILLIS_PER_DAY: f64 = 24.0 * 3600.0 * 1000.0;

/// Fractional days elapsed from `from` to `to`
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_builder() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let entry = HealthEntry::new("e1", date)
            .symptom("Headache", 4)
            .symptom("nausea", 7)
            .mood(3)
            .tag("work")
            .text("rough morning");

        assert_eq!(entry.symptoms.len(), 2);
        assert_eq!(entry.max_severity(), Some(7));
        assert_eq!(entry.mood, Some(3));
        assert!(entry.tags.contains("work"));
    }

    #[test]
    fn test_normalize_symptom_name() {
        assert_eq!(normalize_symptom_name("  Headache "), "headache");
        assert_eq!(
            SymptomObservation::new("NAUSEA", 2).normalized_name(),
            "nausea"
        );
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let reference = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let window = TimeWindow::ending_at(reference, 30);

        assert!(window.contains(reference));
        assert!(window.contains(window.start));
        assert!(!window.contains(window.start - Duration::seconds(1)));
        assert!(!window.contains(reference + Duration::seconds(1)));
        assert!((window.length_days() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let entry = HealthEntry::new("e1", date)
            .created_at(date)
            .symptom("cough", 3);
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"inputText\""));
        assert!(!json.contains("\"mood\""));

        let back: HealthEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}

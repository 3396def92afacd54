//! Ingestion validation
//!
//! Converts loosely typed `EntryInput` records (as received over HTTP or from
//! CSV) into `HealthEntry` values, and re-checks typed entries before
//! analysis. Validation fails closed: the first violation aborts the batch.
//!
//! Symptom names, severities and mood arrive as raw JSON values so that a
//! wrongly typed value is reported against its field like any other
//! violation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

use super::error::ValidationError;
use super::types::{
    HealthEntry, SymptomObservation, MAX_MOOD, MAX_SEVERITY, MIN_MOOD, MIN_SEVERITY,
};

/// Maximum length of a symptom name
pub const MAX_SYMPTOM_NAME_LEN: usize = 100;

/// Entry as submitted by a client, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    /// Generated when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Defaults to ingestion time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub symptoms: Vec<SymptomInput>,
    /// Integer from 1 to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Value>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Symptom as submitted by a client, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomInput {
    /// Non-empty string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    /// Integer from 1 to 10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Value>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub frequency: String,
}

impl SymptomInput {
    pub fn new(name: impl Into<String>, severity: i64) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            severity: Some(Value::from(severity)),
            ..Default::default()
        }
    }
}

impl EntryInput {
    /// Validate and convert into a `HealthEntry`
    ///
    /// `now` supplies the creation time when the input has none.
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<HealthEntry, ValidationError> {
        let id = match self.id {
            Some(id) if id.trim().is_empty() => {
                return Err(ValidationError::new("", "id", "must not be blank"));
            }
            Some(id) => id,
            None => uuid::Uuid::new_v4().to_string(),
        };

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(ValidationError::new(&id, "date", "is required"));
            }
            Some(raw) => parse_date(raw)
                .ok_or_else(|| ValidationError::new(&id, "date", format!("invalid timestamp '{}'", raw)))?,
        };

        let created_at = match self.created_at.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(raw) => parse_date(raw).ok_or_else(|| {
                ValidationError::new(&id, "createdAt", format!("invalid timestamp '{}'", raw))
            })?,
        };

        let mut symptoms = Vec::with_capacity(self.symptoms.len());
        for (index, symptom) in self.symptoms.into_iter().enumerate() {
            let name = symptom_name(&id, index, symptom.name.as_ref())?;
            check_symptom_name(&id, index, &name)?;
            let severity = symptom_severity(&id, index, symptom.severity.as_ref())?;
            symptoms.push(SymptomObservation {
                name,
                severity,
                duration: symptom.duration,
                frequency: symptom.frequency,
            });
        }

        let mood = match self.mood.as_ref() {
            None => None,
            Some(raw) => Some(mood_value(&id, raw)?),
        };

        Ok(HealthEntry {
            id,
            date,
            created_at,
            input_text: self.input_text,
            symptoms,
            mood,
            tags: self
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect::<BTreeSet<_>>(),
        })
    }
}

/// Validate and convert a batch of inputs; fails on the first invalid entry
pub fn validate_inputs(
    inputs: Vec<EntryInput>,
    now: DateTime<Utc>,
) -> Result<Vec<HealthEntry>, ValidationError> {
    let entries = inputs
        .into_iter()
        .map(|input| input.into_entry(now))
        .collect::<Result<Vec<_>, _>>()?;
    check_unique_ids(&entries)?;
    Ok(entries)
}

/// Check the invariants of an already typed entry
pub fn validate_entry(entry: &HealthEntry) -> Result<(), ValidationError> {
    if entry.id.trim().is_empty() {
        return Err(ValidationError::new("", "id", "must not be blank"));
    }

    for (index, symptom) in entry.symptoms.iter().enumerate() {
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&symptom.severity) {
            return Err(severity_error(&entry.id, index, symptom.severity as i64));
        }
        check_symptom_name(&entry.id, index, symptom.name.trim())?;
    }

    if let Some(mood) = entry.mood {
        if !(MIN_MOOD..=MAX_MOOD).contains(&mood) {
            return Err(mood_error(&entry.id, mood as i64));
        }
    }

    Ok(())
}

/// Check every entry of a batch; fails on the first invalid entry
pub fn validate_entries(entries: &[HealthEntry]) -> Result<(), ValidationError> {
    entries.iter().try_for_each(validate_entry)
}

fn check_unique_ids(entries: &[HealthEntry]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(ValidationError::new(&entry.id, "id", "duplicate id in batch"));
        }
    }
    Ok(())
}

fn check_symptom_name(entry_id: &str, index: usize, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new(
            entry_id,
            format!("symptoms[{}].name", index),
            "must not be empty",
        ));
    }
    if name.chars().count() > MAX_SYMPTOM_NAME_LEN {
        return Err(ValidationError::new(
            entry_id,
            format!("symptoms[{}].name", index),
            format!("exceeds maximum length of {} characters", MAX_SYMPTOM_NAME_LEN),
        ));
    }
    Ok(())
}

fn symptom_name(
    entry_id: &str,
    index: usize,
    raw: Option<&Value>,
) -> Result<String, ValidationError> {
    match raw {
        None => Err(ValidationError::new(
            entry_id,
            format!("symptoms[{}].name", index),
            "is required",
        )),
        Some(Value::String(name)) => Ok(name.trim().to_string()),
        Some(other) => Err(ValidationError::new(
            entry_id,
            format!("symptoms[{}].name", index),
            format!("must be a string, got {}", other),
        )),
    }
}

fn symptom_severity(
    entry_id: &str,
    index: usize,
    raw: Option<&Value>,
) -> Result<u8, ValidationError> {
    let field = format!("symptoms[{}].severity", index);
    let raw = raw.ok_or_else(|| ValidationError::new(entry_id, field.as_str(), "is required"))?;
    let severity = raw.as_i64().ok_or_else(|| {
        ValidationError::new(entry_id, field.as_str(), format!("must be an integer, got {}", raw))
    })?;

    if !(MIN_SEVERITY as i64..=MAX_SEVERITY as i64).contains(&severity) {
        return Err(severity_error(entry_id, index, severity));
    }
    Ok(severity as u8)
}

fn mood_value(entry_id: &str, raw: &Value) -> Result<u8, ValidationError> {
    let mood = raw.as_i64().ok_or_else(|| {
        ValidationError::new(entry_id, "mood", format!("must be an integer, got {}", raw))
    })?;

    if !(MIN_MOOD as i64..=MAX_MOOD as i64).contains(&mood) {
        return Err(mood_error(entry_id, mood));
    }
    Ok(mood as u8)
}

fn severity_error(entry_id: &str, index: usize, severity: i64) -> ValidationError {
    ValidationError::new(
        entry_id,
        format!("symptoms[{}].severity", index),
        format!(
            "must be between {} and {}, got {}",
            MIN_SEVERITY, MAX_SEVERITY, severity
        ),
    )
}

fn mood_error(entry_id: &str, mood: i64) -> ValidationError {
    ValidationError::new(
        entry_id,
        "mood",
        format!("must be between {} and {}, got {}", MIN_MOOD, MAX_MOOD, mood),
    )
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` timestamp, or a
/// plain date (taken as 12:00 UTC)
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(12, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

//! CSV Import
//!
//! Reads symptom logs exported from spreadsheets or other trackers. Each row
//! is one symptom observation; rows are grouped into entries by an entry id
//! column or, when there is none, by their date.
//!
//! Recognised headers (case-insensitive): `date`/`timestamp`,
//! `symptom`/`name`, `severity`, `duration`, `frequency`, `entry_id`/`id`,
//! `text`/`notes`, `mood`, `tags` (`;`-separated).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::error::{JournalError, JournalResult};
use super::validate::{EntryInput, SymptomInput};

/// Column positions detected from the header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvColumns {
    pub date: Option<usize>,
    pub symptom: Option<usize>,
    pub severity: Option<usize>,
    pub duration: Option<usize>,
    pub frequency: Option<usize>,
    pub entry_id: Option<usize>,
    pub text: Option<usize>,
    pub mood: Option<usize>,
    pub tags: Option<usize>,
}

impl CsvColumns {
    /// Auto-detect column mapping from a header row
    pub fn detect(headers: &csv::StringRecord) -> Self {
        let mut columns = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let slot = match header.trim().to_lowercase().replace(' ', "_").as_str() {
                "date" | "timestamp" | "datetime" | "time" => &mut columns.date,
                "symptom" | "name" | "symptom_name" => &mut columns.symptom,
                "severity" | "score" => &mut columns.severity,
                "duration" => &mut columns.duration,
                "frequency" => &mut columns.frequency,
                "entry_id" | "entry" | "id" => &mut columns.entry_id,
                "text" | "notes" | "note" | "description" => &mut columns.text,
                "mood" => &mut columns.mood,
                "tags" => &mut columns.tags,
                _ => continue,
            };
            slot.get_or_insert(idx);
        }

        columns
    }
}

/// Result of a CSV import
#[derive(Debug, Default)]
pub struct CsvImportResult {
    /// Entries in first-seen order, not yet validated
    pub entries: Vec<EntryInput>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

/// Import entries from a CSV file
pub fn import_csv_file(path: &Path) -> JournalResult<CsvImportResult> {
    let file = std::fs::File::open(path)?;
    import_csv(file)
}

/// Import entries from any CSV reader
pub fn import_csv<R: Read>(reader: R) -> JournalResult<CsvImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = CsvColumns::detect(&headers);

    let (date_col, symptom_col, severity_col) =
        match (columns.date, columns.symptom, columns.severity) {
            (Some(d), Some(s), Some(v)) => (d, s, v),
            _ => {
                return Err(JournalError::Csv(
                    "header must contain date, symptom and severity columns".to_string(),
                ))
            }
        };

    let mut result = CsvImportResult::default();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (line_num, record) in reader.records().enumerate() {
        let line = line_num + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                result.errors.push(format!("Line {}: {}", line, e));
                result.rows_failed += 1;
                continue;
            }
        };

        let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");

        let date = field(Some(date_col));
        if date.is_empty() {
            result.errors.push(format!("Line {}: missing date", line));
            result.rows_failed += 1;
            continue;
        }

        let severity = match field(Some(severity_col)).parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                result.errors.push(format!(
                    "Line {}: invalid severity '{}'",
                    line,
                    field(Some(severity_col))
                ));
                result.rows_failed += 1;
                continue;
            }
        };

        let mood = match field(columns.mood) {
            "" => None,
            raw => match raw.parse::<i64>() {
                Ok(m) => Some(m),
                Err(_) => {
                    result
                        .errors
                        .push(format!("Line {}: invalid mood '{}'", line, raw));
                    result.rows_failed += 1;
                    continue;
                }
            },
        };

        let key = match field(columns.entry_id) {
            "" => format!("csv-{}", date),
            id => id.to_string(),
        };

        let index = *by_key.entry(key.clone()).or_insert_with(|| {
            result.entries.push(EntryInput {
                id: Some(key),
                date: Some(date.to_string()),
                ..Default::default()
            });
            result.entries.len() - 1
        });
        let entry = &mut result.entries[index];

        let text = field(columns.text);
        if !text.is_empty() {
            if !entry.input_text.is_empty() {
                entry.input_text.push(' ');
            }
            entry.input_text.push_str(text);
        }
        if let Some(mood) = mood {
            entry.mood = Some(mood.into());
        }
        for tag in field(columns.tags).split(';').map(str::trim) {
            if !tag.is_empty() && !entry.tags.iter().any(|t| t == tag) {
                entry.tags.push(tag.to_string());
            }
        }

        entry.symptoms.push(SymptomInput {
            duration: field(columns.duration).to_string(),
            frequency: field(columns.frequency).to_string(),
            ..SymptomInput::new(field(Some(symptom_col)), severity)
        });
        result.rows_processed += 1;
    }

    tracing::debug!(
        rows = result.rows_processed,
        failed = result.rows_failed,
        entries = result.entries.len(),
        "CSV import finished"
    );

    Ok(result)
}

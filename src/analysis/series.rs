//! Windowing and per-symptom series
//!
//! Turns an entry snapshot into one severity series per normalized symptom
//! name. Points keep the index of their parent entry within the window, which
//! is what correlation pairs on.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::journal::{HealthEntry, TimeWindow};

/// One observation of a symptom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Index of the parent entry within the windowed entries
    pub entry_index: usize,
    pub date: DateTime<Utc>,
    pub severity: f64,
}

/// All observations of one symptom, ordered by date
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomSeries {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl SymptomSeries {
    /// Number of distinct timestamps observed
    pub fn distinct_dates(&self) -> usize {
        self.points
            .iter()
            .map(|p| p.date)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Mean severity across all points
    pub fn mean_severity(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.severity).sum::<f64>() / self.points.len() as f64
    }

    /// Severity per parent entry, keyed by entry index
    pub fn severity_by_entry(&self) -> BTreeMap<usize, f64> {
        self.points
            .iter()
            .map(|p| (p.entry_index, p.severity))
            .collect()
    }
}

/// Entries dated within `window`, in input order
pub fn window_entries(entries: &[HealthEntry], window: TimeWindow) -> Vec<&HealthEntry> {
    entries.iter().filter(|e| window.contains(e.date)).collect()
}

/// Group symptom observations by normalized name
///
/// Each entry contributes at most one point per symptom. Series are keyed and iterated in name order. Within a series, points are
/// sorted by date; equal dates keep entry order.
pub fn build_series(entries: &[&HealthEntry]) -> BTreeMap<String, SymptomSeries> {
    let mut series: BTreeMap<String, SymptomSeries> = BTreeMap::new();

    for (entry_index, entry) in entries.iter().enumerate() {
        // One point per symptom and entry; repeats within the entry are averaged
        let mut per_entry: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for symptom in &entry.symptoms {
            let slot = per_entry.entry(symptom.normalized_name()).or_insert((0.0, 0));
            slot.0 += symptom.severity as f64;
            slot.1 += 1;
        }

        for (name, (sum, count)) in per_entry {
            series
                .entry(name.clone())
                .or_insert_with(|| SymptomSeries {
                    name,
                    points: Vec::new(),
                })
                .points
                .push(SeriesPoint {
                    entry_index,
                    date: entry.date,
                    severity: sum / count as f64,
                });
        }
    }

    for s in series.values_mut() {
        // Stable sort keeps entry order for equal dates
        s.points.sort_by_key(|p| p.date);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(n)
    }

    #[test]
    fn test_window_excludes_outside_entries() {
        let entries = vec![
            HealthEntry::new("old", day(0)),
            HealthEntry::new("in", day(20)),
            HealthEntry::new("future", day(40)),
        ];
        let windowed = window_entries(&entries, TimeWindow::ending_at(day(30), 15));
        let ids: Vec<&str> = windowed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["in"]);
    }

    #[test]
    fn test_series_grouped_case_insensitively() {
        let entries = vec![
            HealthEntry::new("a", day(2)).symptom("Headache", 3),
            HealthEntry::new("b", day(1)).symptom(" headache ", 5).symptom("Nausea", 2),
        ];
        let refs: Vec<&HealthEntry> = entries.iter().collect();
        let series = build_series(&refs);

        assert_eq!(series.keys().collect::<Vec<_>>(), vec!["headache", "nausea"]);
        let headache = &series["headache"];
        assert_eq!(headache.points.len(), 2);
        // Sorted by date: entry b (day 1) first
        assert_eq!(headache.points[0].entry_index, 1);
        assert_eq!(headache.points[0].severity, 5.0);
        assert_eq!(headache.distinct_dates(), 2);
        assert_eq!(headache.mean_severity(), 4.0);
    }

    #[test]
    fn test_equal_dates_keep_entry_order() {
        let entries = vec![
            HealthEntry::new("a", day(1)).symptom("cough", 2),
            HealthEntry::new("b", day(1)).symptom("cough", 8),
        ];
        let refs: Vec<&HealthEntry> = entries.iter().collect();
        let series = build_series(&refs);
        let cough = &series["cough"];

        assert_eq!(cough.points[0].severity, 2.0);
        assert_eq!(cough.points[1].severity, 8.0);
        assert_eq!(cough.distinct_dates(), 1);
    }

    #[test]
    fn test_repeated_symptom_in_entry_averaged() {
        let entries = vec![HealthEntry::new("a", day(1))
            .symptom("cough", 2)
            .symptom("Cough", 6)];
        let refs: Vec<&HealthEntry> = entries.iter().collect();
        let series = build_series(&refs);

        assert_eq!(series["cough"].points.len(), 1);
        let by_entry = series["cough"].severity_by_entry();
        assert_eq!(by_entry.len(), 1);
        assert_eq!(by_entry[&0], 4.0);
    }
}

//! Output formatting and persistence for computed averages.
//!
//! Supports JSON summary logging and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::transform::{AggregateOutcome, SpecializationAverage};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Snapshot of one transform run, rendered as pretty JSON.
#[derive(Debug, Serialize)]
pub struct TransformSummary<'a> {
    pub generated_at: DateTime<Utc>,
    pub specializations: Vec<&'a str>,
    pub averages: &'a [SpecializationAverage],
}

impl<'a> TransformSummary<'a> {
    pub fn new(outcome: &'a AggregateOutcome) -> Self {
        let mut specializations: Vec<&str> =
            outcome.specializations.iter().map(String::as_str).collect();
        specializations.sort_unstable();

        Self {
            generated_at: Utc::now(),
            specializations,
            averages: &outcome.averages,
        }
    }
}

/// Logs a transform summary as pretty-printed JSON.
pub fn print_json(summary: &TransformSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Appends average rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, averages: &[SpecializationAverage]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = averages.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for average in averages {
        writer.serialize(average)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn averages() -> Vec<SpecializationAverage> {
        vec![
            SpecializationAverage {
                specialization: "anxiety".to_string(),
                average_rating: 4.5,
            },
            SpecializationAverage {
                specialization: "grief".to_string(),
                average_rating: 2.0,
            },
        ]
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let outcome = AggregateOutcome {
            averages: averages(),
            specializations: HashSet::from(["anxiety".to_string(), "grief".to_string()]),
            excluded_ratings: 0,
        };

        print_json(&TransformSummary::new(&outcome)).unwrap();
    }

    #[test]
    fn test_summary_specializations_sorted() {
        let outcome = AggregateOutcome {
            averages: vec![],
            specializations: HashSet::from([
                "grief".to_string(),
                "anxiety".to_string(),
                "career".to_string(),
            ]),
            excluded_ratings: 0,
        };

        let summary = TransformSummary::new(&outcome);
        assert_eq!(summary.specializations, vec!["anxiety", "career", "grief"]);
    }

    #[test]
    fn test_append_records_creates_file() {
        let path = temp_path("councillor_rater_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_records(&path, &averages()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("anxiety"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_records_writes_header_once() {
        let path = temp_path("councillor_rater_test_header.csv");
        let _ = fs::remove_file(&path);

        append_records(&path, &averages()).unwrap();
        append_records(&path, &averages()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content
            .lines()
            .filter(|l| l.contains("specialization"))
            .count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_records_row_count() {
        let path = temp_path("councillor_rater_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_records(&path, &averages()).unwrap();
        append_records(&path, &averages()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 4 data rows
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        fs::remove_file(&path).unwrap();
    }
}

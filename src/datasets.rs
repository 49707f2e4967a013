//! Source dataset record types and row extraction.
//!
//! Each dataset arrives as a JSON array of flat objects. Rows are extracted
//! field by field; a row missing a join key, or carrying a non-numeric value
//! where a number is required, is dropped and counted rather than failing
//! the run.

use serde_json::Value;
use tracing::warn;

/// A single rating of an appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub appointment_id: i64,
    pub score: f64,
}

/// Links an appointment to the councillor who held it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRecord {
    pub appointment_id: i64,
    pub councillor_id: i64,
}

/// A councillor and the specialization they practice.
#[derive(Debug, Clone, PartialEq)]
pub struct CouncillorRecord {
    pub councillor_id: i64,
    pub specialization: String,
}

/// Assignment of a patient to a councillor. Part of the join surface but
/// not consumed by the average-rating computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientCouncillorRecord {
    pub councillor_id: i64,
    pub patient_id: i64,
}

/// Reads an identifier that may arrive as a JSON number or a numeric string.
fn ident(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl RatingRecord {
    pub fn from_value(row: &Value) -> Option<Self> {
        Some(Self {
            appointment_id: ident(&row["appointment_id"])?,
            score: row["score"].as_f64()?,
        })
    }
}

impl AppointmentRecord {
    pub fn from_value(row: &Value) -> Option<Self> {
        Some(Self {
            appointment_id: ident(&row["appointment_id"])?,
            councillor_id: ident(&row["councillor_id"])?,
        })
    }
}

impl CouncillorRecord {
    pub fn from_value(row: &Value) -> Option<Self> {
        Some(Self {
            councillor_id: ident(&row["councillor_id"])?,
            specialization: row["specialization"].as_str()?.to_string(),
        })
    }
}

impl PatientCouncillorRecord {
    pub fn from_value(row: &Value) -> Option<Self> {
        Some(Self {
            councillor_id: ident(&row["councillor_id"])?,
            patient_id: ident(&row["patient_id"])?,
        })
    }
}

/// Extracts typed rows from a raw dataset, dropping rows that do not carry
/// the required fields. Dropped rows are counted and logged, never fatal.
pub fn parse_rows<T>(dataset: &str, rows: &[Value], parse: fn(&Value) -> Option<T>) -> Vec<T> {
    let parsed: Vec<T> = rows.iter().filter_map(parse).collect();

    let dropped = rows.len() - parsed.len();
    if dropped > 0 {
        warn!(dataset, dropped, kept = parsed.len(), "Dropped malformed rows");
    }

    parsed
}

/// The four source datasets of one pipeline run.
pub struct Datasets {
    pub ratings: Vec<RatingRecord>,
    pub appointments: Vec<AppointmentRecord>,
    pub councillors: Vec<CouncillorRecord>,
    pub patient_councillors: Vec<PatientCouncillorRecord>,
}

impl Datasets {
    /// Parses raw rows for all four datasets, dropping malformed entries
    /// per dataset.
    pub fn from_rows(
        ratings: &[Value],
        appointments: &[Value],
        councillors: &[Value],
        patient_councillors: &[Value],
    ) -> Self {
        Self {
            ratings: parse_rows("rating", ratings, RatingRecord::from_value),
            appointments: parse_rows("appointment", appointments, AppointmentRecord::from_value),
            councillors: parse_rows("councillor", councillors, CouncillorRecord::from_value),
            patient_councillors: parse_rows(
                "patient_councillor",
                patient_councillors,
                PatientCouncillorRecord::from_value,
            ),
        }
    }
}

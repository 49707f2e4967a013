//! Join and aggregation of the source datasets.
//!
//! Resolves each rating through the appointment and councillor lookups and
//! averages the scores per specialization.

mod aggregate;
mod types;

pub use aggregate::aggregate;
pub use types::{AggregateOutcome, SpecializationAverage};

//! Output types of the aggregation stage.

use serde::Serialize;
use std::collections::HashSet;

/// Average rating for a single specialization, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecializationAverage {
    pub specialization: String,
    pub average_rating: f64,
}

/// Result of one aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    /// One entry per specialization with at least one resolved rating,
    /// ordered by first resolution.
    pub averages: Vec<SpecializationAverage>,
    /// Every distinct specialization present in the councillor dataset,
    /// including those with no resolved ratings.
    pub specializations: HashSet<String>,
    /// Ratings dropped because their appointment or councillor was unknown.
    pub excluded_ratings: usize,
}

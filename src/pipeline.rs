//! Sequences one ETL run: extract, join/aggregate, load.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::datasets::Datasets;
use crate::fetch::{HttpClient, fetch_records};
use crate::publish::publish_average;
use crate::store::KvStore;
use crate::transform::aggregate;

/// Counts reported after a completed run.
#[derive(Debug)]
pub struct PipelineReport {
    pub ratings: usize,
    pub appointments: usize,
    pub councillors: usize,
    pub patient_councillors: usize,
    pub averages: usize,
    pub excluded_ratings: usize,
    pub published: usize,
}

async fn fetch_dataset<C: HttpClient>(client: &C, base: &str, name: &str) -> Result<Vec<Value>> {
    fetch_records(client, &format!("{base}/{name}"))
        .await
        .with_context(|| format!("failed to fetch dataset '{name}'"))
}

/// Fetches all four datasets from `{base_url}/{name}`.
///
/// Any fetch failure aborts the run before aggregation; the transform never
/// sees a partial set of datasets.
#[tracing::instrument(skip(client))]
pub async fn fetch_datasets<C: HttpClient>(client: &C, base_url: &str) -> Result<Datasets> {
    let base = base_url.trim_end_matches('/');

    let ratings = fetch_dataset(client, base, "rating").await?;
    let appointments = fetch_dataset(client, base, "appointment").await?;
    let councillors = fetch_dataset(client, base, "councillor").await?;
    let patient_councillors = fetch_dataset(client, base, "patient_councillor").await?;

    Ok(Datasets::from_rows(
        &ratings,
        &appointments,
        &councillors,
        &patient_councillors,
    ))
}

/// Runs one full extract-transform-load cycle against the store.
///
/// Publishing is per specialization: a failed write is logged and counted
/// but does not stop the remaining writes, and already-written keys are
/// never rolled back. The run returns an error if any write failed.
#[tracing::instrument(skip(client, store))]
pub async fn run_pipeline<C: HttpClient, S: KvStore>(
    client: &C,
    store: &mut S,
    base_url: &str,
    key_prefix: &str,
) -> Result<PipelineReport> {
    info!(base_url, "Extracting data from APIs");
    let datasets = fetch_datasets(client, base_url).await?;

    info!(
        ratings = datasets.ratings.len(),
        appointments = datasets.appointments.len(),
        councillors = datasets.councillors.len(),
        patient_councillors = datasets.patient_councillors.len(),
        "Datasets extracted"
    );

    info!("Transforming data");
    let outcome = aggregate(
        &datasets.ratings,
        &datasets.appointments,
        &datasets.councillors,
        &datasets.patient_councillors,
    );

    if outcome.excluded_ratings > 0 {
        warn!(
            excluded = outcome.excluded_ratings,
            "Ratings excluded by unresolved joins"
        );
    }

    let mut published = 0;
    let mut failed = 0;

    for specialization in &outcome.specializations {
        info!(%specialization, "Loading data for specialization");
        match publish_average(store, key_prefix, specialization, &outcome.averages).await {
            Ok(()) => published += 1,
            Err(e) => {
                error!(%specialization, error = %e, "Failed to load specialization");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!(
            "{failed} of {} specialization writes failed",
            outcome.specializations.len()
        );
    }

    Ok(PipelineReport {
        ratings: datasets.ratings.len(),
        appointments: datasets.appointments.len(),
        councillors: datasets.councillors.len(),
        patient_councillors: datasets.patient_councillors.len(),
        averages: outcome.averages.len(),
        excluded_ratings: outcome.excluded_ratings,
        published,
    })
}

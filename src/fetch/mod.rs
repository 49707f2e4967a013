//! HTTP retrieval of source datasets.

mod client;
mod basic;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Fetches a dataset as a JSON array of flat records.
///
/// Fails on any non-success status or a body that is not a JSON array;
/// the pipeline never aggregates over partially fetched data.
pub async fn fetch_records<C: HttpClient>(client: &C, url: &str) -> Result<Vec<Value>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        bail!("GET {url} returned status {}", resp.status());
    }

    let rows: Vec<Value> = resp
        .json()
        .await
        .with_context(|| format!("GET {url} did not return a JSON array"))?;

    Ok(rows)
}

//! Load stage: writes per-specialization averages into the key-value store.

use anyhow::{Context, Result};
use tracing::debug;

use crate::store::KvStore;
use crate::transform::SpecializationAverage;

/// Writes the average for `specialization` under `<key_prefix>:<specialization>`.
///
/// A specialization with no computed average is a no-op success: councillors
/// can exist before any of their appointments have been rated. Repeated
/// calls overwrite the same key, so re-runs replace rather than accumulate.
pub async fn publish_average<S: KvStore>(
    store: &mut S,
    key_prefix: &str,
    specialization: &str,
    averages: &[SpecializationAverage],
) -> Result<()> {
    let Some(entry) = averages
        .iter()
        .find(|a| a.specialization == specialization)
    else {
        debug!(specialization, "No average computed, skipping publish");
        return Ok(());
    };

    let key = format!("{key_prefix}:{specialization}");
    store.set(&key, entry.average_rating).await.with_context(|| {
        format!("failed to publish average for specialization '{specialization}'")
    })?;

    debug!(key, value = entry.average_rating, "Published average");
    Ok(())
}

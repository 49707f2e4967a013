use councillor_rater::datasets::Datasets;
use councillor_rater::publish::publish_average;
use councillor_rater::store::KvStore;
use councillor_rater::transform::{AggregateOutcome, aggregate};

use std::collections::HashMap;

#[derive(Default)]
struct MemoryStore {
    entries: HashMap<String, f64>,
}

#[async_trait::async_trait]
impl KvStore for MemoryStore {
    async fn set(&mut self, key: &str, value: f64) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

fn fixture(contents: &str) -> Vec<serde_json::Value> {
    serde_json::from_str(contents).expect("fixture is valid JSON")
}

fn load_datasets() -> Datasets {
    Datasets::from_rows(
        &fixture(include_str!("fixtures/rating.json")),
        &fixture(include_str!("fixtures/appointment.json")),
        &fixture(include_str!("fixtures/councillor.json")),
        &fixture(include_str!("fixtures/patient_councillor.json")),
    )
}

fn transform(datasets: &Datasets) -> AggregateOutcome {
    aggregate(
        &datasets.ratings,
        &datasets.appointments,
        &datasets.councillors,
        &datasets.patient_councillors,
    )
}

#[tokio::test]
async fn test_full_pipeline() {
    let datasets = load_datasets();

    // The non-numeric score is dropped at parse time.
    assert_eq!(datasets.ratings.len(), 5);
    assert_eq!(datasets.appointments.len(), 6);

    let outcome = transform(&datasets);

    // Rating for appointment 99 has no appointment row.
    assert_eq!(outcome.excluded_ratings, 1);

    let mut store = MemoryStore::default();
    for specialization in &outcome.specializations {
        publish_average(&mut store, "average_rating", specialization, &outcome.averages)
            .await
            .unwrap();
    }

    // anxiety: (4 + 5 + 3.5) / 3, grief: 2 / 1, career: never rated.
    assert_eq!(store.entries.get("average_rating:anxiety"), Some(&4.17));
    assert_eq!(store.entries.get("average_rating:grief"), Some(&2.0));
    assert!(!store.entries.contains_key("average_rating:career"));
    assert_eq!(store.entries.len(), 2);

    // career still exists as a specialization even without ratings.
    assert!(outcome.specializations.contains("career"));
    assert_eq!(outcome.specializations.len(), 3);
}

#[tokio::test]
async fn test_rerun_overwrites_instead_of_accumulating() {
    let datasets = load_datasets();
    let outcome = transform(&datasets);

    let mut store = MemoryStore::default();
    for _ in 0..2 {
        for specialization in &outcome.specializations {
            publish_average(&mut store, "average_rating", specialization, &outcome.averages)
                .await
                .unwrap();
        }
    }

    assert_eq!(store.entries.len(), 2);
    assert_eq!(store.entries.get("average_rating:anxiety"), Some(&4.17));
}

#[test]
fn test_transform_is_deterministic() {
    let datasets = load_datasets();

    assert_eq!(transform(&datasets), transform(&datasets));
}

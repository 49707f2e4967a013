use crate::datasets::{
    AppointmentRecord, CouncillorRecord, PatientCouncillorRecord, RatingRecord,
};
use crate::transform::types::{AggregateOutcome, SpecializationAverage};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Joins ratings through appointments and councillors and averages the
/// scores per specialization.
///
/// Duplicate appointment or councillor ids resolve last-write-wins. A rating
/// whose chain breaks at either hop is excluded from every average and
/// counted in [`AggregateOutcome::excluded_ratings`]. The returned averages
/// are ordered by the first rating resolved for each specialization, while
/// `specializations` always reflects the full councillor dataset.
///
/// `patient_councillors` completes the join surface but does not participate
/// in the computation.
pub fn aggregate(
    ratings: &[RatingRecord],
    appointments: &[AppointmentRecord],
    councillors: &[CouncillorRecord],
    _patient_councillors: &[PatientCouncillorRecord],
) -> AggregateOutcome {
    let mut councillor_by_appointment: HashMap<i64, i64> = HashMap::new();
    for appointment in appointments {
        councillor_by_appointment.insert(appointment.appointment_id, appointment.councillor_id);
    }

    let mut specialization_by_councillor: HashMap<i64, &str> = HashMap::new();
    let mut specializations: HashSet<String> = HashSet::new();
    for councillor in councillors {
        specialization_by_councillor.insert(councillor.councillor_id, &councillor.specialization);
        specializations.insert(councillor.specialization.clone());
    }

    let mut sums: IndexMap<&str, (f64, usize)> = IndexMap::new();
    let mut excluded_ratings = 0;

    for rating in ratings {
        let resolved = councillor_by_appointment
            .get(&rating.appointment_id)
            .and_then(|councillor_id| specialization_by_councillor.get(councillor_id))
            .copied();

        match resolved {
            Some(specialization) => {
                let entry = sums.entry(specialization).or_insert((0.0, 0));
                entry.0 += rating.score;
                entry.1 += 1;
            }
            None => excluded_ratings += 1,
        }
    }

    let averages = sums
        .into_iter()
        .map(|(specialization, (sum, count))| SpecializationAverage {
            specialization: specialization.to_string(),
            average_rating: round2(sum / count as f64),
        })
        .collect();

    AggregateOutcome {
        averages,
        specializations,
        excluded_ratings,
    }
}

/// Rounds to two decimal places, the precision published downstream.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

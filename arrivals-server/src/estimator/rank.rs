//! Arrival ranking shared by both estimators.

use std::collections::HashMap;

use crate::domain::Arrival;

/// Deduplicate, sort and cap a list of arrivals.
///
/// Arrivals sharing a `(vehicle_id, line_name)` pair collapse to the one
/// with the smallest `time_to_station`. The result is sorted soonest first
/// (ties broken by line name, then vehicle) and holds at most `max_results`
/// entries.
pub fn finalize(arrivals: Vec<Arrival>, max_results: usize) -> Vec<Arrival> {
    let mut best: HashMap<(String, String), Arrival> = HashMap::with_capacity(arrivals.len());

    for arrival in arrivals {
        let key = (arrival.vehicle_id.clone(), arrival.line_name.clone());
        match best.get(&key) {
            Some(existing) if existing.time_to_station <= arrival.time_to_station => {}
            _ => {
                best.insert(key, arrival);
            }
        }
    }

    let mut result: Vec<Arrival> = best.into_values().collect();
    result.sort_by(|a, b| {
        a.time_to_station
            .cmp(&b.time_to_station)
            .then_with(|| a.line_name.cmp(&b.line_name))
            .then_with(|| a.vehicle_id.cmp(&b.vehicle_id))
    });
    result.truncate(max_results);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportMode;
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    fn arrival(vehicle: &str, line: &str, secs: u32) -> Arrival {
        let base: DateTime<Utc> = DateTime::from_timestamp(1_773_568_800, 0).unwrap();
        Arrival {
            id: format!("{vehicle}-{line}"),
            line_name: line.to_string(),
            destination: "Town Centre".to_string(),
            time_to_station: secs,
            expected_arrival: base + chrono::Duration::seconds(i64::from(secs)),
            vehicle_id: vehicle.to_string(),
            current_location: String::new(),
            towards: "Town Centre".to_string(),
            mode: TransportMode::Bus,
        }
    }

    #[test]
    fn duplicates_keep_smaller_estimate() {
        let result = finalize(vec![arrival("V1", "38", 120), arrival("V1", "38", 90)], 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].time_to_station, 90);
    }

    #[test]
    fn same_vehicle_different_line_is_kept() {
        let result = finalize(vec![arrival("V1", "38", 120), arrival("V1", "N38", 90)], 10);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].line_name, "N38");
    }

    #[test]
    fn sorted_and_capped() {
        let arrivals = (0..15)
            .map(|i| arrival(&format!("V{i}"), "1", 1000 - i * 10))
            .collect();
        let result = finalize(arrivals, 10);
        assert_eq!(result.len(), 10);
        assert_eq!(result[0].time_to_station, 860);
        assert_eq!(result[9].time_to_station, 950);
    }

    #[test]
    fn empty_is_empty() {
        assert!(finalize(Vec::new(), 10).is_empty());
    }

    proptest! {
        #[test]
        fn output_sorted_bounded_and_unique(
            entries in prop::collection::vec((0u8..6, 0u8..3, 0u32..3600), 0..40)
        ) {
            let arrivals: Vec<Arrival> = entries
                .iter()
                .map(|(v, l, s)| arrival(&format!("V{v}"), &format!("L{l}"), *s))
                .collect();
            let result = finalize(arrivals, 10);

            prop_assert!(result.len() <= 10);
            prop_assert!(result.windows(2).all(|w| w[0].time_to_station <= w[1].time_to_station));

            let mut keys: Vec<_> = result.iter().map(|a| (&a.vehicle_id, &a.line_name)).collect();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), result.len());

            // Every kept entry is the minimum for its key
            for a in &result {
                let min = entries
                    .iter()
                    .filter(|(v, l, _)| format!("V{v}") == a.vehicle_id && format!("L{l}") == a.line_name)
                    .map(|(_, _, s)| *s)
                    .min();
                prop_assert_eq!(min, Some(a.time_to_station));
            }
        }
    }
}

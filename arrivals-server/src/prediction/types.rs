//! Prediction API response DTOs and conversion to [`Arrival`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{Arrival, TransportMode};

/// One prediction from the stop arrivals endpoint.
///
/// Only the fields the service uses are mapped; the API sends many more.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDto {
    pub id: String,
    pub vehicle_id: Option<String>,
    pub line_name: Option<String>,
    pub destination_name: Option<String>,
    pub time_to_station: i64,
    pub expected_arrival: DateTime<Utc>,
    pub current_location: Option<String>,
    pub towards: Option<String>,
    pub mode_name: Option<String>,
}

impl PredictionDto {
    /// Convert to an [`Arrival`].
    ///
    /// Predictions for vehicles that have already passed (negative
    /// `timeToStation`) are dropped.
    pub fn into_arrival(self) -> Option<Arrival> {
        let time_to_station = u32::try_from(self.time_to_station).ok()?;
        let destination = self.destination_name.unwrap_or_default();
        let towards = self
            .towards
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| destination.clone());

        Some(Arrival {
            id: self.id,
            line_name: self.line_name.unwrap_or_default(),
            destination,
            time_to_station,
            expected_arrival: self.expected_arrival,
            vehicle_id: self.vehicle_id.unwrap_or_default(),
            current_location: self.current_location.unwrap_or_default(),
            towards,
            mode: self
                .mode_name
                .as_deref()
                .map(TransportMode::from_mode_name)
                .unwrap_or(TransportMode::Bus),
        })
    }
}

/// Convert a list of predictions, sorted soonest first and capped.
pub fn convert_predictions(predictions: Vec<PredictionDto>, max_results: usize) -> Vec<Arrival> {
    let mut arrivals: Vec<Arrival> = predictions
        .into_iter()
        .filter_map(PredictionDto::into_arrival)
        .collect();
    arrivals.sort_by(|a, b| {
        a.time_to_station
            .cmp(&b.time_to_station)
            .then_with(|| a.line_name.cmp(&b.line_name))
    });
    arrivals.truncate(max_results);
    arrivals
}

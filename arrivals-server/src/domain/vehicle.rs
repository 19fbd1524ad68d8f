//! Per-request vehicle telemetry types.
//!
//! These exist only for the duration of one estimation request.

use chrono::{DateTime, Utc};

use super::Coordinate;

/// A vehicle position report from a positions-only feed.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleReport {
    /// Operator-assigned vehicle identifier.
    pub vehicle_id: String,

    /// Last reported position.
    pub position: Coordinate,

    /// Compass heading in degrees, if reported.
    pub bearing: Option<f64>,

    /// When the position was recorded, if known.
    pub recorded_at: Option<DateTime<Utc>>,

    /// Route/line reference from the feed.
    pub route_ref: Option<String>,

    /// Trip reference from the feed.
    pub trip_ref: Option<String>,
}

impl VehicleReport {
    /// Create a report with only the mandatory fields set.
    pub fn new(vehicle_id: impl Into<String>, position: Coordinate) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            position,
            bearing: None,
            recorded_at: None,
            route_ref: None,
            trip_ref: None,
        }
    }
}

/// Where a call sits in a vehicle's journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// The stop the vehicle is heading to right now.
    Next,
    /// A later stop on the journey.
    Onward,
}

/// A stop the vehicle is yet to call at.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyCall {
    /// Stop reference as published by the feed.
    pub stop_ref: String,

    /// Position in the journey, if published.
    pub order: Option<u32>,

    /// Real-time predicted arrival.
    pub expected_arrival: Option<DateTime<Utc>>,

    /// Timetabled arrival.
    pub aimed_arrival: Option<DateTime<Utc>>,

    pub kind: CallKind,
}

impl JourneyCall {
    /// Create a call with no order or times.
    pub fn new(stop_ref: impl Into<String>, kind: CallKind) -> Self {
        Self {
            stop_ref: stop_ref.into(),
            order: None,
            expected_arrival: None,
            aimed_arrival: None,
            kind,
        }
    }

    /// The best available arrival time: expected first, then aimed.
    pub fn best_time(&self) -> Option<DateTime<Utc>> {
        self.expected_arrival.or(self.aimed_arrival)
    }
}

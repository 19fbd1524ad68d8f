//! Typed vehicle activity records decoded from the XML feed.

use chrono::{DateTime, Utc};

use crate::domain::{Coordinate, JourneyCall};

/// One `VehicleActivity` block: a vehicle's latest report and upcoming calls.
///
/// Most fields are optional because publishers omit elements freely.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehicleActivity {
    /// When the vehicle recorded this report.
    pub recorded_at: Option<DateTime<Utc>>,

    /// Machine line reference (`LineRef`).
    pub line_ref: Option<String>,

    /// Public line name (`PublishedLineName`).
    pub published_line_name: Option<String>,

    /// Destination text (`DestinationName`).
    pub destination_name: Option<String>,

    /// Vehicle identifier (`VehicleRef`).
    pub vehicle_ref: Option<String>,

    /// Journey identifier (`DatedVehicleJourneyRef`).
    pub journey_ref: Option<String>,

    /// Current position (`VehicleLocation`).
    pub location: Option<Coordinate>,

    /// Compass heading in degrees (`Bearing`).
    pub bearing: Option<f64>,

    /// The call the vehicle is heading to now (`MonitoredCall`).
    pub next_call: Option<JourneyCall>,

    /// Later calls in journey order (`OnwardCalls`).
    pub onward_calls: Vec<JourneyCall>,
}

impl VehicleActivity {
    /// Line name for display: published name, falling back to the line reference.
    pub fn line_name(&self) -> Option<&str> {
        self.published_line_name
            .as_deref()
            .or(self.line_ref.as_deref())
    }

    /// Identifier used to tell vehicles apart: vehicle reference, falling
    /// back to the journey reference.
    pub fn vehicle_key(&self) -> Option<&str> {
        self.vehicle_ref.as_deref().or(self.journey_ref.as_deref())
    }
}

//! Mock vehicle monitoring feed for running without API access.
//!
//! Loads a saved SIRI-VM document from disk and serves it as if it were a
//! live response.

use std::path::Path;
use std::sync::Arc;

use crate::domain::BoundingBox;

use super::error::SiriError;
use super::parse::parse_vehicle_monitoring;
use super::types::VehicleActivity;

/// File name the mock expects inside its data directory.
pub const MOCK_VEHICLE_MONITORING_FILE: &str = "vehicle-monitoring.xml";

/// Mock feed that serves vehicle activity from an XML file.
#[derive(Debug, Clone)]
pub struct MockSiriFeed {
    activities: Arc<Vec<VehicleActivity>>,
}

impl MockSiriFeed {
    /// Load `vehicle-monitoring.xml` from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, SiriError> {
        let path = data_dir.as_ref().join(MOCK_VEHICLE_MONITORING_FILE);

        let xml = std::fs::read_to_string(&path).map_err(|e| SiriError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })?;

        Ok(Self::from_activities(parse_vehicle_monitoring(&xml)?))
    }

    /// Serve a fixed set of activities.
    pub fn from_activities(activities: Vec<VehicleActivity>) -> Self {
        Self {
            activities: Arc::new(activities),
        }
    }

    /// Vehicle activity inside the bounding box.
    ///
    /// Mimics [`SiriClient::get_vehicle_activity`](super::SiriClient::get_vehicle_activity):
    /// activities without a location are dropped, as the upstream never
    /// returns them for a bounding-box query.
    pub async fn get_vehicle_activity(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<VehicleActivity>, SiriError> {
        Ok(self
            .activities
            .iter()
            .filter(|a| a.location.is_some_and(|loc| bbox.contains(&loc)))
            .cloned()
            .collect())
    }

    /// Number of activities loaded.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

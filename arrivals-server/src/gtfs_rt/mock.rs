//! Mock vehicle position feed for running without API access.

use std::path::Path;
use std::sync::Arc;

use crate::domain::{BoundingBox, VehicleReport};

use super::decode::decode_vehicle_reports;
use super::error::GtfsRtError;

/// File name the mock expects inside its data directory.
pub const MOCK_VEHICLE_POSITIONS_FILE: &str = "vehicle-positions.pb";

/// Mock feed that serves vehicle positions from a saved protobuf payload.
#[derive(Debug, Clone)]
pub struct MockGtfsRtFeed {
    reports: Arc<Vec<VehicleReport>>,
}

impl MockGtfsRtFeed {
    /// Load `vehicle-positions.pb` from a directory.
    ///
    /// The file goes through the same markup check and decode as a live
    /// response, so a saved HTML error page is rejected here.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, GtfsRtError> {
        let path = data_dir.as_ref().join(MOCK_VEHICLE_POSITIONS_FILE);

        let bytes = std::fs::read(&path).map_err(|e| GtfsRtError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })?;

        Ok(Self::from_reports(decode_vehicle_reports(&bytes)?))
    }

    /// Serve a fixed set of reports.
    pub fn from_reports(reports: Vec<VehicleReport>) -> Self {
        Self {
            reports: Arc::new(reports),
        }
    }

    /// Vehicle positions inside the bounding box.
    ///
    /// Mimics [`GtfsRtClient::get_vehicle_positions`](super::GtfsRtClient::get_vehicle_positions).
    pub async fn get_vehicle_positions(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<VehicleReport>, GtfsRtError> {
        Ok(self
            .reports
            .iter()
            .filter(|r| bbox.contains(&r.position))
            .cloned()
            .collect())
    }

    /// Number of reports loaded.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

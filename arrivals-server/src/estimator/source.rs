//! Feed sources the estimators read from.
//!
//! Implemented by the live HTTP clients and the file-backed mocks; tests
//! supply their own in-memory sources.

use std::future::Future;
use std::time::Duration;

use crate::domain::{BoundingBox, VehicleReport};
use crate::gtfs_rt::{GtfsRtClient, GtfsRtError, MockGtfsRtFeed};
use crate::siri::{MockSiriFeed, SiriClient, SiriError, VehicleActivity};

/// Source of structured vehicle activity (vehicles plus upcoming calls).
pub trait VehicleMonitoringSource: Send + Sync {
    /// Fetch vehicle activity inside the bounding box.
    fn fetch_vehicle_activity(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<VehicleActivity>, SiriError>> + Send;
}

/// Source of raw vehicle positions.
pub trait VehiclePositionSource: Send + Sync {
    /// Fetch vehicle positions inside the bounding box.
    fn fetch_vehicle_positions(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<VehicleReport>, GtfsRtError>> + Send;

    /// How long one fetch may take when it is made of several bounded
    /// requests. The pipeline never cuts such a fetch off sooner.
    fn fetch_budget(&self) -> Option<Duration> {
        None
    }
}

impl VehicleMonitoringSource for SiriClient {
    fn fetch_vehicle_activity(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<VehicleActivity>, SiriError>> + Send {
        self.get_vehicle_activity(bbox)
    }
}

impl VehicleMonitoringSource for MockSiriFeed {
    fn fetch_vehicle_activity(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<VehicleActivity>, SiriError>> + Send {
        self.get_vehicle_activity(bbox)
    }
}

impl VehiclePositionSource for GtfsRtClient {
    fn fetch_vehicle_positions(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<VehicleReport>, GtfsRtError>> + Send {
        self.get_vehicle_positions(bbox)
    }

    fn fetch_budget(&self) -> Option<Duration> {
        Some(GtfsRtClient::fetch_budget(self))
    }
}

impl VehiclePositionSource for MockGtfsRtFeed {
    fn fetch_vehicle_positions(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<VehicleReport>, GtfsRtError>> + Send {
        self.get_vehicle_positions(bbox)
    }
}

//! Binary vehicle position feed (GTFS-Realtime protobuf).
//!
//! Positions only: each entity may carry a vehicle with a trip/route
//! reference, a lat/lon/bearing and a report timestamp. There is no per-stop
//! call data, so this feed backs the fallback estimator.

mod client;
mod decode;
mod error;
mod mock;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::{GtfsRtClient, GtfsRtConfig, QueryMode};
pub use decode::{decode_feed, decode_vehicle_reports, looks_like_markup, vehicle_reports};
pub use error::GtfsRtError;
pub use mock::{MOCK_VEHICLE_POSITIONS_FILE, MockGtfsRtFeed};

#[cfg(test)]
pub(crate) use decode::tests::{feed as test_feed, vehicle_entity as test_vehicle_entity};

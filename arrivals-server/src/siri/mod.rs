//! Structured vehicle monitoring feed (SIRI-VM XML).
//!
//! Each `VehicleActivity` in the feed carries a vehicle's position and
//! bearing plus its upcoming calls: a "next call" (`MonitoredCall`) and an
//! ordered list of `OnwardCalls`, each with optional expected and aimed
//! arrival times. This is the feed the primary estimator works from.

mod client;
mod error;
mod mock;
mod parse;
mod types;

pub use client::{SiriClient, SiriConfig};
pub use error::SiriError;
pub use mock::{MOCK_VEHICLE_MONITORING_FILE, MockSiriFeed};
pub use parse::{parse_timestamp, parse_vehicle_monitoring};
pub use types::VehicleActivity;

//! Domain types for the arrivals service.
//!
//! Stops, vehicle telemetry, journey calls and the arrival predictions
//! produced from them. Everything except [`Stop`] is created per request
//! and discarded once the response is built.

mod arrival;
mod coordinate;
mod failure;
mod stop;
mod stop_id;
mod vehicle;

pub use arrival::{Arrival, TransportMode};
pub use coordinate::{BoundingBox, Coordinate};
pub use failure::{FailureSignal, StatusClass, classify_status};
pub use stop::Stop;
pub use stop_id::{StopAliases, is_matching_stop_id, normalize_stop_id};
pub use vehicle::{CallKind, JourneyCall, VehicleReport};

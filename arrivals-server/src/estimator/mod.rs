//! Arrival estimation from live vehicle feeds.
//!
//! Two estimators share one [`EstimatorPolicy`]:
//!
//! - [`structured`]: matches the stop against each vehicle's call list and
//!   reads the arrival time off the matched call.
//! - [`binary`]: position-only fallback using distance, heading and an
//!   assumed speed.
//!
//! [`ArrivalPipeline`] runs them in that order and absorbs every failure.

pub mod binary;
mod pipeline;
mod policy;
mod rank;
mod source;
pub mod structured;

pub use pipeline::ArrivalPipeline;
pub use policy::EstimatorPolicy;
pub use rank::finalize;
pub use source::{VehicleMonitoringSource, VehiclePositionSource};

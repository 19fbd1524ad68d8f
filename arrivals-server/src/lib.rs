//! Bus arrivals server.
//!
//! Answers "what is arriving at this stop?". Stops covered by an
//! authoritative prediction API are answered from it directly; everywhere
//! else arrivals are estimated from live vehicle feeds, first from the
//! structured call-list feed and then, failing that, from raw positions.

pub mod domain;
pub mod estimator;
pub mod geo;
pub mod gtfs_rt;
pub mod prediction;
pub mod router;
pub mod service;
pub mod siri;
pub mod web;

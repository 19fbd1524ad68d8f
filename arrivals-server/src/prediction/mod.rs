//! Authoritative stop-arrival predictions.
//!
//! For stops inside the authoritative network the operator publishes its own
//! arrival predictions, so nothing needs estimating: this client fetches
//! them and maps them onto [`Arrival`](crate::domain::Arrival).

mod client;
mod error;
mod types;

pub use client::{PredictionClient, PredictionConfig};
pub use error::PredictionError;
pub use types::{PredictionDto, convert_predictions};

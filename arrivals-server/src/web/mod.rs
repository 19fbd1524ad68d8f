//! Web layer for the arrivals service.
//!
//! `GET /health` and `GET /api/arrivals`.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;

//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::FailureSignal;
use crate::estimator::{VehicleMonitoringSource, VehiclePositionSource};
use crate::prediction::PredictionError;
use crate::service::DirectPredictionSource;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S, B, P>(state: AppState<S, B, P>) -> Router
where
    S: VehicleMonitoringSource + 'static,
    B: VehiclePositionSource + 'static,
    P: DirectPredictionSource + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/arrivals", get(arrivals::<S, B, P>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Arrivals at a stop.
async fn arrivals<S, B, P>(
    State(state): State<AppState<S, B, P>>,
    Query(query): Query<ArrivalsQuery>,
) -> Result<Json<ArrivalsResponse>, AppError>
where
    S: VehicleMonitoringSource + 'static,
    B: VehiclePositionSource + 'static,
    P: DirectPredictionSource + 'static,
{
    let stop = query
        .to_stop()
        .map_err(|message| AppError::BadRequest { message })?;

    let routed = state
        .service
        .arrivals(&stop, &stop.id, query.region.as_deref())
        .await?;

    Ok(Json(routed.into()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream(FailureSignal),
}

impl From<PredictionError> for AppError {
    fn from(e: PredictionError) -> Self {
        AppError::Upstream(FailureSignal::from(&e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest { message } => {
                warn!(status = 400, %message, "bad request");
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
            }
            AppError::Upstream(signal) => {
                warn!(status = 502, error = %signal.error, upstream_status = ?signal.status_code, "upstream failure");
                (StatusCode::BAD_GATEWAY, Json(signal)).into_response()
            }
        }
    }
}

//! Two-tier arrival estimation.
//!
//! The structured feed is tried first. Only when it yields nothing (empty,
//! failed, timed out or panicked) is the position feed fetched. Every
//! failure ends at this boundary: callers always get a list, possibly empty.

use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::domain::{Arrival, Stop, StopAliases};
use crate::gtfs_rt::GtfsRtError;
use crate::siri::SiriError;

use super::policy::EstimatorPolicy;
use super::source::{VehicleMonitoringSource, VehiclePositionSource};
use super::{binary, structured};

/// Errors a tier can fail with.
trait TierError: Display {
    /// Missing credentials were already reported at startup.
    fn is_not_configured(&self) -> bool;
}

impl TierError for SiriError {
    fn is_not_configured(&self) -> bool {
        matches!(self, SiriError::NotConfigured(_))
    }
}

impl TierError for GtfsRtError {
    fn is_not_configured(&self) -> bool {
        matches!(self, GtfsRtError::NotConfigured(_))
    }
}

/// Structured-then-binary arrival estimator.
pub struct ArrivalPipeline<S, B> {
    structured: S,
    binary: B,
    policy: EstimatorPolicy,
}

impl<S, B> ArrivalPipeline<S, B>
where
    S: VehicleMonitoringSource,
    B: VehiclePositionSource,
{
    /// Create a pipeline over the two feed sources.
    pub fn new(structured: S, binary: B, policy: EstimatorPolicy) -> Self {
        Self {
            structured,
            binary,
            policy,
        }
    }

    pub fn policy(&self) -> &EstimatorPolicy {
        &self.policy
    }

    /// Estimate arrivals at a stop as of now.
    pub async fn estimate_arrivals(&self, stop: &Stop, aliases: &StopAliases) -> Vec<Arrival> {
        self.estimate_arrivals_at(stop, aliases, Utc::now()).await
    }

    /// Estimate arrivals at a stop as of `now`.
    ///
    /// A stop without a usable location returns no arrivals and makes no
    /// upstream requests.
    pub async fn estimate_arrivals_at(
        &self,
        stop: &Stop,
        aliases: &StopAliases,
        now: DateTime<Utc>,
    ) -> Vec<Arrival> {
        if !stop.has_usable_location() {
            debug!(stop = %stop.id, "stop has no usable location, skipping estimation");
            return Vec::new();
        }

        let arrivals = run_tier(
            "structured",
            &stop.id,
            self.policy.structured_timeout(),
            structured::estimate(&self.structured, stop, aliases, &self.policy, now),
        )
        .await;

        if !arrivals.is_empty() {
            return arrivals;
        }

        info!(stop = %stop.id, "no structured feed arrivals, falling back to position feed");

        // Operator-mode fetches are bounded per request; only cut them off
        // once every request has had its full timeout.
        let binary_limit = self
            .binary
            .fetch_budget()
            .map_or(self.policy.binary_timeout(), |budget| {
                budget.max(self.policy.binary_timeout())
            });

        run_tier(
            "binary",
            &stop.id,
            binary_limit,
            binary::estimate(&self.binary, stop, &self.policy, now),
        )
        .await
    }
}

/// Run one tier, turning errors, timeouts and panics into an empty list.
async fn run_tier<F, E>(tier: &'static str, stop_id: &str, limit: Duration, fut: F) -> Vec<Arrival>
where
    F: Future<Output = Result<Vec<Arrival>, E>>,
    E: TierError,
{
    match tokio::time::timeout(limit, AssertUnwindSafe(fut).catch_unwind()).await {
        Ok(Ok(Ok(arrivals))) => arrivals,
        Ok(Ok(Err(e))) if e.is_not_configured() => {
            debug!(tier, stop = %stop_id, error = %e, "feed not configured");
            Vec::new()
        }
        Ok(Ok(Err(e))) => {
            warn!(tier, stop = %stop_id, error = %e, "feed fetch failed");
            Vec::new()
        }
        Ok(Err(_)) => {
            error!(tier, stop = %stop_id, "estimator panicked");
            Vec::new()
        }
        Err(_) => {
            warn!(tier, stop = %stop_id, timeout_secs = limit.as_secs(), "feed fetch timed out");
            Vec::new()
        }
    }
}

//! The arrivals service: routing plus both providers.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Arrival, Stop};
use crate::estimator::{ArrivalPipeline, VehicleMonitoringSource, VehiclePositionSource};
use crate::prediction::{PredictionClient, PredictionError};
use crate::router::{Provider, ProviderRouter};

/// Source of authoritative per-stop predictions.
pub trait DirectPredictionSource: Send + Sync {
    /// Predicted arrivals at a stop, soonest first.
    fn arrivals_for_stop(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<Vec<Arrival>, PredictionError>> + Send;
}

impl DirectPredictionSource for PredictionClient {
    fn arrivals_for_stop(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<Vec<Arrival>, PredictionError>> + Send {
        self.get_arrivals(stop_id)
    }
}

/// Arrivals together with the provider that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct RoutedArrivals {
    pub provider: Provider,
    pub arrivals: Vec<Arrival>,
}

/// Entry point for arrival lookups.
pub struct ArrivalsService<S, B, P> {
    router: ProviderRouter,
    pipeline: ArrivalPipeline<S, B>,
    direct: P,
}

impl<S, B, P> ArrivalsService<S, B, P>
where
    S: VehicleMonitoringSource,
    B: VehiclePositionSource,
    P: DirectPredictionSource,
{
    pub fn new(router: ProviderRouter, pipeline: ArrivalPipeline<S, B>, direct: P) -> Self {
        Self {
            router,
            pipeline,
            direct,
        }
    }

    /// Arrivals at `stop`, looked up by `requested_id`.
    ///
    /// Only the direct provider can fail; estimation failures come back as
    /// an empty list.
    pub async fn arrivals(
        &self,
        stop: &Stop,
        requested_id: &str,
        region: Option<&str>,
    ) -> Result<RoutedArrivals, PredictionError> {
        let provider = self.router.route_request(requested_id, region);
        debug!(stop = %requested_id, %provider, "routing arrivals request");

        let arrivals = match provider {
            Provider::DirectPrediction => self
                .direct
                .arrivals_for_stop(requested_id)
                .await
                .inspect_err(|e| warn!(stop = %requested_id, error = %e, "direct prediction failed"))?,
            Provider::Estimated => {
                let aliases = stop.aliases(requested_id);
                self.pipeline.estimate_arrivals(stop, &aliases).await
            }
        };

        Ok(RoutedArrivals { provider, arrivals })
    }
}

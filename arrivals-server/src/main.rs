use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use arrivals_server::estimator::{
    ArrivalPipeline, EstimatorPolicy, VehicleMonitoringSource, VehiclePositionSource,
};
use arrivals_server::gtfs_rt::{GtfsRtClient, GtfsRtConfig, MockGtfsRtFeed};
use arrivals_server::prediction::{PredictionClient, PredictionConfig};
use arrivals_server::router::{ProviderRouter, RouterConfig};
use arrivals_server::service::ArrivalsService;
use arrivals_server::siri::{MockSiriFeed, SiriClient, SiriConfig};
use arrivals_server::web::{AppState, create_router};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_LOG_FILTER: &str = "arrivals_server=info,tower_http=info";

/// A non-blank environment variable.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A comma-separated environment variable.
fn env_list(name: &str) -> Option<Vec<String>> {
    env_var(name).map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // Direct prediction provider
    let mut prediction_config = PredictionConfig::new(env_var("PREDICTION_API_KEY").unwrap_or_default());
    if let Some(url) = env_var("PREDICTION_BASE_URL") {
        prediction_config = prediction_config.with_base_url(url);
    }
    let direct = PredictionClient::new(prediction_config)?;

    // Routing table
    let mut router_config = RouterConfig::default();
    if let Some(prefixes) = env_list("AUTHORITATIVE_STOP_PREFIXES") {
        router_config = router_config.with_stop_prefixes(prefixes);
    }
    if let Some(regions) = env_list("AUTHORITATIVE_REGIONS") {
        router_config = router_config.with_regions(regions);
    }
    let router = ProviderRouter::new(router_config);

    let addr: SocketAddr = env_var("BIND_ADDR")
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    if let Some(dir) = env_var("MOCK_FEED_DIR").map(PathBuf::from) {
        info!(dir = %dir.display(), "serving vehicle feeds from files");

        let structured = MockSiriFeed::new(&dir).unwrap_or_else(|e| {
            warn!(error = %e, "no mock vehicle monitoring data");
            MockSiriFeed::from_activities(Vec::new())
        });
        let binary = MockGtfsRtFeed::new(&dir).unwrap_or_else(|e| {
            warn!(error = %e, "no mock vehicle position data");
            MockGtfsRtFeed::from_reports(Vec::new())
        });
        info!(
            activities = structured.len(),
            positions = binary.len(),
            "loaded mock feeds"
        );

        return serve(structured, binary, direct, router, addr).await;
    }

    // Both feeds share one key
    let feed_key = env_var("FEED_API_KEY").unwrap_or_else(|| {
        warn!("FEED_API_KEY not set, vehicle feeds disabled: only authoritative stops will have arrivals");
        String::new()
    });

    let mut siri_config = SiriConfig::new(&feed_key);
    if let Some(url) = env_var("SIRI_BASE_URL") {
        siri_config = siri_config.with_base_url(url);
    }

    let mut gtfs_config = GtfsRtConfig::new(&feed_key);
    if let Some(url) = env_var("GTFS_RT_BASE_URL") {
        gtfs_config = gtfs_config.with_base_url(url);
    }
    if let Some(operators) = env_list("GTFS_RT_OPERATORS") {
        info!(?operators, "querying vehicle positions by operator");
        gtfs_config = gtfs_config.with_operators(operators);
    }

    let structured = SiriClient::new(siri_config)?;
    let binary = GtfsRtClient::new(gtfs_config)?;

    serve(structured, binary, direct, router, addr).await
}

async fn serve<S, B>(
    structured: S,
    binary: B,
    direct: PredictionClient,
    router: ProviderRouter,
    addr: SocketAddr,
) -> Result<(), Box<dyn Error>>
where
    S: VehicleMonitoringSource + 'static,
    B: VehiclePositionSource + 'static,
{
    let pipeline = ArrivalPipeline::new(structured, binary, EstimatorPolicy::default());
    let state = AppState::new(ArrivalsService::new(router, pipeline, direct));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Bus arrivals server listening on http://{addr}");
    info!("  GET /health");
    info!("  GET /api/arrivals?stop_id=..&code=..&lat=..&lon=..&name=..");

    axum::serve(listener, app).await?;
    Ok(())
}

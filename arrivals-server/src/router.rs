//! Provider selection.
//!
//! Stops inside the authoritative network are served by its own prediction
//! API; everything else goes through the estimation pipeline. Selection is
//! a pure lookup on the stop identifier (and optionally a region name).

use std::fmt;

use serde::Serialize;

use crate::domain::normalize_stop_id;

/// Which upstream serves a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Authoritative per-stop predictions.
    DirectPrediction,
    /// Estimated from live vehicle feeds.
    Estimated,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::DirectPrediction => write!(f, "direct_prediction"),
            Provider::Estimated => write!(f, "estimated"),
        }
    }
}

/// Default identifier prefixes of the authoritative network.
pub const DEFAULT_STOP_PREFIXES: &[&str] = &["490", "940G"];

/// Default regions covered by the authoritative network.
pub const DEFAULT_REGIONS: &[&str] = &["london"];

/// Routing table configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Stop identifier prefixes served by the direct provider.
    pub stop_prefixes: Vec<String>,

    /// Region names served by the direct provider.
    pub regions: Vec<String>,
}

impl RouterConfig {
    /// Replace the stop prefixes.
    pub fn with_stop_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_prefixes = prefixes
            .into_iter()
            .map(|p| normalize_stop_id(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Replace the regions.
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.regions = regions
            .into_iter()
            .map(|r| r.as_ref().trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .collect();
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            stop_prefixes: DEFAULT_STOP_PREFIXES.iter().map(|s| s.to_string()).collect(),
            regions: DEFAULT_REGIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Maps stops to providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderRouter {
    config: RouterConfig,
}

impl ProviderRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Provider for a stop identifier.
    pub fn route(&self, stop_id: &str) -> Provider {
        let id = normalize_stop_id(stop_id);
        if !id.is_empty() && self.config.stop_prefixes.iter().any(|p| id.starts_with(p.as_str())) {
            Provider::DirectPrediction
        } else {
            Provider::Estimated
        }
    }

    /// Provider for a stop, letting a configured region override the prefix lookup.
    pub fn route_request(&self, stop_id: &str, region: Option<&str>) -> Provider {
        let in_region = region
            .map(|r| r.trim().to_lowercase())
            .is_some_and(|r| self.config.regions.contains(&r));

        if in_region {
            Provider::DirectPrediction
        } else {
            self.route(stop_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefixes() {
        let router = ProviderRouter::default();
        assert_eq!(router.route("490008660N"), Provider::DirectPrediction);
        assert_eq!(router.route(" 940gzzlubnk "), Provider::DirectPrediction);
        assert_eq!(router.route("0100BRP90310"), Provider::Estimated);
        assert_eq!(router.route("1800SB12345"), Provider::Estimated);
        assert_eq!(router.route(""), Provider::Estimated);
    }

    #[test]
    fn region_overrides_prefix() {
        let router = ProviderRouter::default();
        assert_eq!(
            router.route_request("0100BRP90310", Some("London")),
            Provider::DirectPrediction
        );
        assert_eq!(
            router.route_request("0100BRP90310", Some("bristol")),
            Provider::Estimated
        );
        assert_eq!(router.route_request("490008660N", None), Provider::DirectPrediction);
    }

    #[test]
    fn custom_config() {
        let config = RouterConfig::default()
            .with_stop_prefixes(["0100", " "])
            .with_regions(Vec::<String>::new());
        let router = ProviderRouter::new(config);
        assert_eq!(router.route("0100BRP90310"), Provider::DirectPrediction);
        assert_eq!(router.route("490008660N"), Provider::Estimated);
        assert_eq!(router.route_request("490008660N", Some("london")), Provider::Estimated);
    }

    #[test]
    fn provider_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Provider::DirectPrediction).unwrap(),
            "\"direct_prediction\""
        );
        assert_eq!(Provider::Estimated.to_string(), "estimated");
    }
}

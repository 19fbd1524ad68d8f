//! Fallback estimator: arrivals from raw vehicle positions.
//!
//! The position feed says nothing about which stops a vehicle will call at,
//! so a vehicle is assumed to be coming if it is within range and heading
//! towards the stop. Time is distance over an assumed average speed.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::domain::{Arrival, BoundingBox, Stop, TransportMode, VehicleReport};
use crate::geo::is_heading_toward;
use crate::gtfs_rt::GtfsRtError;

use super::policy::EstimatorPolicy;
use super::rank::finalize;
use super::source::VehiclePositionSource;
use super::structured::distance_text;

/// Fallback label length when no route number can be found.
const RAW_LABEL_LEN: usize = 8;

/// Fetch vehicle positions around the stop and estimate arrivals.
pub async fn estimate<B: VehiclePositionSource>(
    source: &B,
    stop: &Stop,
    policy: &EstimatorPolicy,
    now: DateTime<Utc>,
) -> Result<Vec<Arrival>, GtfsRtError> {
    let bbox = BoundingBox::around(stop.location, policy.search_radius_km);
    let reports = source.fetch_vehicle_positions(&bbox).await?;
    Ok(arrivals_from_reports(&reports, stop, policy, now))
}

/// Why a report was not turned into an arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Stale,
    OutOfRange,
    NoBearing,
    WrongHeading,
    TooFar,
}

/// Estimate arrivals at `stop` from already-fetched vehicle positions.
pub fn arrivals_from_reports(
    reports: &[VehicleReport],
    stop: &Stop,
    policy: &EstimatorPolicy,
    now: DateTime<Utc>,
) -> Vec<Arrival> {
    let mut rejected = [0usize; 5];
    let mut arrivals = Vec::new();

    for report in reports {
        match arrival_for_report(report, stop, policy, now) {
            Ok(arrival) => arrivals.push(arrival),
            Err(reason) => rejected[reason as usize] += 1,
        }
    }

    debug!(
        stop = %stop.id,
        vehicles = reports.len(),
        stale = rejected[Rejection::Stale as usize],
        out_of_range = rejected[Rejection::OutOfRange as usize],
        no_bearing = rejected[Rejection::NoBearing as usize],
        wrong_heading = rejected[Rejection::WrongHeading as usize],
        too_far = rejected[Rejection::TooFar as usize],
        estimated = arrivals.len(),
        "position feed estimate"
    );

    finalize(arrivals, policy.max_results)
}

fn arrival_for_report(
    report: &VehicleReport,
    stop: &Stop,
    policy: &EstimatorPolicy,
    now: DateTime<Utc>,
) -> Result<Arrival, Rejection> {
    if policy.is_stale(report.recorded_at, now) {
        return Err(Rejection::Stale);
    }

    let distance_km = report.position.distance_km_to(&stop.location);
    if !report.position.is_usable()
        || distance_km > policy.search_radius_km
        || distance_km < policy.min_distance_km
    {
        return Err(Rejection::OutOfRange);
    }

    match report.bearing {
        None if policy.require_bearing => return Err(Rejection::NoBearing),
        None => {}
        Some(_) => {
            let to_stop = report.position.bearing_to(&stop.location);
            if !is_heading_toward(report.bearing, to_stop, policy.heading_tolerance_deg) {
                return Err(Rejection::WrongHeading);
            }
        }
    }

    let secs = EstimatorPolicy::travel_secs(distance_km, policy.binary_speed_kmh);
    if secs > f64::from(policy.geospatial_horizon_secs) {
        return Err(Rejection::TooFar);
    }
    let secs = secs as u32;

    let line_name = line_label(report.route_ref.as_deref(), report.trip_ref.as_deref());

    Ok(Arrival {
        id: format!("{}-{}-{}", report.vehicle_id, line_name, stop.id),
        line_name,
        destination: String::new(),
        time_to_station: secs,
        expected_arrival: now + Duration::seconds(i64::from(secs)),
        vehicle_id: report.vehicle_id.clone(),
        current_location: distance_text(distance_km),
        towards: String::new(),
        mode: TransportMode::Bus,
    })
}

/// Best-effort public line label from feed route/trip references.
///
/// Looks for a token shaped like a route number (an optional letter, one to
/// three digits, an optional letter: "38", "N5", "X10A") in the route
/// reference, then the trip reference. Otherwise falls back to the first
/// eight characters of whichever reference is present.
pub fn line_label(route_ref: Option<&str>, trip_ref: Option<&str>) -> String {
    let refs = [route_ref, trip_ref];
    let present = refs
        .iter()
        .flatten()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty());

    for raw in present.clone() {
        if let Some(token) = raw
            .split(|c: char| !c.is_ascii_alphanumeric())
            .find(|t| is_route_number(t))
        {
            return token.to_ascii_uppercase();
        }
    }

    present
        .map(|raw| raw.chars().take(RAW_LABEL_LEN).collect())
        .next()
        .unwrap_or_default()
}

fn is_route_number(token: &str) -> bool {
    let bytes = token.as_bytes();
    let start = usize::from(bytes.first().is_some_and(u8::is_ascii_alphabetic));
    let end = bytes.len()
        - usize::from(bytes.len() > start && bytes.last().is_some_and(u8::is_ascii_alphabetic));
    let digits = &bytes[start..end];

    (1..=3).contains(&digits.len()) && digits.iter().all(u8::is_ascii_digit)
}

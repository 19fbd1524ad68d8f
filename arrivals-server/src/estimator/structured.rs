//! Primary estimator: arrivals from vehicle activity with call lists.
//!
//! A vehicle counts as arriving if the target stop appears in its next call
//! or its onward calls. The arrival time comes from the matched call's
//! expected time, then its aimed time, and only then from the vehicle's
//! distance to the stop at an assumed speed.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::domain::{Arrival, BoundingBox, JourneyCall, Stop, StopAliases, TransportMode};
use crate::siri::{SiriError, VehicleActivity};

use super::policy::EstimatorPolicy;
use super::rank::finalize;
use super::source::VehicleMonitoringSource;

/// Fetch vehicle activity around the stop and estimate arrivals.
pub async fn estimate<S: VehicleMonitoringSource>(
    source: &S,
    stop: &Stop,
    aliases: &StopAliases,
    policy: &EstimatorPolicy,
    now: DateTime<Utc>,
) -> Result<Vec<Arrival>, SiriError> {
    let bbox = BoundingBox::around(stop.location, policy.search_radius_km);
    let activities = source.fetch_vehicle_activity(&bbox).await?;
    Ok(arrivals_from_activities(
        &activities,
        stop,
        aliases,
        policy,
        now,
    ))
}

/// Estimate arrivals at `stop` from already-fetched vehicle activity.
pub fn arrivals_from_activities(
    activities: &[VehicleActivity],
    stop: &Stop,
    aliases: &StopAliases,
    policy: &EstimatorPolicy,
    now: DateTime<Utc>,
) -> Vec<Arrival> {
    let mut stale = 0usize;
    let mut unmatched = 0usize;
    let mut arrivals = Vec::new();

    for activity in activities {
        if policy.is_stale(activity.recorded_at, now) {
            stale += 1;
            continue;
        }

        let Some((call, stops_away)) = find_call(activity, aliases) else {
            unmatched += 1;
            continue;
        };

        if let Some(arrival) = arrival_for_call(activity, call, stops_away, stop, policy, now) {
            arrivals.push(arrival);
        }
    }

    debug!(
        stop = %stop.id,
        vehicles = activities.len(),
        stale,
        unmatched,
        estimated = arrivals.len(),
        "structured feed estimate"
    );

    finalize(arrivals, policy.max_results)
}

/// Find the first call at the target stop, with how many stops away it is.
///
/// The next call is checked first (zero stops away), then onward calls in
/// journey order.
fn find_call<'a>(
    activity: &'a VehicleActivity,
    aliases: &StopAliases,
) -> Option<(&'a JourneyCall, usize)> {
    if let Some(next) = activity
        .next_call
        .as_ref()
        .filter(|c| aliases.matches(&c.stop_ref))
    {
        return Some((next, 0));
    }

    let offset = usize::from(activity.next_call.is_some());
    activity
        .onward_calls
        .iter()
        .position(|call| aliases.matches(&call.stop_ref))
        .map(|idx| (&activity.onward_calls[idx], idx + offset))
}

fn arrival_for_call(
    activity: &VehicleActivity,
    call: &JourneyCall,
    stops_away: usize,
    stop: &Stop,
    policy: &EstimatorPolicy,
    now: DateTime<Utc>,
) -> Option<Arrival> {
    let vehicle_id = activity.vehicle_key()?.to_string();

    let (time_to_station, expected_arrival, current_location) = match call.best_time() {
        Some(at) => {
            // Checked before truncating to whole seconds
            if at < now {
                return None;
            }
            let secs = (at - now).num_seconds();
            if secs > i64::from(policy.timed_horizon_secs) {
                return None;
            }
            (secs as u32, at, stops_away_text(stops_away))
        }
        None => {
            let location = activity.location.filter(|loc| loc.is_usable())?;
            let distance_km = location.distance_km_to(&stop.location);
            let secs = EstimatorPolicy::travel_secs(distance_km, policy.structured_speed_kmh);
            if !(0.0..=f64::from(policy.geospatial_horizon_secs)).contains(&secs) {
                return None;
            }
            let secs = secs as u32;
            (
                secs,
                now + Duration::seconds(i64::from(secs)),
                distance_text(distance_km),
            )
        }
    };

    let line_name = activity.line_name().unwrap_or_default().to_string();
    let destination = activity.destination_name.clone().unwrap_or_default();

    Some(Arrival {
        id: format!("{}-{}-{}", vehicle_id, line_name, stop.id),
        line_name,
        towards: destination.clone(),
        destination,
        time_to_station,
        expected_arrival,
        vehicle_id,
        current_location,
        mode: TransportMode::Bus,
    })
}

/// "At stop", "1 stop away", "N stops away".
pub(crate) fn stops_away_text(stops_away: usize) -> String {
    match stops_away {
        0 => "At stop".to_string(),
        1 => "1 stop away".to_string(),
        n => format!("{n} stops away"),
    }
}

/// Distance with one decimal place, e.g. "1.2 km away".
pub(crate) fn distance_text(distance_km: f64) -> String {
    format!("{distance_km:.1} km away")
}

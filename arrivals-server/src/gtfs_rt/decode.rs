//! Protobuf payload decoding.

use chrono::{DateTime, Utc};
use gtfs_realtime::{FeedEntity, FeedMessage};
use prost::Message;

use crate::domain::{Coordinate, VehicleReport};

use super::error::GtfsRtError;

/// Returns true if the payload looks like an HTML/XML error page.
///
/// Only the first byte is inspected: a protobuf feed message normally
/// starts with `0x0A` (field 1, length-delimited), which is also ASCII
/// newline, so leading whitespace cannot be skipped.
pub fn looks_like_markup(bytes: &[u8]) -> bool {
    bytes.first() == Some(&b'<')
}

/// Decode a feed message, rejecting markup payloads before decoding.
pub fn decode_feed(bytes: &[u8]) -> Result<FeedMessage, GtfsRtError> {
    if looks_like_markup(bytes) {
        return Err(GtfsRtError::HtmlPayload);
    }
    Ok(FeedMessage::decode(bytes)?)
}

/// Extract vehicle reports from a decoded feed.
///
/// Entities without a vehicle position are skipped. When an entity has no
/// timestamp of its own, the feed header timestamp is used.
pub fn vehicle_reports(feed: &FeedMessage) -> Vec<VehicleReport> {
    let header_timestamp = feed.header.timestamp;

    feed.entity
        .iter()
        .filter_map(|entity| entity_report(entity, header_timestamp))
        .collect()
}

/// Decode a payload straight to vehicle reports.
pub fn decode_vehicle_reports(bytes: &[u8]) -> Result<Vec<VehicleReport>, GtfsRtError> {
    let feed = decode_feed(bytes)?;
    Ok(vehicle_reports(&feed))
}

fn entity_report(entity: &FeedEntity, header_timestamp: Option<u64>) -> Option<VehicleReport> {
    if entity.is_deleted == Some(true) {
        return None;
    }

    let vehicle = entity.vehicle.as_ref()?;
    let position = vehicle.position.as_ref()?;

    let vehicle_id = vehicle
        .vehicle
        .as_ref()
        .and_then(|v| v.id.clone().or_else(|| v.label.clone()))
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| entity.id.clone());

    let recorded_at = vehicle
        .timestamp
        .or(header_timestamp)
        .and_then(|ts| i64::try_from(ts).ok())
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

    let trip = vehicle.trip.as_ref();

    Some(VehicleReport {
        vehicle_id,
        position: Coordinate::new(f64::from(position.latitude), f64::from(position.longitude)),
        bearing: position.bearing.map(f64::from),
        recorded_at,
        route_ref: trip.and_then(|t| t.route_id.clone()),
        trip_ref: trip.and_then(|t| t.trip_id.clone()),
    })
}

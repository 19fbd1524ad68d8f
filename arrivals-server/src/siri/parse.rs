//! XML decoding for vehicle monitoring deliveries.
//!
//! Elements are matched by local name so documents parse the same with or
//! without the SIRI namespace declared. Unparseable values inside an
//! otherwise valid record are dropped rather than failing the document.

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};

use crate::domain::{CallKind, Coordinate, JourneyCall};

use super::error::SiriError;
use super::types::VehicleActivity;

/// Parse a vehicle monitoring document into activity records, in document order.
///
/// Records without a `MonitoredVehicleJourney` are skipped.
pub fn parse_vehicle_monitoring(xml: &str) -> Result<Vec<VehicleActivity>, SiriError> {
    let doc = Document::parse(xml).map_err(|e| SiriError::Xml(e.to_string()))?;

    Ok(doc
        .descendants()
        .filter(|n| is_element(n, "VehicleActivity"))
        .filter_map(parse_activity)
        .collect())
}

fn parse_activity(node: Node<'_, '_>) -> Option<VehicleActivity> {
    let journey = child(node, "MonitoredVehicleJourney")?;

    let location = child(journey, "VehicleLocation").and_then(|loc| {
        let lat = child_f64(loc, "Latitude")?;
        let lon = child_f64(loc, "Longitude")?;
        Some(Coordinate::new(lat, lon))
    });

    let journey_ref = child(journey, "FramedVehicleJourneyRef")
        .and_then(|framed| child_text(framed, "DatedVehicleJourneyRef"))
        .or_else(|| child_text(journey, "DatedVehicleJourneyRef"))
        .or_else(|| child_text(journey, "VehicleJourneyRef"))
        .map(str::to_string);

    let next_call = child(journey, "MonitoredCall").and_then(|c| parse_call(c, CallKind::Next));

    let mut onward_calls: Vec<JourneyCall> = child(journey, "OnwardCalls")
        .map(|calls| {
            calls
                .children()
                .filter(|n| is_element(n, "OnwardCall"))
                .filter_map(|c| parse_call(c, CallKind::Onward))
                .collect()
        })
        .unwrap_or_default();
    // Stable: calls without an order keep their document position at the end
    onward_calls.sort_by_key(|c| c.order.unwrap_or(u32::MAX));

    Some(VehicleActivity {
        recorded_at: child_text(node, "RecordedAtTime").and_then(parse_timestamp),
        line_ref: child_string(journey, "LineRef"),
        published_line_name: child_string(journey, "PublishedLineName"),
        destination_name: child_string(journey, "DestinationName"),
        vehicle_ref: child_string(journey, "VehicleRef"),
        journey_ref,
        location,
        bearing: child_f64(journey, "Bearing"),
        next_call,
        onward_calls,
    })
}

/// Parse a `MonitoredCall` or `OnwardCall`. Calls without a stop reference
/// are useless for matching and are dropped.
fn parse_call(node: Node<'_, '_>, kind: CallKind) -> Option<JourneyCall> {
    let stop_ref = child_text(node, "StopPointRef")?;

    let order = child_text(node, "Order")
        .or_else(|| child_text(node, "VisitNumber"))
        .and_then(|s| s.parse::<u32>().ok());

    // First stops of a journey often publish departure times only
    let expected_arrival = child_text(node, "ExpectedArrivalTime")
        .and_then(parse_timestamp)
        .or_else(|| child_text(node, "ExpectedDepartureTime").and_then(parse_timestamp));
    let aimed_arrival = child_text(node, "AimedArrivalTime")
        .and_then(parse_timestamp)
        .or_else(|| child_text(node, "AimedDepartureTime").and_then(parse_timestamp));

    Some(JourneyCall {
        stop_ref: stop_ref.to_string(),
        order,
        expected_arrival,
        aimed_arrival,
        kind,
    })
}

/// Parse an ISO 8601 timestamp with offset into UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn is_element(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_element(n, name))
}

/// Trimmed, non-empty text of the named child element.
fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn child_string(node: Node<'_, '_>, name: &str) -> Option<String> {
    child_text(node, name).map(str::to_string)
}

fn child_f64(node: Node<'_, '_>, name: &str) -> Option<f64> {
    child_text(node, name)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Siri xmlns="http://www.siri.org.uk/siri" version="2.0">
  <ServiceDelivery>
    <ResponseTimestamp>2026-03-15T10:00:05+00:00</ResponseTimestamp>
    <VehicleMonitoringDelivery>
      <VehicleActivity>
        <RecordedAtTime>2026-03-15T10:00:00+00:00</RecordedAtTime>
        <MonitoredVehicleJourney>
          <LineRef>OP_38</LineRef>
          <PublishedLineName>38</PublishedLineName>
          <DestinationName>Victoria</DestinationName>
          <FramedVehicleJourneyRef>
            <DataFrameRef>2026-03-15</DataFrameRef>
            <DatedVehicleJourneyRef>1042</DatedVehicleJourneyRef>
          </FramedVehicleJourneyRef>
          <VehicleLocation>
            <Longitude>-0.1213</Longitude>
            <Latitude>51.5390</Latitude>
          </VehicleLocation>
          <Bearing>195.0</Bearing>
          <VehicleRef>LT52</VehicleRef>
          <MonitoredCall>
            <StopPointRef>490008660N</StopPointRef>
            <Order>12</Order>
            <AimedArrivalTime>2026-03-15T10:02:00+00:00</AimedArrivalTime>
            <ExpectedArrivalTime>2026-03-15T10:03:00+00:00</ExpectedArrivalTime>
          </MonitoredCall>
          <OnwardCalls>
            <OnwardCall>
              <StopPointRef>490007705S</StopPointRef>
              <Order>14</Order>
              <AimedArrivalTime>2026-03-15T10:08:00+00:00</AimedArrivalTime>
            </OnwardCall>
            <OnwardCall>
              <StopPointRef>490003029W</StopPointRef>
              <Order>13</Order>
              <ExpectedArrivalTime>2026-03-15T11:05:00+01:00</ExpectedArrivalTime>
            </OnwardCall>
            <OnwardCall>
              <Order>15</Order>
            </OnwardCall>
          </OnwardCalls>
        </MonitoredVehicleJourney>
      </VehicleActivity>
      <VehicleActivity>
        <RecordedAtTime>not a time</RecordedAtTime>
        <MonitoredVehicleJourney>
          <LineRef>N5</LineRef>
          <VehicleLocation>
            <Longitude>abc</Longitude>
            <Latitude>51.5</Latitude>
          </VehicleLocation>
        </MonitoredVehicleJourney>
      </VehicleActivity>
      <VehicleActivity>
        <RecordedAtTime>2026-03-15T10:00:00Z</RecordedAtTime>
      </VehicleActivity>
    </VehicleMonitoringDelivery>
  </ServiceDelivery>
</Siri>"#;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn parses_full_activity() {
        let activities = parse_vehicle_monitoring(SAMPLE).unwrap();
        assert_eq!(activities.len(), 2);

        let a = &activities[0];
        assert_eq!(a.recorded_at, Some(ts("2026-03-15T10:00:00Z")));
        assert_eq!(a.line_name(), Some("38"));
        assert_eq!(a.line_ref.as_deref(), Some("OP_38"));
        assert_eq!(a.destination_name.as_deref(), Some("Victoria"));
        assert_eq!(a.vehicle_ref.as_deref(), Some("LT52"));
        assert_eq!(a.journey_ref.as_deref(), Some("1042"));
        assert_eq!(a.location, Some(Coordinate::new(51.5390, -0.1213)));
        assert_eq!(a.bearing, Some(195.0));

        let next = a.next_call.as_ref().unwrap();
        assert_eq!(next.kind, CallKind::Next);
        assert_eq!(next.stop_ref, "490008660N");
        assert_eq!(next.order, Some(12));
        assert_eq!(next.expected_arrival, Some(ts("2026-03-15T10:03:00Z")));
        assert_eq!(next.aimed_arrival, Some(ts("2026-03-15T10:02:00Z")));
    }

    #[test]
    fn onward_calls_sorted_by_order_and_refless_calls_dropped() {
        let activities = parse_vehicle_monitoring(SAMPLE).unwrap();
        let onward = &activities[0].onward_calls;

        let refs: Vec<&str> = onward.iter().map(|c| c.stop_ref.as_str()).collect();
        assert_eq!(refs, vec!["490003029W", "490007705S"]);
        assert!(onward.iter().all(|c| c.kind == CallKind::Onward));

        // Offset timestamps are normalised to UTC
        assert_eq!(onward[0].expected_arrival, Some(ts("2026-03-15T10:05:00Z")));
        assert_eq!(onward[1].expected_arrival, None);
        assert_eq!(onward[1].aimed_arrival, Some(ts("2026-03-15T10:08:00Z")));
    }

    #[test]
    fn bad_values_are_dropped_not_fatal() {
        let activities = parse_vehicle_monitoring(SAMPLE).unwrap();
        let b = &activities[1];
        assert_eq!(b.recorded_at, None);
        assert_eq!(b.location, None);
        assert_eq!(b.line_name(), Some("N5"));
        assert!(b.next_call.is_none());
        assert!(b.onward_calls.is_empty());
    }

    #[test]
    fn departure_times_fill_in_missing_arrivals() {
        let xml = r#"<Siri><ServiceDelivery><VehicleMonitoringDelivery>
            <VehicleActivity>
              <MonitoredVehicleJourney>
                <MonitoredCall>
                  <StopPointRef>A</StopPointRef>
                  <AimedDepartureTime>2026-03-15T10:02:00Z</AimedDepartureTime>
                  <ExpectedDepartureTime>2026-03-15T10:04:00Z</ExpectedDepartureTime>
                </MonitoredCall>
              </MonitoredVehicleJourney>
            </VehicleActivity>
        </VehicleMonitoringDelivery></ServiceDelivery></Siri>"#;

        let activities = parse_vehicle_monitoring(xml).unwrap();
        let call = activities[0].next_call.as_ref().unwrap();
        assert_eq!(call.expected_arrival, Some(ts("2026-03-15T10:04:00Z")));
        assert_eq!(call.aimed_arrival, Some(ts("2026-03-15T10:02:00Z")));
    }

    #[test]
    fn empty_delivery() {
        let xml = "<Siri><ServiceDelivery><VehicleMonitoringDelivery/></ServiceDelivery></Siri>";
        assert!(parse_vehicle_monitoring(xml).unwrap().is_empty());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let result = parse_vehicle_monitoring("<Siri><ServiceDelivery>");
        assert!(matches!(result, Err(SiriError::Xml(_))));

        let result = parse_vehicle_monitoring("<html><body>502 Bad Gateway</body>");
        assert!(matches!(result, Err(SiriError::Xml(_))));
    }
}

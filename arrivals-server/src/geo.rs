//! Great-circle distance, bearing and heading-match calculations.
//!
//! Pure functions on decimal-degree coordinates. The Earth is modelled as a
//! sphere of mean radius, which is accurate to well under 1% at the
//! distances the estimators care about (a few kilometres).

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default tolerance for [`is_heading_toward`], in degrees.
pub const DEFAULT_HEADING_TOLERANCE_DEG: f64 = 60.0;

/// Great-circle distance between two points using the haversine formula.
///
/// Returns kilometres.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` fractionally above 1 for antipodal points
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Initial compass bearing from point 1 towards point 2.
///
/// Degrees clockwise from true north, normalised to `[0, 360)`.
pub fn bearing_degrees(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = delta_lon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Smallest angle between two compass bearings, in `[0, 180]`.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Returns true if a vehicle's heading points towards a target.
///
/// `bearing_to_target` is the bearing from the vehicle to the target.
/// The boundary is inclusive: a difference of exactly `tolerance_deg`
/// matches. A vehicle that reported no bearing never matches.
pub fn is_heading_toward(
    vehicle_bearing: Option<f64>,
    bearing_to_target: f64,
    tolerance_deg: f64,
) -> bool {
    match vehicle_bearing {
        Some(bearing) if bearing.is_finite() => {
            angular_difference(bearing, bearing_to_target) <= tolerance_deg
        }
        _ => false,
    }
}

/// Map any finite angle into `[0, 360)`.
fn normalize_degrees(deg: f64) -> f64 {
    let normalized = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

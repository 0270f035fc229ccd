//! Spatial math for corridor normalization and hazard distance checks.

/// Spherical-Earth radius used throughout the pipeline.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using the Haversine formula.
///
/// This is the standard formula for calculating great-circle distance
/// between two points on a sphere given their latitudes and longitudes.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Convert (lat, lon, altitude) to Cartesian coordinates on a spherical Earth.
///
/// Altitude is measured from the surface; the radial distance is
/// `EARTH_RADIUS_M + altitude_m`.
pub fn to_cartesian(lat: f64, lon: f64, altitude_m: f64) -> (f64, f64, f64) {
    let lat = lat.to_radians();
    let lon = lon.to_radians();
    let r = EARTH_RADIUS_M + altitude_m;
    let x = r * lon.sin() * lat.cos();
    let y = r * lon.cos() * lat.cos();
    let z = r * lat.sin();
    (x, y, z)
}

/// Inverse of [`to_cartesian`]: recover (lat, lon, altitude) in degrees/meters.
pub fn to_spherical(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let r = (x * x + y * y + z * z).sqrt();
    if r <= f64::EPSILON {
        return (0.0, 0.0, -EARTH_RADIUS_M);
    }
    let lat = (z / r).clamp(-1.0, 1.0).asin();
    let lon = x.atan2(y);
    (lat.to_degrees(), lon.to_degrees(), r - EARTH_RADIUS_M)
}

/// Euclidean distance in meters between two (lat, lon, altitude) points
/// after conversion to the Cartesian frame.
pub fn cartesian_distance(a: (f64, f64, f64), b: (f64, f64, f64)) -> f64 {
    let (ax, ay, az) = to_cartesian(a.0, a.1, a.2);
    let (bx, by, bz) = to_cartesian(b.0, b.1, b.2);
    let dx = ax - bx;
    let dy = ay - by;
    let dz = az - bz;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

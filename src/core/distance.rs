use crate::models::GeoPoint;
use geo::{HaversineDistance, Point};

/// Earth's mean radius in meters, the same radius `geo` uses for haversine
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Length of one degree of latitude in meters
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

/// Closest point of a segment to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    pub distance_meters: f64,
    pub projection: GeoPoint,
    /// Position of the projection along the segment, in [0, 1]
    pub t: f64,
}

/// Calculate the great-circle distance between two points in meters
#[inline]
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let pa = Point::new(a.longitude, a.latitude);
    let pb = Point::new(b.longitude, b.latitude);
    pa.haversine_distance(&pb)
}

/// Project `p` onto the segment `a -> b`
///
/// The segment is flattened onto a tangent plane at its midpoint latitude
/// (equirectangular approximation), the projection parameter is clamped to
/// the segment, and the result is mapped back to latitude/longitude. The
/// returned distance is the haversine distance from `p` to the projection.
pub fn point_to_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> SegmentProjection {
    if a == b {
        return degenerate(p, a);
    }

    let mid_lat = ((a.latitude + b.latitude) / 2.0).to_radians();
    let kx = METERS_PER_DEGREE * mid_lat.cos();
    let ky = METERS_PER_DEGREE;

    let dx = wrap_longitude(b.longitude - a.longitude) * kx;
    let dy = (b.latitude - a.latitude) * ky;
    let px = wrap_longitude(p.longitude - a.longitude) * kx;
    let py = (p.latitude - a.latitude) * ky;

    let length_squared = dx * dx + dy * dy;
    if !(length_squared > 0.0) {
        return degenerate(p, a);
    }

    let t = ((px * dx + py * dy) / length_squared).clamp(0.0, 1.0);
    let projection = interpolate(a, b, t);

    SegmentProjection {
        distance_meters: haversine_distance(p, projection),
        projection,
        t,
    }
}

#[inline]
fn degenerate(p: GeoPoint, a: GeoPoint) -> SegmentProjection {
    SegmentProjection {
        distance_meters: haversine_distance(p, a),
        projection: a,
        t: 0.0,
    }
}

/// Point at fraction `t` along `a -> b`, taking the short way around in longitude
pub fn interpolate(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    GeoPoint::new(
        a.latitude + t * (b.latitude - a.latitude),
        wrap_longitude(a.longitude + t * wrap_longitude(b.longitude - a.longitude)),
    )
}

/// Map a longitude (or longitude difference) into [-180, 180]
#[inline]
fn wrap_longitude(delta: f64) -> f64 {
    if delta > 180.0 {
        delta - 360.0
    } else if delta < -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Latitude band that contains every point within a corridor of a route
///
/// Great-circle distance is never shorter than the latitude difference, so a
/// candidate outside the band cannot be within the corridor. Longitude is
/// left unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudeBand {
    pub min_lat: f64,
    pub max_lat: f64,
}

/// Calculate the latitude band around `points` widened by `width_meters`
pub fn corridor_band(points: &[GeoPoint], width_meters: f64) -> LatitudeBand {
    let (min_lat, max_lat) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), p| (lo.min(p.latitude), hi.max(p.latitude)),
    );

    // one meter of slack absorbs rounding against the haversine result
    let delta = (width_meters * (1.0 + 1e-6) + 1.0) / METERS_PER_DEGREE;

    LatitudeBand {
        min_lat: min_lat - delta,
        max_lat: max_lat + delta,
    }
}

impl LatitudeBand {
    #[inline]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.latitude >= self.min_lat && point.latitude <= self.max_lat
    }
}

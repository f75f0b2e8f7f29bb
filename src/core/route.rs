use crate::core::distance::{haversine_distance, point_to_segment};
use crate::models::{GeoPoint, RoutePath};

/// Distances closer than this are treated as ties between segments
pub const TIE_EPSILON_METERS: f64 = 1e-6;

/// Nearest point on a route to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteProjection {
    pub distance_meters: f64,
    pub projection: GeoPoint,
    pub segment_index: usize,
    /// Distance along the route from its start to the projection
    pub progress_meters: f64,
    pub t: f64,
}

/// Route polyline with cumulative segment lengths
///
/// Built once per route and read concurrently by the corridor filter.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteIndex {
    points: Vec<GeoPoint>,
    /// `cumulative[i]` is the route length up to point `i`
    cumulative: Vec<f64>,
}

impl RouteIndex {
    pub fn build(route: &RoutePath) -> Self {
        let points = route.points().to_vec();
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(total);
        for pair in points.windows(2) {
            total += haversine_distance(pair[0], pair[1]);
            cumulative.push(total);
        }

        Self { points, cumulative }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn total_length_meters(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Length of segment `i`
    pub fn segment_length(&self, i: usize) -> f64 {
        self.cumulative[i + 1] - self.cumulative[i]
    }

    /// Find the closest point on the route to `p`
    ///
    /// Scans every segment. When two segments are equally close (within
    /// [`TIE_EPSILON_METERS`]) the earlier one wins.
    pub fn nearest_on_route(&self, p: GeoPoint) -> RouteProjection {
        let mut best: Option<RouteProjection> = None;

        for (i, pair) in self.points.windows(2).enumerate() {
            let seg = point_to_segment(p, pair[0], pair[1]);

            let closer = match best {
                None => true,
                Some(ref current) => seg.distance_meters < current.distance_meters - TIE_EPSILON_METERS,
            };

            if closer {
                best = Some(RouteProjection {
                    distance_meters: seg.distance_meters,
                    projection: seg.projection,
                    segment_index: i,
                    progress_meters: self.cumulative[i] + seg.t * self.segment_length(i),
                    t: seg.t,
                });
            }
        }

        // RoutePath guarantees at least one segment
        best.unwrap_or(RouteProjection {
            distance_meters: haversine_distance(p, self.points[0]),
            projection: self.points[0],
            segment_index: 0,
            progress_meters: 0.0,
            t: 0.0,
        })
    }
}

use crate::core::distance::{corridor_band, haversine_distance, LatitudeBand};
use crate::core::route::RouteIndex;
use crate::models::{Candidate, CandidatePool, CorridorConfig, GeoPoint};
use rayon::prelude::*;

/// A candidate that passed the corridor and destination filters
#[derive(Debug, Clone, PartialEq)]
pub struct Survivor<'a> {
    pub candidate: &'a Candidate,
    pub distance_from_route_meters: f64,
    pub pickup_point: GeoPoint,
    pub route_progress_meters: f64,
    pub segment_index: usize,
}

/// Check whether a candidate is heading to roughly the rider's destination
#[inline]
pub fn heading_same_way(candidate: &Candidate, config: &CorridorConfig) -> bool {
    haversine_distance(candidate.destination, config.rider_destination)
        <= config.destination_tolerance_meters
}

/// Check a distance against the corridor width (closed interval)
#[inline]
pub fn within_corridor(distance_meters: f64, config: &CorridorConfig) -> bool {
    distance_meters <= config.width_meters
}

/// Evaluate a single candidate against the corridor
///
/// Returns `None` when the candidate is outside the corridor or heading
/// somewhere else.
pub fn evaluate_candidate<'a>(
    candidate: &'a Candidate,
    index: &RouteIndex,
    band: &LatitudeBand,
    config: &CorridorConfig,
) -> Option<Survivor<'a>> {
    // Stage 1: latitude band pre-filter
    if !band.contains(candidate.location) {
        return None;
    }

    // Stage 2: destination compatibility
    if !heading_same_way(candidate, config) {
        return None;
    }

    // Stage 3: exact distance to the route
    let nearest = index.nearest_on_route(candidate.location);
    if !within_corridor(nearest.distance_meters, config) {
        return None;
    }

    Some(Survivor {
        candidate,
        distance_from_route_meters: nearest.distance_meters,
        pickup_point: nearest.projection,
        route_progress_meters: nearest.progress_meters,
        segment_index: nearest.segment_index,
    })
}

/// Run the corridor filter over the whole pool
///
/// Pools of at least `parallel_threshold` candidates are evaluated on the
/// rayon pool. Survivors come back in pool order either way.
pub fn filter_candidates<'a>(
    pool: &'a CandidatePool,
    index: &RouteIndex,
    config: &CorridorConfig,
    parallel_threshold: usize,
) -> Vec<Survivor<'a>> {
    let band = corridor_band(index.points(), config.width_meters);

    if pool.len() >= parallel_threshold.max(1) {
        pool.as_slice()
            .par_iter()
            .filter_map(|candidate| evaluate_candidate(candidate, index, &band, config))
            .collect()
    } else {
        pool.iter()
            .filter_map(|candidate| evaluate_candidate(candidate, index, &band, config))
            .collect()
    }
}

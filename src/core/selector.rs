use crate::core::filters::Survivor;
use crate::models::{EtaModel, MatchResult, MatchSet};
use std::cmp::Ordering;

/// Pickup ordering: route progress, then distance from the route, then id
#[inline]
pub fn pickup_ordering(a: &Survivor<'_>, b: &Survivor<'_>) -> Ordering {
    a.route_progress_meters
        .total_cmp(&b.route_progress_meters)
        .then_with(|| a.distance_from_route_meters.total_cmp(&b.distance_from_route_meters))
        .then_with(|| a.candidate.id.cmp(&b.candidate.id))
}

/// Greedily select and sequence survivors
///
/// A single sweep along the route: survivors are sorted by
/// [`pickup_ordering`], the first `capacity` are kept and numbered from 1.
/// Not globally optimal, but deterministic. Capacity 0 or no survivors
/// gives an empty set.
pub fn select_pickups(
    mut survivors: Vec<Survivor<'_>>,
    capacity: usize,
    total_length_meters: f64,
    eta: &EtaModel,
) -> MatchSet {
    survivors.sort_by(pickup_ordering);
    survivors.truncate(capacity);

    let matches = survivors
        .into_iter()
        .enumerate()
        .map(|(i, s)| MatchResult {
            candidate_id: s.candidate.id.clone(),
            pickup_order: i + 1,
            pickup_point: s.pickup_point,
            distance_from_route_meters: s.distance_from_route_meters,
            route_progress_meters: s.route_progress_meters,
            estimated_pickup_minutes: eta.minutes_at(s.route_progress_meters, total_length_meters),
            segment_index: s.segment_index,
        })
        .collect();

    MatchSet { matches }
}

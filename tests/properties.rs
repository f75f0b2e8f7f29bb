// Property tests for the corridor geometry and pickup selection

use corridor_match::core::{
    distance::{haversine_distance, point_to_segment},
    filters::filter_candidates,
    route::RouteIndex,
    selector::select_pickups,
};
use corridor_match::models::{
    Candidate, CandidatePool, CorridorConfig, EtaModel, GeoPoint, RoutePath,
};
use proptest::prelude::*;

const COLLEGE: GeoPoint = GeoPoint::new(18.5100, 73.8300);

fn point() -> impl Strategy<Value = GeoPoint> {
    (18.40f64..18.60, 73.70f64..73.95).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
}

fn route() -> impl Strategy<Value = Vec<GeoPoint>> {
    prop::collection::vec(point(), 2..8)
}

fn pool() -> impl Strategy<Value = CandidatePool> {
    prop::collection::vec(point(), 0..40).prop_map(|locations| {
        let candidates = locations
            .into_iter()
            .enumerate()
            .map(|(i, location)| Candidate {
                id: format!("c{:02}", i),
                display_name: String::new(),
                location,
                destination: COLLEGE,
                contact: None,
            })
            .collect();
        CandidatePool::new(candidates).unwrap()
    })
}

fn config(width_meters: f64, capacity: usize) -> CorridorConfig {
    CorridorConfig {
        width_meters,
        rider_destination: COLLEGE,
        destination_tolerance_meters: 2000.0,
        capacity,
        eta: EtaModel::default(),
    }
}

proptest! {
    #[test]
    fn prop_projection_stays_on_segment(p in point(), a in point(), b in point()) {
        let seg = point_to_segment(p, a, b);

        prop_assert!((0.0..=1.0).contains(&seg.t));
        prop_assert_eq!(seg.distance_meters, haversine_distance(p, seg.projection));

        let (lo, hi) = (a.latitude.min(b.latitude), a.latitude.max(b.latitude));
        prop_assert!(seg.projection.latitude >= lo - 1e-12 && seg.projection.latitude <= hi + 1e-12);
    }

    #[test]
    fn prop_corridor_membership_matches_nearest_distance(
        points in route(),
        pool in pool(),
        width in 50.0f64..5000.0,
    ) {
        let route = RoutePath::new(points);
        prop_assume!(route.is_ok());
        let index = RouteIndex::build(&route.unwrap());
        let config = config(width, 3);

        let survivors = filter_candidates(&pool, &index, &config, usize::MAX);
        let expected: Vec<&str> = pool
            .iter()
            .filter(|c| index.nearest_on_route(c.location).distance_meters <= width)
            .map(|c| c.id.as_str())
            .collect();
        let actual: Vec<&str> = survivors.iter().map(|s| s.candidate.id.as_str()).collect();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_parallel_filter_matches_sequential(
        points in route(),
        pool in pool(),
        width in 50.0f64..5000.0,
    ) {
        let route = RoutePath::new(points);
        prop_assume!(route.is_ok());
        let index = RouteIndex::build(&route.unwrap());
        let config = config(width, 3);

        let sequential = filter_candidates(&pool, &index, &config, usize::MAX);
        let parallel = filter_candidates(&pool, &index, &config, 1);

        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn prop_pickups_are_sequenced_along_route(
        points in route(),
        pool in pool(),
        width in 50.0f64..5000.0,
        capacity in 0usize..10,
    ) {
        let route = RoutePath::new(points);
        prop_assume!(route.is_ok());
        let index = RouteIndex::build(&route.unwrap());
        let config = config(width, capacity);

        let survivors = filter_candidates(&pool, &index, &config, 64);
        let total = survivors.len();
        let set = select_pickups(survivors, capacity, index.total_length_meters(), &config.eta);

        prop_assert_eq!(set.len(), total.min(capacity));
        for (i, m) in set.iter().enumerate() {
            prop_assert_eq!(m.pickup_order, i + 1);
            prop_assert!(m.distance_from_route_meters <= width);
            prop_assert!(m.route_progress_meters >= 0.0);
            prop_assert!(m.route_progress_meters <= index.total_length_meters() + 1e-6);
        }
        for pair in set.matches.windows(2) {
            prop_assert!(pair[0].route_progress_meters <= pair[1].route_progress_meters);
        }
    }
}

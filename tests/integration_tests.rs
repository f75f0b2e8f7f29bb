// Integration tests for Corridor Match

use corridor_match::core::MatchingService;
use corridor_match::error::MatchError;
use corridor_match::models::{CandidateRequest, GeoPoint, MatchRequest, MatchingOptions};
use corridor_match::services::RouteCache;

const EQUATOR_END: GeoPoint = GeoPoint::new(0.0, 2.0);

fn create_candidate(id: &str, lat: f64, lon: f64) -> CandidateRequest {
    CandidateRequest {
        id: id.to_string(),
        name: format!("Rider {}", id),
        latitude: lat,
        longitude: lon,
        destination_latitude: EQUATOR_END.latitude,
        destination_longitude: EQUATOR_END.longitude,
        phone: None,
    }
}

fn create_request(width: f64, capacity: i64, candidates: Vec<CandidateRequest>) -> MatchRequest {
    MatchRequest {
        route_points: vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            EQUATOR_END,
        ],
        rider_destination: EQUATOR_END,
        corridor_width_meters: Some(width),
        destination_tolerance_meters: Some(2000.0),
        capacity: Some(capacity),
        trip_duration_minutes: None,
        candidates,
    }
}

#[test]
fn test_integration_end_to_end_matching() {
    let service = MatchingService::with_defaults();
    let request = create_request(
        50_000.0,
        2,
        vec![
            create_candidate("late", 0.0005, 1.5),
            create_candidate("early", 0.0005, 0.5),
        ],
    );

    let response = service.compute_matches(&request).unwrap();

    assert!(response.success);
    assert_eq!(response.route_points, 3);
    assert_eq!(response.total_matches, 2);
    assert_eq!(response.selected_matches, 2);

    let first = &response.matches[0];
    let second = &response.matches[1];
    assert_eq!(first.hostelite_id, "early");
    assert_eq!(first.pickup_order, 1);
    assert_eq!(second.hostelite_id, "late");
    assert_eq!(second.pickup_order, 2);

    // ~0.0005 degrees of latitude off the equator
    assert!((first.distance_from_route_meters - 55.6).abs() < 0.5);
    assert!(first.route_progress_meters < second.route_progress_meters);
    // half a degree of longitude along the equator
    assert!((first.route_progress_meters - 55_597.5).abs() < 100.0);
}

#[test]
fn test_integration_far_candidate_excluded() {
    let service = MatchingService::with_defaults();
    // ~10 km north of the route
    let request = create_request(500.0, 3, vec![create_candidate("far", 0.09, 1.0)]);

    let response = service.compute_matches(&request).unwrap();

    assert_eq!(response.total_matches, 0);
    assert!(response.matches.is_empty());
}

#[test]
fn test_integration_capacity_keeps_earliest_pickup() {
    let service = MatchingService::with_defaults();
    let request = create_request(
        5_000.0,
        1,
        vec![
            create_candidate("c", 0.001, 1.8),
            create_candidate("a", 0.001, 0.2),
            create_candidate("b", 0.001, 1.0),
        ],
    );

    let response = service.compute_matches(&request).unwrap();

    assert_eq!(response.total_matches, 3);
    assert_eq!(response.selected_matches, 1);
    assert_eq!(response.matches[0].hostelite_id, "a");
    assert_eq!(response.matches[0].pickup_order, 1);
}

#[test]
fn test_integration_zero_capacity() {
    let service = MatchingService::with_defaults();
    let request = create_request(5_000.0, 0, vec![create_candidate("a", 0.001, 0.2)]);

    let response = service.compute_matches(&request).unwrap();

    assert_eq!(response.total_matches, 1);
    assert!(response.matches.is_empty());
}

#[test]
fn test_integration_deterministic_output() {
    let service = MatchingService::new(MatchingOptions::default(), RouteCache::new(8));
    let candidates: Vec<CandidateRequest> = (0..200)
        .map(|i| {
            let lat = ((i * 37) % 100) as f64 * 0.0002 - 0.01;
            let lon = ((i * 53) % 200) as f64 * 0.01;
            create_candidate(&format!("c{:03}", i), lat, lon)
        })
        .collect();
    let request = create_request(800.0, 10, candidates);

    let first = serde_json::to_string(&service.compute_matches(&request).unwrap()).unwrap();
    let second = serde_json::to_string(&service.compute_matches(&request).unwrap()).unwrap();
    let uncached = serde_json::to_string(
        &MatchingService::with_defaults().compute_matches(&request).unwrap(),
    )
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(first, uncached);
    assert_eq!(service.cache_stats().hits, 1);
}

#[test]
fn test_integration_pool_order_does_not_change_ranking() {
    let service = MatchingService::with_defaults();
    // every fourth candidate shares a location with the previous one
    let candidates: Vec<CandidateRequest> = (0..200)
        .map(|i| {
            let slot = i - (i % 4 == 3) as usize;
            let lat = ((slot * 37) % 100) as f64 * 0.0002 - 0.01;
            let lon = ((slot * 53) % 200) as f64 * 0.01;
            create_candidate(&format!("c{:03}", 199 - i), lat, lon)
        })
        .collect();

    let forward = create_request(800.0, 200, candidates.clone());

    let mut reversed_candidates = candidates.clone();
    reversed_candidates.reverse();
    let reversed = create_request(800.0, 200, reversed_candidates);

    let mut rotated_candidates = candidates;
    rotated_candidates.rotate_left(67);
    let rotated = create_request(800.0, 200, rotated_candidates);

    let expected = service.compute_matches(&forward).unwrap();
    assert!(expected.matches.len() > 1);

    let expected_json = serde_json::to_string(&expected).unwrap();
    for request in [&reversed, &rotated] {
        let json = serde_json::to_string(&service.compute_matches(request).unwrap()).unwrap();
        assert_eq!(json, expected_json);
    }

    // shared locations are broken by id
    for pair in expected.matches.windows(2) {
        if pair[0].hostelite_location == pair[1].hostelite_location {
            assert!(pair[0].hostelite_id < pair[1].hostelite_id);
        }
    }
}

#[test]
fn test_integration_same_location_ordered_by_id() {
    let service = MatchingService::with_defaults();
    let request = create_request(
        5_000.0,
        3,
        vec![
            create_candidate("b", 0.001, 0.7),
            create_candidate("a", 0.001, 0.7),
        ],
    );

    let response = service.compute_matches(&request).unwrap();
    let ids: Vec<&str> = response.matches.iter().map(|m| m.hostelite_id.as_str()).collect();

    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_integration_candidate_on_route_vertex() {
    let service = MatchingService::with_defaults();
    let request = create_request(100.0, 3, vec![create_candidate("v", 0.0, 1.0)]);

    let response = service.compute_matches(&request).unwrap();
    let m = &response.matches[0];

    assert_eq!(m.distance_from_route_meters, 0.0);
    assert_eq!(m.pickup_point.lng, 1.0);
}

#[test]
fn test_integration_wrong_destination_excluded() {
    let service = MatchingService::with_defaults();
    let mut elsewhere = create_candidate("x", 0.0, 0.5);
    elsewhere.destination_latitude = 1.0;

    let request = create_request(5_000.0, 3, vec![elsewhere, create_candidate("y", 0.0, 0.6)]);
    let response = service.compute_matches(&request).unwrap();

    assert_eq!(response.total_matches, 1);
    assert_eq!(response.matches[0].hostelite_id, "y");
}

#[test]
fn test_integration_rejects_bad_input() {
    let service = MatchingService::with_defaults();

    let mut short_route = create_request(500.0, 3, vec![]);
    short_route.route_points.truncate(1);
    assert!(matches!(
        service.compute_matches(&short_route),
        Err(MatchError::InvalidGeometry(_))
    ));

    let bad_width = create_request(0.0, 3, vec![]);
    assert!(matches!(
        service.compute_matches(&bad_width),
        Err(MatchError::InvalidConfig(_))
    ));

    let negative_capacity = create_request(500.0, -1, vec![]);
    assert!(matches!(
        service.compute_matches(&negative_capacity),
        Err(MatchError::InvalidConfig(_))
    ));

    let duplicate = create_request(
        500.0,
        3,
        vec![create_candidate("a", 0.0, 0.5), create_candidate("a", 0.0, 0.6)],
    );
    assert!(matches!(
        service.compute_matches(&duplicate),
        Err(MatchError::InvalidCandidate(_))
    ));

    let off_planet = create_request(500.0, 3, vec![create_candidate("z", 91.0, 0.5)]);
    assert!(matches!(
        service.compute_matches(&off_planet),
        Err(MatchError::InvalidGeometry(_))
    ));
}

#[test]
fn test_integration_resource_limits() {
    let mut options = MatchingOptions::default();
    options.limits.max_candidates = 2;
    let service = MatchingService::new(options, RouteCache::disabled());

    let request = create_request(
        500.0,
        3,
        (0..3).map(|i| create_candidate(&i.to_string(), 0.0, 0.5)).collect(),
    );

    assert!(matches!(
        service.compute_matches(&request),
        Err(MatchError::ResourceExhausted(_))
    ));
}

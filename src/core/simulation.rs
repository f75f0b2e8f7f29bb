//! Canned demo scenario: a morning ride through Pune to the college.
//!
//! Used by the simulation endpoint so the map UI can be exercised without a
//! routing provider or candidate directory.

use crate::core::MatchingService;
use crate::error::Result;
use crate::models::{CandidateRequest, GeoPoint, LatLng, MatchRequest, SimulationResponse};
use std::sync::Arc;

/// College gate, where every demo rider is heading
pub const COLLEGE: GeoPoint = GeoPoint::new(18.5100, 73.8300);

/// Name reported alongside demo results
pub const ALGORITHM_NAME: &str = "Geometric Corridor Matching with Greedy Selection";

/// Corridor width used by the demo
pub const DEMO_CORRIDOR_WIDTH_METERS: f64 = 1000.0;

/// Seats available in the demo vehicle
pub const DEMO_CAPACITY: i64 = 3;

/// Route from north Pune down to the college
pub fn demo_route() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(18.5600, 73.8567),
        GeoPoint::new(18.5500, 73.8500),
        GeoPoint::new(18.5400, 73.8450),
        GeoPoint::new(18.5350, 73.8420),
        GeoPoint::new(18.5300, 73.8400),
        GeoPoint::new(18.5250, 73.8380),
        GeoPoint::new(18.5200, 73.8350),
        GeoPoint::new(18.5150, 73.8320),
        COLLEGE,
    ]
}

/// Three hostelites at different points along the route
pub fn demo_hostelites() -> Vec<CandidateRequest> {
    let hostelite = |id: &str, name: &str, lat: f64, lng: f64, phone: &str| CandidateRequest {
        id: id.to_string(),
        name: name.to_string(),
        latitude: lat,
        longitude: lng,
        destination_latitude: COLLEGE.latitude,
        destination_longitude: COLLEGE.longitude,
        phone: Some(phone.to_string()),
    };

    vec![
        hostelite("h001", "Rahul Sharma", 18.5480, 73.8445, "+91-9876543210"),
        hostelite("h002", "Priya Patel", 18.5280, 73.8450, "+91-9876543211"),
        hostelite("h003", "Arjun Kumar", 18.5180, 73.8280, "+91-9876543212"),
    ]
}

/// The full demo request
pub fn demo_request() -> MatchRequest {
    MatchRequest {
        route_points: demo_route(),
        rider_destination: COLLEGE,
        corridor_width_meters: Some(DEMO_CORRIDOR_WIDTH_METERS),
        destination_tolerance_meters: Some(2000.0),
        capacity: Some(DEMO_CAPACITY),
        trip_duration_minutes: None,
        candidates: demo_hostelites(),
    }
}

/// Run the demo through the service, under the same deadline as live requests
pub async fn run_demo(service: Arc<MatchingService>) -> Result<SimulationResponse> {
    let request = demo_request();
    let route = request.route_points.iter().copied().map(LatLng::from).collect();
    let result = service.compute_matches_with_deadline(request).await?;

    Ok(SimulationResponse {
        result,
        route,
        algorithm_name: ALGORITHM_NAME.to_string(),
        corridor_width_meters: DEMO_CORRIDOR_WIDTH_METERS,
    })
}

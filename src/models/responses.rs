use serde::{Deserialize, Serialize};
use crate::models::domain::GeoPoint;
use crate::services::CacheStats;

/// Compact coordinate used by the map UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for LatLng {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.latitude,
            lng: point.longitude,
        }
    }
}

/// One selected pickup as rendered by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupMatch {
    pub pickup_order: usize,
    pub hostelite_id: String,
    pub hostelite_name: String,
    pub hostelite_location: LatLng,
    pub pickup_point: LatLng,
    pub distance_from_route_meters: f64,
    pub route_progress_meters: f64,
    pub estimated_pickup_time_minutes: f64,
    pub phone: Option<String>,
}

/// Response for the corridor matching endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub success: bool,
    pub route_points: usize,
    /// Survivors before the capacity cut
    pub total_matches: usize,
    pub selected_matches: usize,
    pub matches: Vec<PickupMatch>,
}

/// Response for the demo scenario: the standard match response plus the
/// route the map draws underneath it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    #[serde(flatten)]
    pub result: MatchResponse,
    pub route: Vec<LatLng>,
    pub algorithm_name: String,
    pub corridor_width_meters: f64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub route_cache: CacheStats,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

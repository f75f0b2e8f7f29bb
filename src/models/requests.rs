use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Candidate, GeoPoint};

/// Request to compute corridor matches
///
/// Optional numeric fields fall back to the configured defaults. Capacity is
/// signed so a negative value is reported as a config error rather than a
/// JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(alias = "routePoints")]
    pub route_points: Vec<GeoPoint>,
    #[serde(alias = "riderDestination")]
    pub rider_destination: GeoPoint,
    #[serde(default, alias = "corridorWidthMeters")]
    pub corridor_width_meters: Option<f64>,
    #[serde(default, alias = "destinationToleranceMeters")]
    pub destination_tolerance_meters: Option<f64>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default, alias = "tripDurationMinutes")]
    pub trip_duration_minutes: Option<f64>,
    #[serde(default)]
    pub candidates: Vec<CandidateRequest>,
}

/// A candidate as supplied by the candidate directory
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CandidateRequest {
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    #[validate(length(max = 256))]
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(alias = "destinationLatitude")]
    pub destination_latitude: f64,
    #[serde(alias = "destinationLongitude")]
    pub destination_longitude: f64,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<CandidateRequest> for Candidate {
    fn from(req: CandidateRequest) -> Self {
        Candidate {
            id: req.id,
            display_name: req.name,
            location: GeoPoint::new(req.latitude, req.longitude),
            destination: GeoPoint::new(req.destination_latitude, req.destination_longitude),
            contact: req.phone,
        }
    }
}

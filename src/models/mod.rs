// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, CandidatePool, CorridorConfig, EtaModel, GeoPoint, MatchOutcome, MatchResult,
    MatchSet, MatchingOptions, ResourceLimits, RoutePath,
};
pub use requests::{CandidateRequest, MatchRequest};
pub use responses::{ErrorResponse, HealthResponse, LatLng, MatchResponse, PickupMatch, SimulationResponse};

//! Corridor Match - geometric corridor matching for shared college rides
//!
//! Given a rider's route and a pool of people waiting to be picked up, the
//! engine selects those within a fixed distance of the route and sequences
//! them so one vehicle can collect them in a single sweep.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{MatchingService, RouteIndex, distance::{haversine_distance, point_to_segment}};
pub use crate::error::MatchError;
pub use crate::models::{GeoPoint, Candidate, CandidatePool, CorridorConfig, MatchRequest, MatchResponse, RoutePath};

// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod route;
pub mod selector;
pub mod simulation;

pub use distance::{haversine_distance, point_to_segment, SegmentProjection};
pub use filters::{filter_candidates, Survivor};
pub use matcher::{build_response, MatchingService};
pub use route::{RouteIndex, RouteProjection};
pub use selector::select_pickups;

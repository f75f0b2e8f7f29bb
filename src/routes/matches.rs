use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use crate::core::{simulation, MatchingService};
use crate::error::MatchError;
use crate::models::{ErrorResponse, HealthResponse, MatchRequest};
use std::sync::Arc;
use tracing::Instrument;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchingService>,
}

/// Configure all corridor-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/corridor/matches", web::post().to(find_matches))
        .route("/corridor/simulate", web::get().to(simulate));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        route_cache: state.service.cache_stats(),
    })
}

/// Find corridor matches endpoint
///
/// POST /api/v1/corridor/matches
///
/// Request body:
/// ```json
/// {
///   "route_points": [{"latitude": 18.56, "longitude": 73.8567}, ...],
///   "rider_destination": {"latitude": 18.51, "longitude": 73.83},
///   "corridor_width_meters": 1000,
///   "destination_tolerance_meters": 2000,
///   "capacity": 3,
///   "candidates": [{"id": "h001", "name": "...", "latitude": 18.548, "longitude": 73.8445,
///                   "destination_latitude": 18.51, "destination_longitude": 73.83,
///                   "phone": "..."}]
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("corridor_matches", %request_id);
    let request = req.into_inner();

    tracing::info!(
        parent: &span,
        "Matching request: {} route points, {} candidates",
        request.route_points.len(),
        request.candidates.len()
    );

    let result = Arc::clone(&state.service)
        .compute_matches_with_deadline(request)
        .instrument(span.clone())
        .await;

    match result {
        Ok(response) => {
            tracing::info!(
                parent: &span,
                "Returning {} pickups (from {} corridor matches)",
                response.selected_matches,
                response.total_matches
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            tracing::warn!(parent: &span, "Matching request rejected: {}", e);
            error_response(&e)
        }
    }
}

/// Simulation endpoint
///
/// GET /api/v1/corridor/simulate
///
/// Runs the built-in demo scenario through the matching service and returns
/// the matches together with the route polyline.
async fn simulate(state: web::Data<AppState>) -> impl Responder {
    match simulation::run_demo(Arc::clone(&state.service)).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::error!("Demo scenario failed: {}", e);
            error_response(&e)
        }
    }
}

/// Render an engine error as a JSON error body
pub fn error_response(err: &MatchError) -> HttpResponse {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    HttpResponse::build(status).json(ErrorResponse {
        success: false,
        error: err.code().to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let response = error_response(&MatchError::ResourceExhausted("too big".into()));
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = error_response(&MatchError::InvalidGeometry("nan".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

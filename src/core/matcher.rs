use crate::core::{filters::filter_candidates, selector::select_pickups};
use crate::error::{MatchError, Result};
use crate::models::{
    Candidate, CandidatePool, CorridorConfig, EtaModel, MatchOutcome, MatchRequest, MatchResponse,
    MatchingOptions, PickupMatch, RoutePath,
};
use crate::services::{CacheStats, RouteCache};
use std::sync::Arc;
use tracing::{debug, info, warn, Span};
use validator::Validate;

/// Corridor matching orchestrator
///
/// # Pipeline Stages
/// 1. Resolve and validate the corridor config
/// 2. Check input sizes against the resource limits
/// 3. Validate route and candidate geometry
/// 4. Corridor filter (nearest point on route, destination check)
/// 5. Greedy selection and pickup sequencing
///
/// Holds no per-request state; the only thing shared between calls is the
/// explicit route cache.
#[derive(Debug)]
pub struct MatchingService {
    options: MatchingOptions,
    cache: RouteCache,
}

impl MatchingService {
    pub fn new(options: MatchingOptions, cache: RouteCache) -> Self {
        Self { options, cache }
    }

    pub fn with_defaults() -> Self {
        Self::new(MatchingOptions::default(), RouteCache::disabled())
    }

    pub fn options(&self) -> &MatchingOptions {
        &self.options
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Build the corridor config for a request, filling in defaults
    pub fn resolve_config(&self, request: &MatchRequest) -> Result<CorridorConfig> {
        let capacity = match request.capacity {
            None => self.options.default_capacity,
            Some(c) if c < 0 => {
                return Err(MatchError::InvalidConfig(format!(
                    "capacity must be non-negative, got {}",
                    c
                )))
            }
            Some(c) => usize::try_from(c).unwrap_or(usize::MAX),
        };

        let eta = match request.trip_duration_minutes {
            Some(total_minutes) => EtaModel::TripDuration { total_minutes },
            None => self.options.default_eta,
        };

        let config = CorridorConfig {
            width_meters: request
                .corridor_width_meters
                .unwrap_or(self.options.default_corridor_width_meters),
            rider_destination: request.rider_destination,
            destination_tolerance_meters: request
                .destination_tolerance_meters
                .unwrap_or(self.options.default_destination_tolerance_meters),
            capacity,
            eta,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject requests whose size exceeds the configured bounds
    pub fn check_limits(&self, route_points: usize, candidates: usize) -> Result<()> {
        let limits = &self.options.limits;

        if route_points > limits.max_route_points {
            return Err(MatchError::ResourceExhausted(format!(
                "route has {} points, limit is {}",
                route_points, limits.max_route_points
            )));
        }
        if candidates > limits.max_candidates {
            return Err(MatchError::ResourceExhausted(format!(
                "{} candidates supplied, limit is {}",
                candidates, limits.max_candidates
            )));
        }

        let work = (candidates as u64).saturating_mul(route_points.saturating_sub(1) as u64);
        if work > limits.max_work_units {
            return Err(MatchError::ResourceExhausted(format!(
                "{} candidate-segment evaluations requested, limit is {}",
                work, limits.max_work_units
            )));
        }
        Ok(())
    }

    /// Compute corridor matches for a request
    ///
    /// Pure with respect to the request: identical requests give identical
    /// responses.
    pub fn compute_matches(&self, request: &MatchRequest) -> Result<MatchResponse> {
        let config = self.resolve_config(request)?;
        self.check_limits(request.route_points.len(), request.candidates.len())?;

        let route = RoutePath::new(request.route_points.clone())?;

        let mut candidates = Vec::with_capacity(request.candidates.len());
        for dto in &request.candidates {
            dto.validate().map_err(|errors| {
                MatchError::InvalidCandidate(format!("candidate {:?}: {}", dto.id, errors))
            })?;
            candidates.push(Candidate::from(dto.clone()));
        }
        let pool = CandidatePool::new(candidates)?;

        let outcome = self.run(&route, &pool, &config)?;
        Ok(build_response(&outcome, &pool))
    }

    /// Run the filter and selection pipeline on validated inputs
    pub fn run(
        &self,
        route: &RoutePath,
        pool: &CandidatePool,
        config: &CorridorConfig,
    ) -> Result<MatchOutcome> {
        config.validate()?;
        config.rider_destination.validate()?;

        info!(
            "Computing corridor matches: {} route points, {} candidates, width {}m, capacity {}",
            route.input_len(),
            pool.len(),
            config.width_meters,
            config.capacity
        );

        let index = self.cache.get_or_build(route);

        // Stage 4: corridor filter
        let survivors = filter_candidates(pool, &index, config, self.options.parallel_threshold);
        let total_survivors = survivors.len();
        debug!(
            "{} of {} candidates inside the {}m corridor",
            total_survivors,
            pool.len(),
            config.width_meters
        );

        // Stage 5: greedy selection
        let matches = select_pickups(
            survivors,
            config.capacity,
            index.total_length_meters(),
            &config.eta,
        );
        let selected = matches.len();

        info!(
            "Selected {} pickups from {} survivors (route length {:.0}m)",
            selected,
            total_survivors,
            index.total_length_meters()
        );

        Ok(MatchOutcome {
            matches,
            route_points: route.input_len(),
            total_survivors,
            selected,
        })
    }

    /// Compute matches on the blocking pool, giving up after the configured timeout
    ///
    /// An expired deadline is reported as `ResourceExhausted` so callers can
    /// retry with a smaller batch. The abandoned computation runs to
    /// completion in the background.
    pub async fn compute_matches_with_deadline(
        self: Arc<Self>,
        request: MatchRequest,
    ) -> Result<MatchResponse> {
        let timeout = self.options.request_timeout;
        let service = Arc::clone(&self);
        let span = Span::current();
        let task = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            service.compute_matches(&request)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(MatchError::Internal(format!(
                "matching task failed: {}",
                join_error
            ))),
            Err(_) => {
                warn!("Corridor matching exceeded deadline of {}ms", timeout.as_millis());
                Err(MatchError::ResourceExhausted(format!(
                    "matching exceeded deadline of {}ms",
                    timeout.as_millis()
                )))
            }
        }
    }
}

impl Default for MatchingService {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Map a pipeline outcome onto the client response contract
pub fn build_response(outcome: &MatchOutcome, pool: &CandidatePool) -> MatchResponse {
    let matches = outcome
        .matches
        .iter()
        .filter_map(|m| {
            let candidate = pool.get(&m.candidate_id)?;
            Some(PickupMatch {
                pickup_order: m.pickup_order,
                hostelite_id: candidate.id.clone(),
                hostelite_name: candidate.display_name.clone(),
                hostelite_location: candidate.location.into(),
                pickup_point: m.pickup_point.into(),
                distance_from_route_meters: round_tenth(m.distance_from_route_meters),
                route_progress_meters: round_tenth(m.route_progress_meters),
                estimated_pickup_time_minutes: round_tenth(m.estimated_pickup_minutes),
                phone: candidate.contact.clone(),
            })
        })
        .collect();

    MatchResponse {
        success: true,
        route_points: outcome.route_points,
        total_matches: outcome.total_survivors,
        selected_matches: outcome.selected,
        matches,
    }
}

#[inline]
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

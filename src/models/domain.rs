use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A WGS84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check that the coordinates are finite and within range
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(MatchError::InvalidGeometry(format!(
                "non-finite coordinate ({}, {})",
                self.latitude, self.longitude
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(MatchError::InvalidGeometry(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(MatchError::InvalidGeometry(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

fn geometry_context(err: MatchError, context: std::fmt::Arguments<'_>) -> MatchError {
    match err {
        MatchError::InvalidGeometry(msg) => MatchError::InvalidGeometry(format!("{}: {}", context, msg)),
        other => other,
    }
}

/// The rider's journey as an ordered polyline
///
/// Consecutive duplicate points are collapsed on construction so every
/// segment has non-zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    points: Vec<GeoPoint>,
    input_len: usize,
}

impl RoutePath {
    pub fn new(points: Vec<GeoPoint>) -> Result<Self> {
        let input_len = points.len();
        if input_len < 2 {
            return Err(MatchError::InvalidGeometry(format!(
                "route needs at least 2 points, got {}",
                input_len
            )));
        }

        let mut collapsed: Vec<GeoPoint> = Vec::with_capacity(input_len);
        for (i, point) in points.into_iter().enumerate() {
            point
                .validate()
                .map_err(|e| geometry_context(e, format_args!("route point {}", i)))?;
            if collapsed.last() != Some(&point) {
                collapsed.push(point);
            }
        }

        if collapsed.len() < 2 {
            return Err(MatchError::InvalidGeometry(
                "route collapses to a single point".to_string(),
            ));
        }

        Ok(Self {
            points: collapsed,
            input_len,
        })
    }

    /// Distinct route points, in travel order
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Number of points the route was built from, before collapsing
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn destination(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }
}

/// Someone waiting to be picked up along the route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub display_name: String,
    pub location: GeoPoint,
    pub destination: GeoPoint,
    #[serde(default)]
    pub contact: Option<String>,
}

/// Candidates to evaluate for one request
///
/// Iteration follows insertion order; ids are unique.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
    by_id: HashMap<String, usize>,
}

impl CandidatePool {
    pub fn new(candidates: Vec<Candidate>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(candidates.len());

        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.id.trim().is_empty() {
                return Err(MatchError::InvalidCandidate(format!(
                    "candidate at index {} has an empty id",
                    i
                )));
            }
            candidate.location.validate().map_err(|e| {
                geometry_context(e, format_args!("candidate {} location", candidate.id))
            })?;
            candidate.destination.validate().map_err(|e| {
                geometry_context(e, format_args!("candidate {} destination", candidate.id))
            })?;
            if by_id.insert(candidate.id.clone(), i).is_some() {
                return Err(MatchError::InvalidCandidate(format!(
                    "duplicate candidate id {}",
                    candidate.id
                )));
            }
        }

        Ok(Self { candidates, by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Candidate> {
        self.by_id.get(id).map(|&i| &self.candidates[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// How pickup times are estimated from route progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "model")]
pub enum EtaModel {
    /// Pickup time proportional to the share of the trip already driven
    TripDuration { total_minutes: f64 },
    /// Constant average speed applied to route progress
    AverageSpeed { speed_kmh: f64 },
}

impl EtaModel {
    pub fn validate(&self) -> Result<()> {
        match *self {
            EtaModel::TripDuration { total_minutes } => {
                if !total_minutes.is_finite() || total_minutes < 0.0 {
                    return Err(MatchError::InvalidConfig(format!(
                        "trip duration must be a non-negative number of minutes, got {}",
                        total_minutes
                    )));
                }
            }
            EtaModel::AverageSpeed { speed_kmh } => {
                if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
                    return Err(MatchError::InvalidConfig(format!(
                        "average speed must be positive, got {} km/h",
                        speed_kmh
                    )));
                }
            }
        }
        Ok(())
    }

    /// Minutes from trip start until the vehicle reaches `progress_meters`
    #[inline]
    pub fn minutes_at(&self, progress_meters: f64, total_length_meters: f64) -> f64 {
        match *self {
            EtaModel::TripDuration { total_minutes } => {
                if total_length_meters <= 0.0 {
                    return 0.0;
                }
                (progress_meters / total_length_meters).clamp(0.0, 1.0) * total_minutes
            }
            EtaModel::AverageSpeed { speed_kmh } => {
                let meters_per_minute = speed_kmh * 1000.0 / 60.0;
                progress_meters / meters_per_minute
            }
        }
    }
}

impl Default for EtaModel {
    fn default() -> Self {
        EtaModel::AverageSpeed { speed_kmh: 30.0 }
    }
}

/// Corridor parameters for a single request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorridorConfig {
    pub width_meters: f64,
    pub rider_destination: GeoPoint,
    pub destination_tolerance_meters: f64,
    pub capacity: usize,
    pub eta: EtaModel,
}

impl CorridorConfig {
    /// Check the numeric parameters; geometry is checked separately
    pub fn validate(&self) -> Result<()> {
        if !self.width_meters.is_finite() || self.width_meters <= 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "corridor width must be positive, got {}",
                self.width_meters
            )));
        }
        if !self.destination_tolerance_meters.is_finite() || self.destination_tolerance_meters < 0.0 {
            return Err(MatchError::InvalidConfig(format!(
                "destination tolerance must be non-negative, got {}",
                self.destination_tolerance_meters
            )));
        }
        self.eta.validate()
    }
}

/// A selected candidate with its pickup details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub pickup_order: usize,
    pub pickup_point: GeoPoint,
    pub distance_from_route_meters: f64,
    pub route_progress_meters: f64,
    pub estimated_pickup_minutes: f64,
    pub segment_index: usize,
}

/// Selected matches ordered by pickup order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSet {
    pub matches: Vec<MatchResult>,
}

impl MatchSet {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchResult> {
        self.matches.iter()
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub matches: MatchSet,
    pub route_points: usize,
    pub total_survivors: usize,
    pub selected: usize,
}

/// Input size bounds; exceeding any of them fails with `ResourceExhausted`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceLimits {
    pub max_route_points: usize,
    pub max_candidates: usize,
    /// Upper bound on candidates x route segments
    pub max_work_units: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_route_points: 10_000,
            max_candidates: 10_000,
            max_work_units: 5_000_000,
        }
    }
}

/// Engine defaults and limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingOptions {
    pub default_corridor_width_meters: f64,
    pub default_destination_tolerance_meters: f64,
    pub default_capacity: usize,
    pub default_eta: EtaModel,
    pub limits: ResourceLimits,
    /// Pools at least this large are filtered in parallel
    pub parallel_threshold: usize,
    pub request_timeout: Duration,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            default_corridor_width_meters: 1000.0,
            default_destination_tolerance_meters: 2000.0,
            default_capacity: 3,
            default_eta: EtaModel::default(),
            limits: ResourceLimits::default(),
            parallel_threshold: 64,
            request_timeout: Duration::from_millis(2000),
        }
    }
}

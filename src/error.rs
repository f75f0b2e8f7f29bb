use thiserror::Error;

/// Errors that can occur while computing corridor matches
///
/// Anything not listed here (empty pool, no survivors, capacity larger than
/// the survivor count) is a successful response with fewer matches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MatchError {
    /// Stable machine-readable error code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::InvalidGeometry(_) => "invalid_geometry",
            MatchError::InvalidConfig(_) => "invalid_config",
            MatchError::InvalidCandidate(_) => "invalid_candidate",
            MatchError::ResourceExhausted(_) => "resource_exhausted",
            MatchError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status the boundary adapter reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            MatchError::InvalidGeometry(_)
            | MatchError::InvalidConfig(_)
            | MatchError::InvalidCandidate(_) => 400,
            MatchError::ResourceExhausted(_) => 413,
            MatchError::Internal(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(MatchError::InvalidGeometry("x".into()).code(), "invalid_geometry");
        assert_eq!(MatchError::ResourceExhausted("x".into()).status_code(), 413);
        assert_eq!(MatchError::InvalidConfig("x".into()).status_code(), 400);
    }

    #[test]
    fn test_error_display() {
        let err = MatchError::InvalidConfig("corridor width must be positive".into());
        assert_eq!(err.to_string(), "Invalid config: corridor width must be positive");
    }
}

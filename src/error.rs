//! Error types for Voronoi diagram generation

use thiserror::Error;

/// Errors that can occur while validating input or querying a diagram
///
/// The sweep itself never fails: degenerate geometry met mid-sweep is reported
/// through the diagnostic log and counted in [`SweepStats`](crate::SweepStats).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input site has a non-finite coordinate
    #[error("site {index} has a non-finite coordinate ({x}, {y})")]
    InvalidSite {
        /// Position of the site in the input slice
        index: usize,
        x: f64,
        y: f64,
    },

    /// Two input sites share the same coordinates
    #[error("site {duplicate} duplicates site {first}")]
    DuplicateSite {
        /// Input index of the first occurrence
        first: usize,
        /// Input index of the repeated site
        duplicate: usize,
    },

    /// Requested region ID does not exist
    #[error("region not found: {0}")]
    RegionNotFound(usize),
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = VoronoiError::DuplicateSite { first: 0, duplicate: 3 };
        assert_eq!(err.to_string(), "site 3 duplicates site 0");

        let err = VoronoiError::RegionNotFound(7);
        assert_eq!(err.to_string(), "region not found: 7");

        let err = VoronoiError::InvalidConfig("epsilon must be finite".into());
        assert_eq!(err.to_string(), "invalid configuration: epsilon must be finite");
    }
}

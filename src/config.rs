//! Diagram Configuration and Builder
//!
//! This module provides the numeric tolerance and input-validation policy used
//! when turning a site list into a Voronoi diagram.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Default tolerance for collinearity tests and boundary-point merging
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// What to do when two input sites have identical coordinates
///
/// Coincident sites make the parabola-intersection and circumcenter formulas
/// divide by zero, so they are resolved before the sweep starts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`VoronoiError::DuplicateSite`]
    #[default]
    Reject,
    /// Keep the first occurrence; later duplicates map onto its region
    Merge,
}

/// Configuration for a single Voronoi sweep
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::*;
///
/// let config = DiagramConfigBuilder::new()
///     .epsilon(1e-7)
///     .unwrap()
///     .duplicates(DuplicatePolicy::Merge)
///     .build();
///
/// assert_eq!(config.duplicates, DuplicatePolicy::Merge);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Numeric tolerance
    ///
    /// Relative, so results do not depend on the input scale: triples whose
    /// turn angle has a sine within this value are treated as collinear, and
    /// boundary points closer than this fraction of their distance to the
    /// site are merged.
    pub epsilon: f64,

    /// Handling of coincident input sites
    pub duplicates: DuplicatePolicy,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        DiagramConfigBuilder::new().build()
    }
}

/// Builder for creating DiagramConfig with validation
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    epsilon: f64,
    duplicates: DuplicatePolicy,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - epsilon: 1e-9
    /// - duplicates: Reject
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            duplicates: DuplicatePolicy::default(),
        }
    }

    /// Set the numeric tolerance
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the tolerance is negative or not finite
    pub fn epsilon(mut self, epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "epsilon must be finite and >= 0 (got {})",
                epsilon
            )));
        }
        self.epsilon = epsilon;
        Ok(self)
    }

    /// Set the duplicate-site policy
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DiagramConfig {
        DiagramConfig {
            epsilon: self.epsilon,
            duplicates: self.duplicates,
        }
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DiagramConfigBuilder::new().build();
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert_eq!(config, DiagramConfig::default());
    }

    #[test]
    fn test_builder_custom() {
        let config = DiagramConfigBuilder::new()
            .epsilon(0.5)
            .unwrap()
            .duplicates(DuplicatePolicy::Merge)
            .build();

        assert_eq!(config.epsilon, 0.5);
        assert_eq!(config.duplicates, DuplicatePolicy::Merge);
    }

    #[test]
    fn test_builder_invalid_epsilon() {
        assert!(DiagramConfigBuilder::new().epsilon(-1.0).is_err());
        assert!(DiagramConfigBuilder::new().epsilon(f64::NAN).is_err());
        assert!(DiagramConfigBuilder::new().epsilon(f64::INFINITY).is_err());
        assert!(DiagramConfigBuilder::new().epsilon(0.0).is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = DiagramConfigBuilder::new()
            .duplicates(DuplicatePolicy::Merge)
            .build();

        let json = serde_json::to_string(&config).unwrap();
        let restored: DiagramConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}

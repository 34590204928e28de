//! Planar Voronoi diagrams with Fortune's sweep-line algorithm
//!
//! A standalone library that turns a set of 2D sites into one region per
//! site, the set of boundary points closer to that site than to any other.
//! Suitable as the layout stage of level generators, map tools and similar
//! pipelines that triangulate or render the regions themselves.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_plane::*;
//!
//! // Spread some sites over a 100x100 area
//! let sites = jittered_grid_sites(10, 10, 100.0, 100.0, 0.5, 42);
//!
//! // Build the diagram
//! let config = DiagramConfigBuilder::new()
//!     .duplicates(DuplicatePolicy::Merge)
//!     .build();
//! let diagram = VoronoiDiagram::generate(&sites, config).unwrap();
//!
//! for region in diagram.regions() {
//!     println!(
//!         "region {} at {:?}: {} boundary points, {} neighbors",
//!         region.id,
//!         region.site,
//!         region.vertex_count(),
//!         region.neighbor_count()
//!     );
//! }
//! ```
//!
//! For a one-shot computation without the query structure, use
//! [`compute_regions`].
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-region lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, regions, edges and statistics

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod diagnostics;
pub mod region;
pub mod sweep;
pub mod diagram;
pub mod generation;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{DiagramConfig, DiagramConfigBuilder, DuplicatePolicy, DEFAULT_EPSILON};
pub use geometry::{Circle, Point};
pub use diagnostics::{DiagnosticLog, LogFacade, NoopLog, LOG_TARGET};
pub use region::Region;
pub use sweep::{SweepStats, VoronoiEdge};
pub use diagram::{compute_regions, VoronoiDiagram};
pub use generation::{jittered_grid_sites, scatter_sites, ScatterOptions};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam for convenience
pub use glam;
pub use glam::DVec2;

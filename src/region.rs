//! Voronoi Region Structure
//!
//! Represents the cell of one input site: its boundary points and the regions
//! it borders.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// The Voronoi region of a single site
///
/// Each region holds:
/// - A unique ID (its position in the region list)
/// - The site that owns it
/// - Boundary points accumulated during the sweep
/// - IDs of the regions it shares a boundary with
///
/// Boundary points are appended in the order the sweep discovers them. Use
/// [`Region::ordered_boundary`] for a polygon-like ordering.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Unique identifier for this region (0 to region_count-1)
    ///
    /// Region IDs follow the order of first appearance in the input.
    pub id: usize,

    /// The site this region is nearest to
    pub site: Point,

    /// Boundary points in discovery order
    ///
    /// Contains Voronoi vertices (circumcenters) and the points where an edge
    /// started growing at a site event. Never holds two points closer than the
    /// configured tolerance.
    pub boundary: Vec<Point>,

    /// IDs of adjacent regions, sorted ascending
    pub neighbors: Vec<usize>,
}

impl Region {
    /// Create an empty region for `site`
    pub fn new(id: usize, site: Point) -> Self {
        Self {
            id,
            site,
            boundary: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Append a boundary point unless an equal one is already recorded
    ///
    /// Points are equal when they are closer than `epsilon` times their
    /// distance to the site, so the test does not depend on the input scale.
    /// Returns whether the point was added.
    pub(crate) fn push_boundary(&mut self, point: Point, epsilon: f64) -> bool {
        let tolerance = epsilon * point.distance(self.site);
        if self.boundary.iter().any(|p| p.distance(point) <= tolerance) {
            return false;
        }
        self.boundary.push(point);
        true
    }

    /// Record `other` as an adjacent region
    pub(crate) fn add_neighbor(&mut self, other: usize) {
        if other == self.id {
            return;
        }
        if let Err(pos) = self.neighbors.binary_search(&other) {
            self.neighbors.insert(pos, other);
        }
    }

    /// Number of recorded boundary points
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.boundary.len()
    }

    /// Whether the sweep recorded no boundary point for this region
    ///
    /// Only a lone site ends up empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boundary.is_empty()
    }

    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_neighbor_of(&self, other_region_id: usize) -> bool {
        self.neighbors.binary_search(&other_region_id).is_ok()
    }

    /// Boundary points sorted counter-clockwise around the site
    pub fn ordered_boundary(&self) -> Vec<Point> {
        let mut with_angles: Vec<(Point, f64)> = self
            .boundary
            .iter()
            .map(|&p| {
                let to_p = p - self.site;
                (p, to_p.y.atan2(to_p.x))
            })
            .collect();

        with_angles.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        with_angles.into_iter().map(|(p, _)| p).collect()
    }

    /// Area of the polygon formed by the ordered boundary
    ///
    /// Exact for closed interior cells. Cells on the hull of the site set are
    /// unbounded, so their value only covers the recorded part.
    pub fn approximate_area(&self) -> f64 {
        let ordered = self.ordered_boundary();
        if ordered.len() < 3 {
            return 0.0;
        }

        let twice_area: f64 = ordered
            .iter()
            .zip(ordered.iter().cycle().skip(1))
            .map(|(a, b)| a.perp_dot(*b))
            .sum();

        twice_area.abs() * 0.5
    }

    /// Euclidean distance between the sites of two regions
    #[inline]
    pub fn distance_to(&self, other: &Region) -> f64 {
        self.site.distance(other.site)
    }
}

//! Spatial indexing for fast position-to-region lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

#[cfg(feature = "spatial-index")]
use crate::geometry::Point;
#[cfg(feature = "spatial-index")]
use std::fmt;

/// Wrapper around a 2D KD-tree over region sites
///
/// A point lies in the Voronoi region of its nearest site, so a
/// nearest-neighbor query answers "which region contains this point" in
/// O(log n).
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    len: usize,
}

#[cfg(feature = "spatial-index")]
impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex").field("sites", &self.len).finish()
    }
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from region sites
    ///
    /// Item `i` of the index is `sites[i]`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_plane::*;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = vec![
    ///     Point::new(0.0, 0.0),
    ///     Point::new(10.0, 0.0),
    ///     Point::new(0.0, 10.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Point::new(9.0, 1.0)), Some(1));
    /// # }
    /// ```
    pub fn new(sites: &[Point]) -> Self {
        if sites.is_empty() {
            return Self { tree: None, len: 0 };
        }

        let points: Vec<[f64; 2]> = sites.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
            len: sites.len(),
        }
    }

    /// Index of the site nearest to `position`, `None` for an empty index
    pub fn find_nearest(&self, position: Point) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let query = [position.x, position.y];
        Some(tree.nearest_one::<SquaredEuclidean>(&query).item as usize)
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spatial_index_basic() {
        let sites = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        ];

        let index = SpatialIndex::new(&sites);

        assert_eq!(index.find_nearest(Point::new(1.0, 1.0)), Some(0));
        assert_eq!(index.find_nearest(Point::new(9.0, 0.5)), Some(1));
        assert_eq!(index.find_nearest(Point::new(-3.0, 12.0)), Some(2));
        assert_eq!(index.find_nearest(Point::new(6.0, 7.0)), Some(3));
    }

    #[test]
    fn test_spatial_index_matches_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let sites: Vec<Point> = (0..200)
            .map(|_| Point::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)))
            .collect();
        let index = SpatialIndex::new(&sites);

        for _ in 0..100 {
            let query = Point::new(rng.gen_range(-60.0..60.0), rng.gen_range(-60.0..60.0));
            let expected = sites
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.distance_squared(query).total_cmp(&b.1.distance_squared(query)))
                .map(|(i, _)| i);
            assert_eq!(index.find_nearest(query), expected);
        }
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new(&[]);
        assert_eq!(index.find_nearest(Point::ZERO), None);
        assert_eq!(format!("{:?}", index), "SpatialIndex { sites: 0 }");
    }
}

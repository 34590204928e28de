//! Seeded Site Distributions
//!
//! Two ways to produce input sites for a diagram:
//!
//! - [`scatter_sites`]: uniform random sites in a rectangle, optionally snapped
//!   to integer coordinates the way tile-based level layouts place them
//! - [`jittered_grid_sites`]: one site per grid cell, displaced by a bounded
//!   random offset, giving evenly sized regions with no duplicates
//!
//! Both use `ChaCha8Rng`, so a seed yields the same sites on every platform.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Options for [`scatter_sites`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterOptions {
    /// Number of sites to generate
    pub count: usize,
    /// Extent along x; sites fall in `[0, width)`
    pub width: f64,
    /// Extent along y; sites fall in `[0, height)`
    pub height: f64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Round coordinates down to integers
    ///
    /// Snapped sites can coincide, so pair this with
    /// [`DuplicatePolicy::Merge`](crate::DuplicatePolicy::Merge) or expect
    /// [`VoronoiError::DuplicateSite`](crate::VoronoiError::DuplicateSite).
    pub snap_to_grid: bool,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            count: 100,
            width: 100.0,
            height: 100.0,
            seed: 0,
            snap_to_grid: false,
        }
    }
}

#[inline]
fn valid_extent(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}

/// Generate uniformly scattered sites
///
/// Returns an empty list if `count` is zero or either extent is not a
/// positive finite number.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::{scatter_sites, ScatterOptions};
///
/// let sites = scatter_sites(&ScatterOptions {
///     count: 50,
///     width: 64.0,
///     height: 32.0,
///     seed: 7,
///     snap_to_grid: true,
/// });
///
/// assert_eq!(sites.len(), 50);
/// assert!(sites.iter().all(|p| p.x.fract() == 0.0 && p.y < 32.0));
/// ```
pub fn scatter_sites(options: &ScatterOptions) -> Vec<Point> {
    if options.count == 0 || !valid_extent(options.width) || !valid_extent(options.height) {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);

    (0..options.count)
        .map(|_| {
            let x = rng.gen_range(0.0..options.width);
            let y = rng.gen_range(0.0..options.height);
            if options.snap_to_grid {
                Point::new(x.floor(), y.floor())
            } else {
                Point::new(x, y)
            }
        })
        .collect()
}

/// Generate one site per cell of a `columns x rows` grid
///
/// Each site starts at its cell center and moves by up to `jitter` half-cells
/// along each axis. `jitter` is clamped to `[0, 1]`; at 0 the sites form an
/// exact lattice. Sites never leave their cell, so they are always distinct.
/// Output is row-major, in rows of increasing y.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_plane::jittered_grid_sites;
///
/// let sites = jittered_grid_sites(4, 3, 40.0, 30.0, 0.5, 1);
/// assert_eq!(sites.len(), 12);
///
/// // first site stays inside the first cell
/// assert!(sites[0].x >= 0.0 && sites[0].x < 10.0);
/// assert!(sites[0].y >= 0.0 && sites[0].y < 10.0);
/// ```
pub fn jittered_grid_sites(
    columns: usize,
    rows: usize,
    width: f64,
    height: f64,
    jitter: f64,
    seed: u64,
) -> Vec<Point> {
    if columns == 0 || rows == 0 || !valid_extent(width) || !valid_extent(height) {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cell_w = width / columns as f64;
    let cell_h = height / rows as f64;
    let jitter = if jitter.is_nan() { 0.0 } else { jitter.clamp(0.0, 1.0) };
    let reach_x = 0.5 * jitter * cell_w;
    let reach_y = 0.5 * jitter * cell_h;

    let mut offset = |reach: f64| {
        if reach > 0.0 {
            rng.gen_range(-reach..reach)
        } else {
            0.0
        }
    };

    let mut sites = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for column in 0..columns {
            let center = Point::new(
                (column as f64 + 0.5) * cell_w,
                (row as f64 + 0.5) * cell_h,
            );
            let dx = offset(reach_x);
            let dy = offset(reach_y);
            sites.push(center + Point::new(dx, dy));
        }
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scatter_count_and_bounds() {
        let options = ScatterOptions {
            count: 500,
            width: 80.0,
            height: 20.0,
            seed: 42,
            snap_to_grid: false,
        };
        let sites = scatter_sites(&options);

        assert_eq!(sites.len(), 500);
        for p in &sites {
            assert!((0.0..80.0).contains(&p.x));
            assert!((0.0..20.0).contains(&p.y));
        }
    }

    #[test]
    fn test_scatter_empty() {
        let mut options = ScatterOptions {
            count: 0,
            ..ScatterOptions::default()
        };
        assert!(scatter_sites(&options).is_empty());

        options.count = 10;
        options.width = 0.0;
        assert!(scatter_sites(&options).is_empty());

        options.width = f64::NAN;
        assert!(scatter_sites(&options).is_empty());
    }

    #[test]
    fn test_scatter_determinism() {
        let options = ScatterOptions::default();
        assert_eq!(scatter_sites(&options), scatter_sites(&options));
    }

    #[test]
    fn test_scatter_different_seeds() {
        let a = scatter_sites(&ScatterOptions { seed: 12345, ..Default::default() });
        let b = scatter_sites(&ScatterOptions { seed: 67890, ..Default::default() });
        assert_ne!(a, b, "Different seeds should produce different sites");
    }

    #[test]
    fn test_scatter_snap_to_grid() {
        let sites = scatter_sites(&ScatterOptions {
            count: 200,
            width: 10.0,
            height: 10.0,
            seed: 3,
            snap_to_grid: true,
        });

        for p in &sites {
            assert_eq!(p.x, p.x.floor());
            assert_eq!(p.y, p.y.floor());
            assert!(p.x <= 9.0 && p.y <= 9.0);
        }
        // 200 sites on a 10x10 lattice must collide
        let distinct: HashSet<(i64, i64)> =
            sites.iter().map(|p| (p.x as i64, p.y as i64)).collect();
        assert!(distinct.len() < sites.len());
    }

    #[test]
    fn test_jittered_grid_stays_in_cells() {
        let (columns, rows) = (12, 9);
        let sites = jittered_grid_sites(columns, rows, 120.0, 90.0, 0.9, 8);
        assert_eq!(sites.len(), columns * rows);

        for (i, p) in sites.iter().enumerate() {
            let (row, column) = (i / columns, i % columns);
            assert!(p.x >= column as f64 * 10.0 && p.x < (column + 1) as f64 * 10.0);
            assert!(p.y >= row as f64 * 10.0 && p.y < (row + 1) as f64 * 10.0);
        }

        let distinct: HashSet<(u64, u64)> =
            sites.iter().map(|p| (p.x.to_bits(), p.y.to_bits())).collect();
        assert_eq!(distinct.len(), sites.len());
    }

    #[test]
    fn test_jittered_grid_without_jitter_is_a_lattice() {
        let sites = jittered_grid_sites(2, 2, 4.0, 4.0, 0.0, 0);
        assert_eq!(
            sites,
            vec![
                Point::new(1.0, 1.0),
                Point::new(3.0, 1.0),
                Point::new(1.0, 3.0),
                Point::new(3.0, 3.0),
            ]
        );

        // out-of-range jitter is clamped rather than rejected
        assert_eq!(jittered_grid_sites(2, 2, 4.0, 4.0, -3.0, 0), sites);
    }

    #[test]
    fn test_jittered_grid_empty() {
        assert!(jittered_grid_sites(0, 5, 10.0, 10.0, 0.5, 1).is_empty());
        assert!(jittered_grid_sites(5, 0, 10.0, 10.0, 0.5, 1).is_empty());
        assert!(jittered_grid_sites(5, 5, -1.0, 10.0, 0.5, 1).is_empty());
    }
}

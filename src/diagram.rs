//! VoronoiDiagram main structure

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::config::{DiagramConfig, DuplicatePolicy};
use crate::diagnostics::{DiagnosticLog, LogFacade};
use crate::error::{Result, VoronoiError};
use crate::geometry::Point;
use crate::region::Region;
use crate::sweep::{self, SweepStats, VoronoiEdge};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Compute one region per site with the default configuration
///
/// This is the one-shot interface: region `i` belongs to `sites[i]`. Empty
/// input yields an empty list. Duplicate sites are rejected; use
/// [`VoronoiDiagram::generate`] with [`DuplicatePolicy::Merge`] to fold them
/// together instead.
///
/// # Example
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let sites = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 4.0)];
/// let regions = compute_regions(&sites, &NoopLog).unwrap();
///
/// assert_eq!(regions.len(), 3);
/// assert!(regions.iter().all(|r| !r.is_empty()));
/// ```
pub fn compute_regions<L>(sites: &[Point], log: &L) -> Result<Vec<Region>>
where
    L: DiagnosticLog + ?Sized,
{
    let config = DiagramConfig::default();
    let prepared = prepare_sites(sites, config.duplicates, log)?;
    Ok(sweep::run(&prepared.sites, config.epsilon, log).regions)
}

/// Distinct sites ready for the sweep
struct PreparedSites {
    /// One entry per region, in order of first appearance
    sites: Vec<Point>,
    /// Region id of every input site
    input_to_region: Vec<usize>,
}

/// Validate input sites and resolve coincident ones
fn prepare_sites<L>(input: &[Point], policy: DuplicatePolicy, log: &L) -> Result<PreparedSites>
where
    L: DiagnosticLog + ?Sized,
{
    let mut sites = Vec::with_capacity(input.len());
    let mut input_to_region = Vec::with_capacity(input.len());
    // exact coordinates -> (region id, first input index)
    let mut seen: HashMap<(u64, u64), (usize, usize)> = HashMap::with_capacity(input.len());

    for (index, &point) in input.iter().enumerate() {
        if !point.is_finite() {
            return Err(VoronoiError::InvalidSite {
                index,
                x: point.x,
                y: point.y,
            });
        }

        // adding 0.0 folds -0.0 into 0.0
        let key = ((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits());
        match seen.entry(key) {
            Entry::Vacant(slot) => {
                let region = sites.len();
                slot.insert((region, index));
                sites.push(point);
                input_to_region.push(region);
            }
            Entry::Occupied(slot) => {
                let (region, first) = *slot.get();
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(VoronoiError::DuplicateSite {
                            first,
                            duplicate: index,
                        });
                    }
                    DuplicatePolicy::Merge => {
                        log.record(format_args!(
                            "site {} duplicates site {}, merged into region {}",
                            index, first, region
                        ));
                        input_to_region.push(region);
                    }
                }
            }
        }
    }

    Ok(PreparedSites {
        sites,
        input_to_region,
    })
}

/// A complete Voronoi diagram over a set of planar sites
///
/// Stores every region, the traced edges and the sweep statistics in memory
/// for queries. Region ids are dense: with [`DuplicatePolicy::Merge`] several
/// input sites may share one region, see [`region_for_input`](Self::region_for_input).
///
/// # Examples
///
/// ```
/// use rust_voronoi_plane::*;
///
/// let sites = jittered_grid_sites(8, 8, 100.0, 100.0, 0.4, 42);
/// let diagram = VoronoiDiagram::generate(&sites, DiagramConfig::default()).unwrap();
/// println!("Generated {} regions", diagram.region_count());
///
/// if let Some(region) = diagram.get_region(0) {
///     println!("Region 0 has {} boundary points", region.vertex_count());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    /// Configuration used to generate this diagram
    config: DiagramConfig,

    /// All regions (indexed by region ID)
    regions: Vec<Region>,

    /// One edge per breakpoint created during the sweep
    edges: Vec<VoronoiEdge>,

    /// Region ID of each input site
    input_to_region: Vec<usize>,

    stats: SweepStats,

    /// Spatial index for fast position-to-region lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl VoronoiDiagram {
    /// Generate a diagram, tracing through the `log` crate
    ///
    /// Sweep diagnostics are emitted at trace level under
    /// [`LOG_TARGET`](crate::LOG_TARGET).
    ///
    /// # Errors
    ///
    /// * [`VoronoiError::InvalidSite`] if a coordinate is NaN or infinite
    /// * [`VoronoiError::DuplicateSite`] if two sites coincide and the
    ///   configuration rejects duplicates
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_plane::*;
    ///
    /// let sites = [Point::new(0.0, 0.0), Point::new(4.0, 0.0)];
    /// let diagram = VoronoiDiagram::generate(&sites, DiagramConfig::default()).unwrap();
    ///
    /// assert_eq!(diagram.region_count(), 2);
    /// assert_eq!(diagram.edges().len(), 1);
    /// ```
    pub fn generate(sites: &[Point], config: DiagramConfig) -> Result<Self> {
        Self::generate_with_log(sites, config, &LogFacade)
    }

    /// Generate a diagram with a custom diagnostic log
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_plane::*;
    /// use std::cell::Cell;
    ///
    /// let lines = Cell::new(0);
    /// let log = |_: std::fmt::Arguments<'_>| lines.set(lines.get() + 1);
    ///
    /// let sites = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 4.0)];
    /// VoronoiDiagram::generate_with_log(&sites, DiagramConfig::default(), &log).unwrap();
    /// assert!(lines.get() > 0);
    /// ```
    pub fn generate_with_log<L>(sites: &[Point], config: DiagramConfig, log: &L) -> Result<Self>
    where
        L: DiagnosticLog + ?Sized,
    {
        let prepared = prepare_sites(sites, config.duplicates, log)?;
        let output = sweep::run(&prepared.sites, config.epsilon, log);

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(&prepared.sites);

        Ok(Self {
            config,
            regions: output.regions,
            edges: output.edges,
            input_to_region: prepared.input_to_region,
            stats: output.stats,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this diagram
    #[inline]
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Get the number of regions
    ///
    /// Equals the number of distinct input sites.
    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Get all regions as a slice
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Get a region by ID
    ///
    /// Returns `None` if the region ID is out of bounds.
    #[inline]
    pub fn get_region(&self, id: usize) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Get a region by ID, failing with [`VoronoiError::RegionNotFound`]
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_plane::*;
    /// # let diagram = VoronoiDiagram::generate(&[Point::ZERO], DiagramConfig::default()).unwrap();
    /// assert!(diagram.region(0).is_ok());
    /// assert_eq!(diagram.region(5).unwrap_err(), VoronoiError::RegionNotFound(5));
    /// ```
    pub fn region(&self, id: usize) -> Result<&Region> {
        self.regions.get(id).ok_or(VoronoiError::RegionNotFound(id))
    }

    /// Get the region an input site ended up in
    ///
    /// `input_index` is the position in the slice passed to `generate`.
    pub fn region_for_input(&self, input_index: usize) -> Option<&Region> {
        self.input_to_region
            .get(input_index)
            .and_then(|&id| self.regions.get(id))
    }

    /// Get neighbor IDs for a region
    ///
    /// Returns empty slice if region ID is invalid.
    pub fn get_neighbors(&self, region_id: usize) -> &[usize] {
        self.regions
            .get(region_id)
            .map(|r| r.neighbors.as_slice())
            .unwrap_or(&[])
    }

    /// Edges traced by the sweep, bounded or not
    #[inline]
    pub fn edges(&self) -> &[VoronoiEdge] {
        &self.edges
    }

    /// Counters collected while generating
    #[inline]
    pub fn stats(&self) -> &SweepStats {
        &self.stats
    }

    /// Consume the diagram, keeping only its regions
    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }

    /// Find the region containing a position (requires spatial-index feature)
    ///
    /// A point belongs to the region of its nearest site, so this is a KD-tree
    /// nearest-neighbor lookup in O(log n). Returns `None` for an empty diagram.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_plane::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = [Point::new(0.0, 0.0), Point::new(4.0, 0.0)];
    /// let diagram = VoronoiDiagram::generate(&sites, DiagramConfig::default()).unwrap();
    /// assert_eq!(diagram.find_region(Point::new(3.5, 1.0)), Some(1));
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_region(&self, position: Point) -> Option<usize> {
        self.spatial_index.find_nearest(position)
    }

    /// Find regions within a given hop count from a center region (BFS)
    ///
    /// The result includes the center region and is sorted by region ID.
    /// Returns empty vec if `center_id` is invalid.
    pub fn find_regions_within_hops(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.regions.len() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut frontier = vec![center_id];
        visited.insert(center_id);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &region_id in &frontier {
                for &neighbor in self.get_neighbors(region_id) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        let mut found: Vec<usize> = visited.into_iter().collect();
        found.sort_unstable();
        found
    }
}

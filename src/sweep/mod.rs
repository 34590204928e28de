//! Fortune's sweep-line algorithm
//!
//! Consumes a list of distinct sites and produces one [`Region`] per site.
//!
//! # Algorithm
//!
//! 1. Queue one site event per site, ordered by y then x
//! 2. Pop events in ascending sweep coordinate:
//!    - a site event splits the arc above it (or starts the beachline)
//!    - a circle event removes a vanishing arc and records a Voronoi vertex
//! 3. Every beachline change schedules circle events for the triples it
//!    creates and invalidates those of the triples it destroys
//!
//! Circle events are invalidated lazily: each arc carries a generation that a
//! circle event captures when scheduled; a mismatch on dequeue marks the
//! event stale and it is dropped.

mod arc;
mod beachline;
mod event;
mod tree;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticLog;
use crate::geometry::{circumcircle, nearly_collinear, orientation, parabola_y, Circle, Point};
use crate::region::Region;

use arc::{ArcId, BreakpointId};
use beachline::{ArcLookup, Beachline};
use event::{Event, EventQueue};

/// Counters collected during one sweep
///
/// Every dequeued event is counted exactly once in `site_events`,
/// `circle_events`, `stale_events` or `skipped_events`, so after a run their
/// sum equals `events_enqueued`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Site events processed
    pub site_events: usize,
    /// Circle events that produced a Voronoi vertex
    pub circle_events: usize,
    /// Circle events discarded because their arc changed
    pub stale_events: usize,
    /// Events dropped because of degenerate arithmetic
    pub skipped_events: usize,
    /// Lookups that fell off the beachline index and were recovered
    pub recovered_lookups: usize,
    /// Events pushed onto the queue over the whole run
    pub events_enqueued: usize,
    /// Largest number of simultaneously live arcs
    pub max_beachline_len: usize,
    /// Largest number of simultaneously queued events
    pub peak_queue_len: usize,
}

/// A Voronoi edge traced by one breakpoint
///
/// `start` is where the breakpoint appeared: a site-event boundary point or a
/// Voronoi vertex. `end` is the vertex where it disappeared, or `None` for an
/// edge still growing when the sweep finished (an unbounded ray).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiEdge {
    /// Region on the left of the breakpoint
    pub left: usize,
    /// Region on the right of the breakpoint
    pub right: usize,
    pub start: Point,
    pub end: Option<Point>,
}

impl VoronoiEdge {
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.end.is_some()
    }
}

/// Everything a sweep produces
#[derive(Debug, Clone)]
pub(crate) struct SweepOutput {
    pub(crate) regions: Vec<Region>,
    pub(crate) edges: Vec<VoronoiEdge>,
    pub(crate) stats: SweepStats,
}

/// Run the sweep over distinct, finite `sites`
///
/// Region `i` belongs to `sites[i]`.
pub(crate) fn run<L>(sites: &[Point], epsilon: f64, log: &L) -> SweepOutput
where
    L: DiagnosticLog + ?Sized,
{
    Sweep::new(sites, epsilon, log).run()
}

struct Sweep<'a, L: ?Sized> {
    sites: &'a [Point],
    epsilon: f64,
    log: &'a L,
    queue: EventQueue,
    beachline: Beachline,
    regions: Vec<Region>,
    stats: SweepStats,
    sweep_y: f64,
    /// Breakpoints between sites of the first row, settled after the sweep
    row_breakpoints: Vec<BreakpointId>,
}

impl<'a, L> Sweep<'a, L>
where
    L: DiagnosticLog + ?Sized,
{
    fn new(sites: &'a [Point], epsilon: f64, log: &'a L) -> Self {
        let regions = sites
            .iter()
            .enumerate()
            .map(|(id, &site)| Region::new(id, site))
            .collect();

        Self {
            sites,
            epsilon,
            log,
            queue: EventQueue::with_capacity(2 * sites.len()),
            beachline: Beachline::with_capacity(sites.len()),
            regions,
            stats: SweepStats::default(),
            sweep_y: f64::NEG_INFINITY,
            row_breakpoints: Vec::new(),
        }
    }

    fn run(mut self) -> SweepOutput {
        // sites sharing a y enter left to right, whatever the input order
        let mut order: Vec<usize> = (0..self.sites.len()).collect();
        order.sort_by(|&a, &b| {
            let (pa, pb) = (self.sites[a], self.sites[b]);
            pa.y.total_cmp(&pb.y).then(pa.x.total_cmp(&pb.x))
        });
        for site in order {
            let point = self.sites[site];
            self.queue.enqueue(Event::Site { site, point }, point.y);
        }
        self.stats.peak_queue_len = self.queue.len();

        while let Some((key, event)) = self.queue.dequeue() {
            debug_assert!(key >= self.sweep_y, "event queue went backwards");
            self.sweep_y = key;

            match event {
                Event::Site { site, point } => self.handle_site(site, point),
                Event::Circle {
                    circle,
                    arc,
                    generation,
                } => self.handle_circle(circle, arc, generation),
            }

            self.stats.max_beachline_len = self.stats.max_beachline_len.max(self.beachline.len());
            self.stats.peak_queue_len = self.stats.peak_queue_len.max(self.queue.len());
        }
        debug_assert!(self.queue.is_empty());
        debug_assert!(self.sites.is_empty() || !self.beachline.is_empty());
        self.stats.events_enqueued = self.queue.enqueued() as usize;
        self.settle_row_breakpoints();

        self.log.record(format_args!(
            "sweep finished: {} regions, {} circle events, {} stale, {} arcs created",
            self.regions.len(),
            self.stats.circle_events,
            self.stats.stale_events,
            self.beachline.arcs_created()
        ));

        let edges = self
            .beachline
            .into_breakpoints()
            .into_iter()
            .map(|bp| VoronoiEdge {
                left: bp.left_site,
                right: bp.right_site,
                start: bp.origin,
                end: bp.end,
            })
            .collect();

        SweepOutput {
            regions: self.regions,
            edges,
            stats: self.stats,
        }
    }

    fn handle_site(&mut self, site: usize, point: Point) {
        self.log.record(format_args!(
            "site event {} at ({}, {})",
            site, point.x, point.y
        ));

        let above = match self.beachline.find_arc_above(site, point, self.sites) {
            ArcLookup::Created(_) => {
                self.log.record(format_args!("beachline empty, first arc for site {}", site));
                self.stats.site_events += 1;
                return;
            }
            ArcLookup::Found(id) => id,
            ArcLookup::Recovered(id) => {
                self.log.record(format_args!(
                    "no arc interval contains x = {}, using nearest visited arc",
                    point.x
                ));
                self.stats.recovered_lookups += 1;
                id
            }
        };

        let above_site = self.beachline.arc(above).site;
        let focus = self.sites[above_site];

        if focus.y == point.y {
            // both sites on the sweep line: vertical bisector, nothing to split
            let origin = (focus + point) * 0.5;
            self.link_neighbors(site, above_site);

            self.beachline.arc_mut(above).invalidate();
            let (new_arc, breakpoint) = self
                .beachline
                .insert_beside(above, site, self.sites, origin);
            self.row_breakpoints.push(breakpoint);
            self.schedule_circle(above);
            self.schedule_circle(new_arc);
            self.stats.site_events += 1;
            return;
        }

        let origin = Point::new(point.x, parabola_y(focus, point.x, point.y));
        if !origin.is_finite() {
            self.log.record(format_args!(
                "non-finite boundary point for site {} over site {}, event skipped",
                site, above_site
            ));
            self.stats.skipped_events += 1;
            return;
        }

        self.record_boundary(site, origin);
        self.record_boundary(above_site, origin);
        self.link_neighbors(site, above_site);

        self.beachline.arc_mut(above).invalidate();
        let (_, right_copy) = self.beachline.split(above, site, origin);
        self.schedule_circle(above);
        self.schedule_circle(right_copy);
        self.stats.site_events += 1;
    }

    fn handle_circle(&mut self, circle: Circle, arc: ArcId, generation: u32) {
        if !self.beachline.arc(arc).accepts(generation) {
            self.log.record(format_args!(
                "stale circle event at ({}, {}) discarded",
                circle.center.x, circle.center.y
            ));
            self.stats.stale_events += 1;
            return;
        }

        let Some((left, right)) = self.beachline.neighbors(arc) else {
            self.log.record(format_args!(
                "circle event for an outer arc at ({}, {}), skipped",
                circle.center.x, circle.center.y
            ));
            self.stats.skipped_events += 1;
            return;
        };

        // neighbors are unchanged since scheduling, so the circle still
        // passes through the three sites
        let vertex = circle.center;
        let left_site = self.beachline.arc(left).site;
        let middle_site = self.beachline.arc(arc).site;
        let right_site = self.beachline.arc(right).site;

        self.log.record(format_args!(
            "circle event: vertex ({}, {}) for sites {}, {}, {}",
            vertex.x, vertex.y, left_site, middle_site, right_site
        ));

        for site in [left_site, middle_site, right_site] {
            self.record_boundary(site, vertex);
        }

        self.beachline.remove(arc, vertex);
        self.link_neighbors(left_site, right_site);

        self.beachline.arc_mut(left).invalidate();
        self.beachline.arc_mut(right).invalidate();
        self.schedule_circle(left);
        self.schedule_circle(right);
        self.stats.circle_events += 1;
    }

    /// Queue a circle event for `arc` if its triple converges
    fn schedule_circle(&mut self, arc: ArcId) {
        let Some((left, right)) = self.beachline.neighbors(arc) else {
            return;
        };
        if let Some(pending) = self.beachline.arc(arc).circle_event {
            if self.queue.contains(pending) {
                return;
            }
        }

        let a = self.sites[self.beachline.arc(left).site];
        let b = self.sites[self.beachline.arc(arc).site];
        let c = self.sites[self.beachline.arc(right).site];

        if nearly_collinear(a, b, c, self.epsilon) {
            // these breakpoints never meet
            return;
        }
        if orientation(a, b, c) < 0.0 {
            // the middle arc is growing
            return;
        }

        let Some(circle) = circumcircle(a, b, c, self.epsilon) else {
            self.log.record(format_args!(
                "degenerate circumcircle for ({}, {}), ({}, {}), ({}, {})",
                a.x, a.y, b.x, b.y, c.x, c.y
            ));
            return;
        };

        let key = circle.sweep_key().max(self.sweep_y);
        let generation = self.beachline.arc(arc).generation;
        let id = self.queue.enqueue(
            Event::Circle {
                circle,
                arc,
                generation,
            },
            key,
        );
        self.beachline.arc_mut(arc).circle_event = Some(id);

        let lowest = circle.event_point();
        self.log.record(format_args!(
            "circle event scheduled at y = {} (circle bottom ({}, {})) for vertex ({}, {})",
            key, lowest.x, lowest.y, circle.center.x, circle.center.y
        ));
    }

    /// Record the midpoints of first-row breakpoints that are Voronoi points
    ///
    /// A first-row breakpoint comes up from y = -inf along the bisector of
    /// two sites on the first row. The midpoint of the pair lies on the
    /// traced edge only if the breakpoint never closed or closed at or past
    /// the row. Otherwise the edge is the ray below its closing vertex.
    fn settle_row_breakpoints(&mut self) {
        for id in std::mem::take(&mut self.row_breakpoints) {
            let breakpoint = self.beachline.breakpoint(id);
            let (left, right) = (breakpoint.left_site, breakpoint.right_site);
            let (origin, end) = (breakpoint.origin, breakpoint.end);

            match end {
                Some(end) if end.y < origin.y => {
                    self.log.record(format_args!(
                        "bisector of sites {} and {} ends at ({}, {}) below the first row",
                        left, right, end.x, end.y
                    ));
                    self.beachline.restart_breakpoint(id);
                }
                _ => {
                    self.record_boundary(left, origin);
                    self.record_boundary(right, origin);
                }
            }
        }
    }

    fn record_boundary(&mut self, site: usize, point: Point) {
        self.regions[site].push_boundary(point, self.epsilon);
    }

    fn link_neighbors(&mut self, a: usize, b: usize) {
        self.regions[a].add_neighbor(b);
        self.regions[b].add_neighbor(a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoopLog;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use crate::generation::{scatter_sites, ScatterOptions};
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fmt;

    const EPS: f64 = 1e-9;

    fn sweep(sites: &[Point]) -> SweepOutput {
        run(sites, EPS, &NoopLog)
    }

    fn random_sites(count: usize, seed: u64) -> Vec<Point> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect()
    }

    fn assert_accounting(stats: &SweepStats) {
        assert_eq!(
            stats.events_enqueued,
            stats.site_events + stats.circle_events + stats.stale_events + stats.skipped_events
        );
    }

    #[test]
    fn test_empty_input() {
        let output = sweep(&[]);
        assert!(output.regions.is_empty());
        assert!(output.edges.is_empty());
        assert_eq!(output.stats, SweepStats::default());
    }

    #[test]
    fn test_single_site() {
        let output = sweep(&[Point::new(3.0, 4.0)]);
        assert_eq!(output.regions.len(), 1);
        assert!(output.regions[0].is_empty());
        assert_eq!(output.stats.site_events, 1);
        assert_accounting(&output.stats);
    }

    #[test]
    fn test_two_sites_share_one_bisector_point() {
        let sites = [Point::new(0.0, 0.0), Point::new(4.0, 0.0)];
        let output = sweep(&sites);

        assert_eq!(output.regions.len(), 2);
        assert_eq!(output.regions[0].boundary.len(), 1);
        assert_eq!(output.regions[1].boundary.len(), 1);

        let shared = output.regions[0].boundary[0];
        assert_eq!(shared, output.regions[1].boundary[0]);
        assert_relative_eq!(shared.x, 2.0);
        assert_relative_eq!(shared.distance(sites[0]), shared.distance(sites[1]));

        assert_eq!(output.stats.circle_events, 0);
        assert_eq!(output.regions[0].neighbors, vec![1]);
        assert_eq!(output.edges.len(), 1);
        assert_eq!(output.edges[0].end, None);
    }

    #[test]
    fn test_triangle_fires_one_circle_event() {
        let sites = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 4.0),
        ];
        let output = sweep(&sites);

        assert_eq!(output.stats.circle_events, 1);
        assert_accounting(&output.stats);

        let center = Point::new(2.0, 1.5);
        for region in &output.regions {
            assert!(
                region.boundary.iter().any(|p| p.distance(center) < 1e-9),
                "region {} misses the circumcenter: {:?}",
                region.id,
                region.boundary
            );
            assert_eq!(region.neighbor_count(), 2);
        }

        let bounded: Vec<_> = output.edges.iter().filter(|e| e.is_bounded()).collect();
        assert!(!bounded.is_empty());
        for edge in bounded {
            let end = edge.end.unwrap();
            assert_relative_eq!(end.x, center.x, epsilon = 1e-9);
            assert_relative_eq!(end.y, center.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_collinear_sites_fire_no_circle_event() {
        let horizontal = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(4.0, 0.0),
        ];
        let vertical = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(0.0, 4.0),
        ];
        let diagonal = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        ];

        for sites in [&horizontal[..], &vertical[..], &diagonal[..]] {
            let output = sweep(sites);
            assert_eq!(output.stats.circle_events, 0, "sites {:?}", sites);
            assert_eq!(output.regions.len(), sites.len());
            assert!(output.regions.iter().all(|r| !r.is_empty()));
            assert_accounting(&output.stats);
        }
    }

    #[test]
    fn test_square_records_shared_vertex_once() {
        let sites = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
        ];
        let output = sweep(&sites);

        let center = Point::new(1.0, 1.0);
        for region in &output.regions {
            let hits = region
                .boundary
                .iter()
                .filter(|p| p.distance(center) < 1e-9)
                .count();
            assert_eq!(hits, 1, "region {}: {:?}", region.id, region.boundary);
        }
        assert!(output.stats.stale_events >= 1);
        assert_accounting(&output.stats);
    }

    /// Every boundary point must be as close to its own site as to any other
    /// and equally close to at least one other site
    fn assert_voronoi_points(sites: &[Point], output: &SweepOutput) {
        for region in &output.regions {
            assert!(!region.is_empty(), "region {} is empty", region.id);

            for &p in &region.boundary {
                let own = p.distance(region.site);
                // hull vertices can lie far out, so compare relative to the radius
                let tolerance = 1e-7 * own.max(1.0);
                let mut nearest_other = f64::INFINITY;
                for (j, &s) in sites.iter().enumerate() {
                    if j == region.id {
                        continue;
                    }
                    let d = p.distance(s);
                    assert!(
                        d >= own - tolerance,
                        "site {} is closer to boundary point {:?} of region {}",
                        j,
                        p,
                        region.id
                    );
                    nearest_other = nearest_other.min(d);
                }
                assert!(
                    (own - nearest_other).abs() <= tolerance,
                    "boundary point {:?} of region {} is not on a bisector",
                    p,
                    region.id
                );
            }
        }
    }

    /// Distinct integer sites, in generation order
    fn snapped_sites(count: usize, extent: f64, seed: u64) -> Vec<Point> {
        let options = ScatterOptions {
            count,
            width: extent,
            height: extent,
            seed,
            snap_to_grid: true,
        };
        let mut seen = HashSet::new();
        scatter_sites(&options)
            .into_iter()
            .filter(|p| seen.insert((p.x.to_bits(), p.y.to_bits())))
            .collect()
    }

    #[test]
    fn test_boundary_points_are_voronoi_points() {
        let sites = random_sites(300, 7);
        let output = sweep(&sites);

        assert_eq!(output.regions.len(), sites.len());
        assert!(output.stats.circle_events > 0);
        assert_accounting(&output.stats);
        assert_voronoi_points(&sites, &output);
    }

    #[test]
    fn test_integer_sites_are_voronoi_points() {
        for seed in 0..8 {
            let sites = snapped_sites(50, 20.0, seed);
            let output = sweep(&sites);

            assert_eq!(output.regions.len(), sites.len());
            assert_accounting(&output.stats);
            assert_voronoi_points(&sites, &output);
        }
    }

    #[test]
    fn test_first_row_midpoint_behind_closer_site() {
        // (2, 0) is nearer to (2, 1) than to the row pair, so the bisector of
        // the pair stops at (2, -1.5)
        let sites = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 1.0),
        ];
        let output = sweep(&sites);

        let midpoint = Point::new(2.0, 0.0);
        let vertex = Point::new(2.0, -1.5);
        for region in &output.regions {
            assert!(region.boundary.iter().all(|p| p.distance(midpoint) > 1e-9));
            assert!(region.boundary.iter().any(|p| p.distance(vertex) < 1e-9));
        }
        assert_voronoi_points(&sites, &output);

        let row_edge = output
            .edges
            .iter()
            .find(|e| (e.left, e.right) == (0, 1))
            .unwrap();
        assert!(row_edge.start.distance(vertex) < 1e-9);
        assert_eq!(row_edge.end, None);
    }

    #[test]
    fn test_first_row_with_sites_between() {
        // two row sites far apart with a closer row of sites just above them
        let mut sites = vec![Point::new(5.0, 0.0), Point::new(17.0, 0.0)];
        sites.extend((6..17).map(|x| Point::new(x as f64, 1.0)));
        let output = sweep(&sites);

        assert!(output.regions[0]
            .boundary
            .iter()
            .all(|p| p.distance(Point::new(11.0, 0.0)) > 1e-9));
        assert_voronoi_points(&sites, &output);
    }

    #[test]
    fn test_scaling_does_not_change_result() {
        // a power of two keeps the scaled coordinates exact
        const SCALE: f64 = 1.0 / 1_048_576.0;
        let sites = random_sites(40, 5);
        let small: Vec<Point> = sites.iter().map(|&p| p * SCALE).collect();

        let a = sweep(&sites);
        let b = sweep(&small);

        assert!(b.stats.circle_events > 0);
        assert_eq!(a.stats, b.stats);
        for (ra, rb) in a.regions.iter().zip(&b.regions) {
            assert_eq!(ra.boundary.len(), rb.boundary.len());
            for (&pa, &pb) in ra.boundary.iter().zip(&rb.boundary) {
                assert!((pb / SCALE).distance(pa) <= 1e-9 * pa.length().max(1.0));
            }
        }
    }

    #[test]
    fn test_integer_sites_at_small_scale() {
        let sites: Vec<Point> = snapped_sites(50, 20.0, 1)
            .into_iter()
            .map(|p| p * 1e-6)
            .collect();
        let output = sweep(&sites);

        assert!(output.stats.circle_events > 0);
        for region in &output.regions {
            assert!(!region.is_empty(), "region {} is empty", region.id);
        }
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let sites = random_sites(120, 99);
        let output = sweep(&sites);

        for region in &output.regions {
            for &n in &region.neighbors {
                assert!(output.regions[n].is_neighbor_of(region.id));
            }
        }
    }

    #[test]
    fn test_input_order_does_not_change_result() {
        let sites = random_sites(150, 3);
        let mut shuffled: Vec<(usize, Point)> = sites.iter().copied().enumerate().collect();
        shuffled.reverse();
        shuffled.swap(3, 90);

        let reordered: Vec<Point> = shuffled.iter().map(|&(_, p)| p).collect();
        let a = sweep(&sites);
        let b = sweep(&reordered);

        assert_eq!(a.stats.circle_events, b.stats.circle_events);
        for (new_id, &(old_id, _)) in shuffled.iter().enumerate() {
            let mut pa = a.regions[old_id].ordered_boundary();
            let mut pb = b.regions[new_id].ordered_boundary();
            assert_eq!(pa.len(), pb.len());
            pa.sort_by(|p, q| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)));
            pb.sort_by(|p, q| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)));
            for (p, q) in pa.iter().zip(&pb) {
                assert!(p.distance(*q) < 1e-9);
            }
        }
    }

    #[test]
    fn test_log_collaborator_receives_trace() {
        let lines = RefCell::new(Vec::<String>::new());
        let log = |message: fmt::Arguments<'_>| lines.borrow_mut().push(message.to_string());

        run(
            &[
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(2.0, 4.0),
            ],
            EPS,
            &log,
        );

        let lines = lines.into_inner();
        assert!(lines.iter().any(|l| l.starts_with("site event 2")));
        assert!(lines.iter().any(|l| l.starts_with("circle event scheduled")));
        assert!(lines.iter().any(|l| l.starts_with("sweep finished")));
    }
}

//! Arcs and breakpoints of the beachline
//!
//! Both live in arenas and refer to each other by index. An arc removed by a
//! circle event stays in its arena slot, marked dead, so stale events holding
//! its [`ArcId`] can still be checked and dropped.

use super::event::EventId;
use crate::geometry::Point;

/// Stable handle to an arc slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ArcId(pub(crate) usize);

/// Stable handle to a breakpoint slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BreakpointId(pub(crate) usize);

/// One parabola's interval of dominance on the beachline
#[derive(Debug, Clone)]
pub(crate) struct Arc {
    /// Region id of the owning site
    pub(crate) site: usize,
    pub(crate) left: Option<ArcId>,
    pub(crate) right: Option<ArcId>,
    pub(crate) left_breakpoint: Option<BreakpointId>,
    pub(crate) right_breakpoint: Option<BreakpointId>,
    /// Pending circle event, if one is live
    pub(crate) circle_event: Option<EventId>,
    /// Bumped whenever a scheduled circle event stops being valid
    pub(crate) generation: u32,
    pub(crate) live: bool,
}

impl Arc {
    fn new(site: usize) -> Self {
        Self {
            site,
            left: None,
            right: None,
            left_breakpoint: None,
            right_breakpoint: None,
            circle_event: None,
            generation: 0,
            live: true,
        }
    }

    /// Whether a circle event scheduled at `generation` still applies
    #[inline]
    pub(crate) fn accepts(&self, generation: u32) -> bool {
        self.live && self.generation == generation
    }

    /// Drop the pending circle event, if any
    ///
    /// The event stays queued and is discarded when it surfaces.
    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.circle_event = None;
    }
}

/// Boundary between two adjacent arcs
///
/// The position is never stored; it follows from the two sites and the sweep
/// coordinate. What is kept is where the traced edge started and, once the
/// breakpoint disappears at a circle event, where it ended.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Breakpoint {
    pub(crate) left_site: usize,
    pub(crate) right_site: usize,
    pub(crate) origin: Point,
    pub(crate) end: Option<Point>,
}

/// Owner of every arc and breakpoint created during a sweep
#[derive(Debug, Default)]
pub(crate) struct ArcArena {
    arcs: Vec<Arc>,
    breakpoints: Vec<Breakpoint>,
}

impl ArcArena {
    pub(crate) fn with_capacity(sites: usize) -> Self {
        // every site event adds at most two arcs and two breakpoints
        Self {
            arcs: Vec::with_capacity(2 * sites),
            breakpoints: Vec::with_capacity(2 * sites),
        }
    }

    pub(crate) fn alloc_arc(&mut self, site: usize) -> ArcId {
        self.arcs.push(Arc::new(site));
        ArcId(self.arcs.len() - 1)
    }

    pub(crate) fn alloc_breakpoint(
        &mut self,
        left_site: usize,
        right_site: usize,
        origin: Point,
    ) -> BreakpointId {
        self.breakpoints.push(Breakpoint {
            left_site,
            right_site,
            origin,
            end: None,
        });
        BreakpointId(self.breakpoints.len() - 1)
    }

    /// Give a breakpoint that has not moved yet to a different pair of sites
    pub(crate) fn reassign_breakpoint(
        &mut self,
        id: BreakpointId,
        left_site: usize,
        right_site: usize,
        origin: Point,
    ) {
        let breakpoint = &mut self.breakpoints[id.0];
        breakpoint.left_site = left_site;
        breakpoint.right_site = right_site;
        breakpoint.origin = origin;
    }

    /// Start the edge of a closed breakpoint over at its end point
    ///
    /// Afterwards the breakpoint describes an unbounded ray leaving `end`.
    pub(crate) fn restart_at_end(&mut self, id: BreakpointId) {
        let breakpoint = &mut self.breakpoints[id.0];
        if let Some(end) = breakpoint.end.take() {
            breakpoint.origin = end;
        }
    }

    #[inline]
    pub(crate) fn breakpoint(&self, id: BreakpointId) -> &Breakpoint {
        &self.breakpoints[id.0]
    }

    /// Close the breakpoint at `end`; the first closing point wins
    pub(crate) fn close_breakpoint(&mut self, id: BreakpointId, end: Point) {
        let breakpoint = &mut self.breakpoints[id.0];
        if breakpoint.end.is_none() {
            breakpoint.end = Some(end);
        }
    }

    #[inline]
    pub(crate) fn arc(&self, id: ArcId) -> &Arc {
        &self.arcs[id.0]
    }

    #[inline]
    pub(crate) fn arc_mut(&mut self, id: ArcId) -> &mut Arc {
        &mut self.arcs[id.0]
    }

    pub(crate) fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub(crate) fn into_breakpoints(self) -> Vec<Breakpoint> {
        self.breakpoints
    }
}

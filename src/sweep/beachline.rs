//! The beachline: live arcs in left-to-right order
//!
//! Arcs are linked to their neighbors explicitly and indexed by an AVL tree
//! for logarithmic lookups. Breakpoint positions depend on the sweep
//! coordinate, so every lookup recomputes them instead of trusting a key.

use super::arc::{Arc, ArcArena, ArcId, Breakpoint, BreakpointId};
use super::tree::ArcTree;
use crate::geometry::{breakpoint_x, Point};

/// Outcome of [`Beachline::find_arc_above`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArcLookup {
    /// The beachline was empty; a first, unconstrained arc was created
    Created(ArcId),
    /// The arc whose interval contains the query x
    Found(ArcId),
    /// The descent ran off the index; the last visited arc is returned
    Recovered(ArcId),
}

#[derive(Debug)]
pub(crate) struct Beachline {
    arena: ArcArena,
    tree: ArcTree,
}

impl Beachline {
    pub(crate) fn with_capacity(sites: usize) -> Self {
        Self {
            arena: ArcArena::with_capacity(sites),
            tree: ArcTree::with_capacity(2 * sites),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of live arcs
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub(crate) fn arc(&self, id: ArcId) -> &Arc {
        self.arena.arc(id)
    }

    #[inline]
    pub(crate) fn arc_mut(&mut self, id: ArcId) -> &mut Arc {
        self.arena.arc_mut(id)
    }

    /// Arcs ever created, live or dead
    pub(crate) fn arcs_created(&self) -> usize {
        self.arena.arc_count()
    }

    #[inline]
    pub(crate) fn breakpoint(&self, id: BreakpointId) -> &Breakpoint {
        self.arena.breakpoint(id)
    }

    /// See [`ArcArena::restart_at_end`]
    pub(crate) fn restart_breakpoint(&mut self, id: BreakpointId) {
        self.arena.restart_at_end(id);
    }

    /// Both neighbors of `id`, if it has two
    pub(crate) fn neighbors(&self, id: ArcId) -> Option<(ArcId, ArcId)> {
        let arc = self.arena.arc(id);
        Some((arc.left?, arc.right?))
    }

    /// Locate the arc above `point`, with the sweep line at `point.y`
    ///
    /// On an empty beachline this creates the first arc for `site`. A point
    /// exactly on a breakpoint belongs to the arc on its left.
    pub(crate) fn find_arc_above(&mut self, site: usize, point: Point, sites: &[Point]) -> ArcLookup {
        let Some(mut current) = self.tree.root() else {
            let id = self.arena.alloc_arc(site);
            self.tree.insert_root(id);
            return ArcLookup::Created(id);
        };

        let directrix = point.y;
        loop {
            let arc = self.arena.arc(current);
            let focus = sites[arc.site];

            let left_x = arc.left.map_or(f64::NEG_INFINITY, |left| {
                breakpoint_x(sites[self.arena.arc(left).site], focus, directrix)
            });
            let next = if point.x <= left_x {
                self.tree.left_child(current)
            } else {
                let right_x = arc.right.map_or(f64::INFINITY, |right| {
                    breakpoint_x(focus, sites[self.arena.arc(right).site], directrix)
                });
                if point.x > right_x {
                    self.tree.right_child(current)
                } else {
                    return ArcLookup::Found(current);
                }
            };

            match next {
                Some(child) => current = child,
                None => return ArcLookup::Recovered(current),
            }
        }
    }

    /// Split `above` around a new arc for `site`
    ///
    /// `above` keeps its left part; a copy of it is inserted to the right of
    /// the new arc. Both new breakpoints start at `origin`. Returns the new
    /// arc and the right copy.
    pub(crate) fn split(&mut self, above: ArcId, site: usize, origin: Point) -> (ArcId, ArcId) {
        let (above_site, old_right, old_right_breakpoint) = {
            let arc = self.arena.arc(above);
            (arc.site, arc.right, arc.right_breakpoint)
        };

        let middle = self.arena.alloc_arc(site);
        let copy = self.arena.alloc_arc(above_site);
        let left_breakpoint = self.arena.alloc_breakpoint(above_site, site, origin);
        let right_breakpoint = self.arena.alloc_breakpoint(site, above_site, origin);

        {
            let arc = self.arena.arc_mut(above);
            arc.right = Some(middle);
            arc.right_breakpoint = Some(left_breakpoint);
        }
        {
            let arc = self.arena.arc_mut(middle);
            arc.left = Some(above);
            arc.right = Some(copy);
            arc.left_breakpoint = Some(left_breakpoint);
            arc.right_breakpoint = Some(right_breakpoint);
        }
        {
            let arc = self.arena.arc_mut(copy);
            arc.left = Some(middle);
            arc.right = old_right;
            arc.left_breakpoint = Some(right_breakpoint);
            arc.right_breakpoint = old_right_breakpoint;
        }
        if let Some(right) = old_right {
            self.arena.arc_mut(right).left = Some(copy);
        }

        self.tree.insert_after(above, middle);
        self.tree.insert_after(middle, copy);
        (middle, copy)
    }

    /// Insert an arc for `site` directly beside `anchor`
    ///
    /// Used when both sites sit on the sweep line: the arcs are vertical rays
    /// and the new one goes to the side its x falls on. A breakpoint the new
    /// arc lands between has not traced anything yet and is handed over to
    /// the new pair of sites. Returns the new arc and the breakpoint between
    /// it and `anchor`.
    pub(crate) fn insert_beside(
        &mut self,
        anchor: ArcId,
        site: usize,
        sites: &[Point],
        origin: Point,
    ) -> (ArcId, BreakpointId) {
        let anchor_site = self.arena.arc(anchor).site;
        let id = self.arena.alloc_arc(site);

        if sites[site].x < sites[anchor_site].x {
            let old_left = self.arena.arc(anchor).left;
            let old_left_breakpoint = self.arena.arc(anchor).left_breakpoint;
            let breakpoint = self.arena.alloc_breakpoint(site, anchor_site, origin);
            {
                let arc = self.arena.arc_mut(id);
                arc.left = old_left;
                arc.right = Some(anchor);
                arc.left_breakpoint = old_left_breakpoint;
                arc.right_breakpoint = Some(breakpoint);
            }
            {
                let arc = self.arena.arc_mut(anchor);
                arc.left = Some(id);
                arc.left_breakpoint = Some(breakpoint);
            }
            if let Some(left) = old_left {
                self.arena.arc_mut(left).right = Some(id);
                if let Some(displaced) = old_left_breakpoint {
                    let left_site = self.arena.arc(left).site;
                    let origin = (sites[left_site] + sites[site]) * 0.5;
                    self.arena.reassign_breakpoint(displaced, left_site, site, origin);
                }
            }
            self.tree.insert_before(anchor, id);
            (id, breakpoint)
        } else {
            let old_right = self.arena.arc(anchor).right;
            let old_right_breakpoint = self.arena.arc(anchor).right_breakpoint;
            let breakpoint = self.arena.alloc_breakpoint(anchor_site, site, origin);
            {
                let arc = self.arena.arc_mut(id);
                arc.left = Some(anchor);
                arc.right = old_right;
                arc.left_breakpoint = Some(breakpoint);
                arc.right_breakpoint = old_right_breakpoint;
            }
            {
                let arc = self.arena.arc_mut(anchor);
                arc.right = Some(id);
                arc.right_breakpoint = Some(breakpoint);
            }
            if let Some(right) = old_right {
                self.arena.arc_mut(right).left = Some(id);
                if let Some(displaced) = old_right_breakpoint {
                    let right_site = self.arena.arc(right).site;
                    let origin = (sites[site] + sites[right_site]) * 0.5;
                    self.arena.reassign_breakpoint(displaced, site, right_site, origin);
                }
            }
            self.tree.insert_after(anchor, id);
            (id, breakpoint)
        }
    }

    /// Remove `id` at the Voronoi vertex `vertex` and join its neighbors
    ///
    /// Closes the two breakpoints of the vanished arc and starts a new one
    /// between the neighbors. Returns the joined `(left, right)` pair, or
    /// `None` if `id` lacks a neighbor on either side.
    pub(crate) fn remove(&mut self, id: ArcId, vertex: Point) -> Option<(ArcId, ArcId)> {
        let (left, right) = self.neighbors(id)?;
        let (left_breakpoint, right_breakpoint) = {
            let arc = self.arena.arc(id);
            (arc.left_breakpoint, arc.right_breakpoint)
        };
        for breakpoint in [left_breakpoint, right_breakpoint].into_iter().flatten() {
            self.arena.close_breakpoint(breakpoint, vertex);
        }

        let joined = self.arena.alloc_breakpoint(
            self.arena.arc(left).site,
            self.arena.arc(right).site,
            vertex,
        );
        {
            let arc = self.arena.arc_mut(left);
            arc.right = Some(right);
            arc.right_breakpoint = Some(joined);
        }
        {
            let arc = self.arena.arc_mut(right);
            arc.left = Some(left);
            arc.left_breakpoint = Some(joined);
        }
        {
            let arc = self.arena.arc_mut(id);
            arc.live = false;
            arc.left = None;
            arc.right = None;
            arc.invalidate();
        }

        self.tree.remove(id);
        Some((left, right))
    }

    /// Site of every live arc, left to right
    #[cfg(test)]
    pub(crate) fn sites_in_order(&self) -> Vec<usize> {
        let mut first = self.tree.root();
        while let Some(id) = first.and_then(|id| self.tree.left_child(id)) {
            first = Some(id);
        }

        let mut out = Vec::with_capacity(self.len());
        let mut current = first;
        while let Some(id) = current {
            let arc = self.arena.arc(id);
            out.push(arc.site);
            current = arc.right;
        }
        out
    }

    pub(crate) fn into_breakpoints(self) -> Vec<Breakpoint> {
        self.arena.into_breakpoints()
    }
}

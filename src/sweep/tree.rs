//! Balanced search tree over live arcs
//!
//! An AVL tree whose in-order sequence is the beachline from left to right.
//! Nodes carry no key: arcs are inserted next to a known neighbor, and
//! searches compare against breakpoints recomputed by the caller at query
//! time. Node slots are indexed by [`ArcId`], so the tree only accelerates
//! lookups; the arcs' own neighbor links stay the source of truth.

use super::arc::ArcId;

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    left: Option<ArcId>,
    right: Option<ArcId>,
    parent: Option<ArcId>,
    height: i32,
    linked: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ArcTree {
    nodes: Vec<Node>,
    root: Option<ArcId>,
    len: usize,
}

impl ArcTree {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn root(&self) -> Option<ArcId> {
        self.root
    }

    #[inline]
    pub(crate) fn left_child(&self, id: ArcId) -> Option<ArcId> {
        self.nodes[id.0].left
    }

    #[inline]
    pub(crate) fn right_child(&self, id: ArcId) -> Option<ArcId> {
        self.nodes[id.0].right
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn contains(&self, id: ArcId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.linked)
    }

    /// Height of the whole tree (0 when empty)
    #[cfg(test)]
    pub(crate) fn height(&self) -> i32 {
        self.height_of(self.root)
    }

    /// Make `id` the only node
    pub(crate) fn insert_root(&mut self, id: ArcId) {
        debug_assert!(self.root.is_none());
        self.claim(id);
        self.root = Some(id);
    }

    /// Insert `id` immediately after `anchor` in in-order position
    pub(crate) fn insert_after(&mut self, anchor: ArcId, id: ArcId) {
        self.claim(id);
        let parent = match self.nodes[anchor.0].right {
            None => {
                self.nodes[anchor.0].right = Some(id);
                anchor
            }
            Some(right) => {
                let leftmost = self.leftmost(right);
                self.nodes[leftmost.0].left = Some(id);
                leftmost
            }
        };
        self.nodes[id.0].parent = Some(parent);
        self.rebalance_from(Some(parent));
    }

    /// Insert `id` immediately before `anchor` in in-order position
    pub(crate) fn insert_before(&mut self, anchor: ArcId, id: ArcId) {
        self.claim(id);
        let parent = match self.nodes[anchor.0].left {
            None => {
                self.nodes[anchor.0].left = Some(id);
                anchor
            }
            Some(left) => {
                let rightmost = self.rightmost(left);
                self.nodes[rightmost.0].right = Some(id);
                rightmost
            }
        };
        self.nodes[id.0].parent = Some(parent);
        self.rebalance_from(Some(parent));
    }

    /// Unlink `id`, keeping the in-order sequence of the other nodes
    pub(crate) fn remove(&mut self, id: ArcId) {
        if !self.contains(id) {
            return;
        }
        let Node {
            left,
            right,
            parent,
            height,
            ..
        } = self.nodes[id.0];

        let rebalance_start = match (left, right) {
            (Some(left), Some(right)) => {
                // the in-order successor takes the removed node's place
                let successor = self.leftmost(right);
                let start = if successor == right {
                    successor
                } else {
                    let successor_parent = self.nodes[successor.0].parent;
                    let successor_right = self.nodes[successor.0].right;
                    self.replace_child(successor_parent, successor, successor_right);
                    if let Some(r) = successor_right {
                        self.nodes[r.0].parent = successor_parent;
                    }
                    self.nodes[successor.0].right = Some(right);
                    self.nodes[right.0].parent = Some(successor);
                    successor_parent.unwrap_or(successor)
                };
                self.nodes[successor.0].left = Some(left);
                self.nodes[left.0].parent = Some(successor);
                self.nodes[successor.0].parent = parent;
                self.nodes[successor.0].height = height;
                self.replace_child(parent, id, Some(successor));
                Some(start)
            }
            (child, None) | (None, child) => {
                self.replace_child(parent, id, child);
                if let Some(c) = child {
                    self.nodes[c.0].parent = parent;
                }
                parent
            }
        };

        self.nodes[id.0] = Node::default();
        self.len -= 1;
        self.rebalance_from(rebalance_start);
    }

    fn claim(&mut self, id: ArcId) {
        if self.nodes.len() <= id.0 {
            self.nodes.resize(id.0 + 1, Node::default());
        }
        debug_assert!(!self.nodes[id.0].linked, "arc already in the tree");
        self.nodes[id.0] = Node {
            height: 1,
            linked: true,
            ..Node::default()
        };
        self.len += 1;
    }

    fn leftmost(&self, mut id: ArcId) -> ArcId {
        while let Some(left) = self.nodes[id.0].left {
            id = left;
        }
        id
    }

    fn rightmost(&self, mut id: ArcId) -> ArcId {
        while let Some(right) = self.nodes[id.0].right {
            id = right;
        }
        id
    }

    #[inline]
    fn height_of(&self, id: Option<ArcId>) -> i32 {
        id.map_or(0, |id| self.nodes[id.0].height)
    }

    fn update_height(&mut self, id: ArcId) {
        let node = self.nodes[id.0];
        self.nodes[id.0].height = 1 + self.height_of(node.left).max(self.height_of(node.right));
    }

    fn balance_factor(&self, id: ArcId) -> i32 {
        let node = &self.nodes[id.0];
        self.height_of(node.left) - self.height_of(node.right)
    }

    fn replace_child(&mut self, parent: Option<ArcId>, old: ArcId, new: Option<ArcId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                if self.nodes[p.0].left == Some(old) {
                    self.nodes[p.0].left = new;
                } else {
                    self.nodes[p.0].right = new;
                }
            }
        }
    }

    fn rotate_left(&mut self, x: ArcId) -> ArcId {
        let Some(y) = self.nodes[x.0].right else {
            return x;
        };
        let parent = self.nodes[x.0].parent;
        let inner = self.nodes[y.0].left;

        self.nodes[x.0].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner.0].parent = Some(x);
        }
        self.nodes[y.0].left = Some(x);
        self.nodes[x.0].parent = Some(y);
        self.nodes[y.0].parent = parent;
        self.replace_child(parent, x, Some(y));

        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rotate_right(&mut self, x: ArcId) -> ArcId {
        let Some(y) = self.nodes[x.0].left else {
            return x;
        };
        let parent = self.nodes[x.0].parent;
        let inner = self.nodes[y.0].right;

        self.nodes[x.0].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner.0].parent = Some(x);
        }
        self.nodes[y.0].right = Some(x);
        self.nodes[x.0].parent = Some(y);
        self.nodes[y.0].parent = parent;
        self.replace_child(parent, x, Some(y));

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Restore heights and the AVL balance on the path up to the root
    fn rebalance_from(&mut self, mut current: Option<ArcId>) {
        while let Some(mut id) = current {
            self.update_height(id);
            let balance = self.balance_factor(id);

            if balance > 1 {
                if let Some(left) = self.nodes[id.0].left {
                    if self.balance_factor(left) < 0 {
                        self.rotate_left(left);
                    }
                }
                id = self.rotate_right(id);
            } else if balance < -1 {
                if let Some(right) = self.nodes[id.0].right {
                    if self.balance_factor(right) > 0 {
                        self.rotate_right(right);
                    }
                }
                id = self.rotate_left(id);
            }

            current = self.nodes[id.0].parent;
        }
    }
}

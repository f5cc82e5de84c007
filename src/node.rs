//! Node storage for the tree.
//!
//! Nodes live in a `Vec`-backed arena and refer to each other by [`NodeId`].
//! A tree position is an `Option<NodeId>`: `None` is an empty subtree,
//! `Some(id)` an occupied node. `left`/`right` are the owning links; `parent`
//! is a plain back-index used only to relink a node's parent when the node is
//! excised, and is written only by [`NodeArena::set_child`] and the helpers
//! built on it.

use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

/// Equal-ranked elements of one node, in insertion order.
pub(crate) type Bucket<T> = SmallVec<[T; 1]>;

/// Index of a node slot in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which link of a parent a child hangs off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    /// Non-empty while the node is reachable; empty once the slot is freed.
    pub(crate) bucket: Bucket<T>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<T> Node<T> {
    /// The element every comparison at this node is made against.
    ///
    /// This is the oldest surviving bucket member; all members compare equal
    /// to each other, so ordering decisions do not depend on which one it is.
    #[inline]
    pub(crate) fn rank(&self) -> &T {
        debug_assert!(!self.bucket.is_empty(), "rank of a vacant node");
        &self.bucket[0]
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeArena<T> {
    slots: Vec<Node<T>>,
    /// Vacant slots, reused before the arena grows.
    free: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of occupied slots.
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Allocate a detached node whose bucket is `{value}`.
    pub(crate) fn alloc(&mut self, value: T) -> NodeId {
        let mut bucket = Bucket::new();
        bucket.push(value);
        let node = Node {
            bucket,
            left: None,
            right: None,
            parent: None,
        };

        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = node;
            return id;
        }

        let id = NodeId(
            u32::try_from(self.slots.len()).unwrap_or_else(|_| panic!("node arena exhausted")),
        );
        self.slots.push(node);
        id
    }

    /// Return a detached, emptied slot to the free list.
    pub(crate) fn free(&mut self, id: NodeId) {
        let node = &mut self.slots[id.index()];
        debug_assert!(node.bucket.is_empty(), "freeing a node that still holds elements");
        node.bucket = Bucket::new();
        node.left = None;
        node.right = None;
        node.parent = None;
        self.free.push(id);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Link `child` under `parent` on `side`, keeping `child.parent` in step.
    pub(crate) fn set_child(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self[parent].left = child,
            Side::Right => self[parent].right = child,
        }
        if let Some(child) = child {
            self[child].parent = Some(parent);
        }
    }

    #[inline]
    pub(crate) fn attach_left(&mut self, parent: NodeId, child: NodeId) {
        self.set_child(parent, Side::Left, Some(child));
    }

    #[inline]
    pub(crate) fn attach_right(&mut self, parent: NodeId, child: NodeId) {
        self.set_child(parent, Side::Right, Some(child));
    }

    /// Which link of `parent` holds `child`.
    pub(crate) fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        if self[parent].left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self[parent].right, Some(child), "stale parent link");
            Side::Right
        }
    }

    /// Leftmost node of the subtree rooted at `id`.
    pub(crate) fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    /// Rightmost node of the subtree rooted at `id`.
    pub(crate) fn maximum(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self[id].right {
            id = right;
        }
        id
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = Node<T>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<T> {
        &self.slots[id.index()]
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.slots[id.index()]
    }
}

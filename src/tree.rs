//! The binary search tree engine.
//!
//! [`SortedTree`] keeps its elements sorted under a [`Comparator`] at all
//! times. Every node holds a bucket of elements that compare equal, so ranks
//! are unique across the tree while equal-but-distinct elements are still
//! retained. The tree is deliberately unbalanced: there are no rotations, and
//! sorted input degrades it into a linked list. Every algorithm here is
//! iterative, so such a degenerate tree costs time, not stack.

use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{Error, Result};
use crate::node::{NodeArena, NodeId, Side};

/// Where a descent for an element ended.
enum Descent {
    /// A node whose rank compares equal to the element.
    Found(NodeId),
    /// The empty position the element belongs in: under a parent on some
    /// side, or the root of an empty tree.
    Vacant(Option<(NodeId, Side)>),
}

/// A mutable, always-sorted collection backed by an unbalanced binary search
/// tree.
///
/// Elements that compare `Equal` share one node and are kept in insertion
/// order; elements equal under `PartialEq` are stored once.
///
/// ```rust
/// use sorted_bucket_tree::SortedTree;
///
/// let mut tree = SortedTree::new();
/// for x in [10, 20, 5, 15] {
///     tree.insert(x);
/// }
/// assert_eq!(tree.to_sorted_list(), vec![&5, &10, &15, &20]);
/// assert_eq!(tree.get(0), Ok(&5));
/// assert!(tree.get(4).is_err());
/// ```
#[derive(Clone)]
pub struct SortedTree<T, C = NaturalOrder> {
    pub(crate) nodes: NodeArena<T>,
    pub(crate) root: Option<NodeId>,
    comparator: C,
}

impl<T> SortedTree<T, NaturalOrder> {
    /// An empty tree ordered by `T`'s `Ord` implementation.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C> SortedTree<T, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            comparator,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Number of elements across all buckets.
    ///
    /// Not cached: this walks the whole tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// In-order iterator: ascending by rank, bucket insertion order within a
    /// rank.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root)
    }

    /// A fresh snapshot of every element in sorted order.
    pub fn to_sorted_list(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// The element at `index` in sorted order. O(n).
    pub fn get(&self, index: usize) -> Result<&T> {
        self.iter().nth(index).ok_or_else(|| Error::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// The smallest element, if any.
    pub fn first(&self) -> Option<&T> {
        let root = self.root?;
        self.nodes[self.nodes.minimum(root)].bucket.first()
    }

    /// The largest element, if any. Among equal ranks this is the most
    /// recently inserted one, matching the end of [`Self::to_sorted_list`].
    pub fn last(&self) -> Option<&T> {
        let root = self.root?;
        self.nodes[self.nodes.maximum(root)].bucket.last()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }

    /// Consume the tree, returning its elements in sorted order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.nodes[id].left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            let node = &mut self.nodes[id];
            out.extend(std::mem::take(&mut node.bucket));
            current = node.right;
        }
        out
    }
}

impl<T: PartialEq, C: Comparator<T>> SortedTree<T, C> {
    /// A tree ordered by `comparator`, pre-populated with `elements`.
    pub fn from_iter_with<I: IntoIterator<Item = T>>(comparator: C, elements: I) -> Self {
        let mut tree = Self::with_comparator(comparator);
        tree.extend(elements);
        tree
    }

    fn descend(&self, value: &T) -> Descent {
        let mut parent = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            let side = match self.comparator.compare(value, node.rank()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Descent::Found(id),
            };
            parent = Some((id, side));
            current = node.child(side);
        }
        Descent::Vacant(parent)
    }

    /// Whether an element equal to `value` (by `PartialEq`) is stored.
    pub fn contains(&self, value: &T) -> bool {
        match self.descend(value) {
            Descent::Found(id) => self.nodes[id].bucket.contains(value),
            Descent::Vacant(_) => false,
        }
    }

    /// Insert `value`, returning `false` if an equal element was already
    /// present (the tree is then unchanged).
    pub fn insert(&mut self, value: T) -> bool {
        match self.descend(&value) {
            Descent::Found(id) => {
                let bucket = &mut self.nodes[id].bucket;
                if bucket.contains(&value) {
                    return false;
                }
                bucket.push(value);
                true
            }
            Descent::Vacant(slot) => {
                let id = self.nodes.alloc(value);
                match slot {
                    None => self.root = Some(id),
                    Some((parent, Side::Left)) => self.nodes.attach_left(parent, id),
                    Some((parent, Side::Right)) => self.nodes.attach_right(parent, id),
                }
                trace!(node = id.index(), "created node");
                true
            }
        }
    }

    /// Remove the element equal to `value`, returning it. Absent elements
    /// leave the tree untouched.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let Descent::Found(id) = self.descend(value) else {
            return None;
        };
        let bucket = &mut self.nodes[id].bucket;
        let pos = bucket.iter().position(|member| member == value)?;
        let removed = bucket.remove(pos);
        if bucket.is_empty() {
            self.excise(id);
        }
        Some(removed)
    }

    /// Unlink a node whose bucket just emptied.
    ///
    /// With two children the in-order successor's bucket moves up into `id`
    /// and the successor, which has no left child, is excised in its place.
    fn excise(&mut self, mut id: NodeId) {
        loop {
            let node = &self.nodes[id];
            debug_assert!(node.bucket.is_empty(), "excising a node that holds elements");
            match (node.left, node.right) {
                (None, None) => {
                    self.detach(id);
                    return;
                }
                (Some(child), None) | (None, Some(child)) => {
                    self.absorb(id, child);
                    return;
                }
                (Some(_), Some(right)) => {
                    let successor = self.nodes.minimum(right);
                    trace!(
                        node = id.index(),
                        successor = successor.index(),
                        "promoting in-order successor"
                    );
                    let bucket = std::mem::take(&mut self.nodes[successor].bucket);
                    self.nodes[id].bucket = bucket;
                    id = successor;
                }
            }
        }
    }

    /// Drop a childless node from its parent.
    fn detach(&mut self, id: NodeId) {
        match self.nodes[id].parent {
            Some(parent) => {
                let side = self.nodes.side_of(parent, id);
                self.nodes.set_child(parent, side, None);
                self.nodes.free(id);
                trace!(node = id.index(), parent = parent.index(), "detached leaf");
            }
            None => {
                // The root was the last node.
                self.root = None;
                self.nodes.clear();
                trace!("tree emptied");
            }
        }
    }

    /// Replace `id`'s contents with its only child's and splice the child out.
    fn absorb(&mut self, id: NodeId, child: NodeId) {
        let child_node = &mut self.nodes[child];
        let bucket = std::mem::take(&mut child_node.bucket);
        let (left, right) = (child_node.left, child_node.right);

        self.nodes[id].bucket = bucket;
        self.nodes.set_child(id, Side::Left, left);
        self.nodes.set_child(id, Side::Right, right);
        self.nodes.free(child);
        trace!(node = id.index(), child = child.index(), "absorbed only child");
    }
}

impl<T, C: Default> Default for SortedTree<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C: Comparator<T>> Extend<T> for SortedTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: PartialEq, C: Comparator<T> + Default> FromIterator<T> for SortedTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(C::default(), iter)
    }
}

impl<'a, T, C> IntoIterator for &'a SortedTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`SortedTree`].
pub struct Iter<'a, T> {
    nodes: &'a NodeArena<T>,
    /// Nodes whose bucket and right subtree are still to be visited.
    stack: Vec<NodeId>,
    bucket: std::slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    fn new(nodes: &'a NodeArena<T>, root: Option<NodeId>) -> Self {
        let mut iter = Self {
            nodes,
            stack: Vec::new(),
            bucket: <&[T]>::default().iter(),
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<NodeId>) {
        while let Some(id) = current {
            self.stack.push(id);
            current = self.nodes[id].left;
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.bucket.next() {
                return Some(value);
            }
            let nodes = self.nodes;
            let node = &nodes[self.stack.pop()?];
            self.bucket = node.bucket.iter();
            self.push_left_spine(node.right);
        }
    }
}

impl<T> std::iter::FusedIterator for Iter<'_, T> {}

//! A sequence-like view over [`SortedTree`].
//!
//! `SortedList` forwards every call to the tree and reads like a sorted
//! `Vec`: `get` returns an `Option`, and indexing panics when out of range.

use std::fmt;
use std::ops::Index;

use crate::comparator::{Comparator, NaturalOrder};
use crate::tree::{Iter, SortedTree};

#[derive(Clone)]
pub struct SortedList<T, C = NaturalOrder> {
    tree: SortedTree<T, C>,
}

impl<T> SortedList<T, NaturalOrder> {
    pub fn new() -> Self {
        Self {
            tree: SortedTree::new(),
        }
    }
}

impl<T, C> SortedList<T, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            tree: SortedTree::with_comparator(comparator),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.tree.get(index).ok()
    }

    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.tree.iter().cloned().collect()
    }

    pub fn as_tree(&self) -> &SortedTree<T, C> {
        &self.tree
    }

    pub fn into_tree(self) -> SortedTree<T, C> {
        self.tree
    }
}

impl<T: PartialEq, C: Comparator<T>> SortedList<T, C> {
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert(value)
    }

    pub fn remove(&mut self, value: &T) -> Option<T> {
        self.tree.remove(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }
}

impl<T, C> From<SortedTree<T, C>> for SortedList<T, C> {
    fn from(tree: SortedTree<T, C>) -> Self {
        Self { tree }
    }
}

impl<T, C> Index<usize> for SortedList<T, C> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.tree.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, C: Default> Default for SortedList<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<T: PartialEq, C: Comparator<T>> Extend<T> for SortedList<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<T: PartialEq, C: Comparator<T> + Default> FromIterator<T> for SortedList<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a SortedList<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! # sorted-bucket-tree
//!
//! A mutable, always-sorted collection backed by an unbalanced binary search
//! tree. Elements that the comparator ranks as equal share one node (a
//! "bucket"), so equal-but-distinct values are all retained while ranks stay
//! unique in the tree.
//!
//! There is no rebalancing: sorted input produces a tree as deep as it is
//! long. All algorithms are iterative, so a degenerate tree is slow, never a
//! stack overflow.
//!
//! ## Example
//!
//! ```rust
//! use sorted_bucket_tree::SortedTree;
//!
//! let mut tree = SortedTree::with_comparator(|a: &(u32, &str), b: &(u32, &str)| a.0.cmp(&b.0));
//! tree.insert((2, "two"));
//! tree.insert((1, "one"));
//! tree.insert((2, "deux"));
//!
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.get(1), Ok(&(2, "two")));
//! assert!(tree.contains(&(2, "deux")));
//!
//! tree.remove(&(2, "two"));
//! assert_eq!(tree.to_sorted_list(), vec![&(1, "one"), &(2, "deux")]);
//! ```
//!
//! The tree is single-owner: share it across threads behind a lock.

#![deny(unsafe_code)]

pub mod comparator;
pub mod error;
mod list;
mod node;
mod tree;

pub use comparator::{Comparator, NaturalOrder, Reversed};
pub use error::{Error, Result};
pub use list::SortedList;
pub use tree::{Iter, SortedTree};

#[cfg(test)]
mod proptests;

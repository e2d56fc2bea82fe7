//! This crate exposes an owning Binary Search Tree (BST) of unique elements
//! that can be flattened into a sorted array and rebuilt from one, balanced.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert and find stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores one element
//! and will sometimes have child `Node`s. The most important invariants of
//! a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have an
//!    element ordering before its own element.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have an
//!    element ordering after its own element.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for an element takes `O(height)` (where `height` is the number of
//! `Node`s on the longest path from the root `Node` to a leaf `Node`). The
//! [`Tree`][tree::Tree] here doesn't rebalance itself as elements are
//! inserted, so inserting in sorted order degenerates it into a chain. Moving
//! the elements out into a sorted array and building the tree back from it
//! restores a height of `O(lg N)`.
//!
//! ```
//! use bintree::tree::Tree;
//!
//! let mut tree: Tree<_> = (1..=15).collect();
//! assert_eq!(tree.height(), 15);
//!
//! let mut slots = tree.drain_sorted().into_iter().map(Some).collect::<Vec<_>>();
//! tree.build_from_array(&mut slots).unwrap();
//! assert_eq!(tree.height(), 4);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod tree;
mod util;

#[cfg(test)]
mod test;

//! Failure values returned by [`Tree`][crate::tree::Tree] operations.
//!
//! Rejecting a duplicate and failing to find an element are ordinary outcomes
//! and are reported through `bool`/`Option` returns. The types here cover the
//! cases where the caller asked for something the tree could not do: an
//! allocation that failed, or an array buffer that doesn't satisfy the
//! requirements of an export or import.

use std::alloc::Layout;

/// A tree node couldn't be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("could not allocate {} bytes for a tree node", .layout.size())]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    pub(crate) fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The layout of the allocation that failed.
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

/// Why [`Tree::try_insert`][crate::tree::Tree::try_insert] didn't insert an
/// element. Either way the element is handed back and the tree is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum InsertError<T> {
    /// An equal element is already stored in the tree.
    #[error("an equal element is already in the tree")]
    Duplicate(T),
    /// There was no memory for the new leaf.
    #[error("could not insert element")]
    Alloc {
        /// The element that wasn't inserted.
        element: T,
        /// The underlying allocation failure.
        #[source]
        source: AllocError,
    },
}

impl<T> InsertError<T> {
    /// Takes back the element that couldn't be inserted.
    pub fn into_inner(self) -> T {
        match self {
            Self::Duplicate(element) | Self::Alloc { element, .. } => element,
        }
    }
}

/// Why an array export or import was refused or cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArrayError {
    /// The destination buffer has fewer slots than the tree has elements.
    #[error("buffer has {available} slots but {needed} are needed")]
    CapacityTooSmall {
        /// Number of elements in the tree.
        needed: usize,
        /// Length of the buffer.
        available: usize,
    },
    /// A destination slot already holds an element.
    #[error("slot {index} is already populated")]
    SlotOccupied {
        /// Index of the populated slot.
        index: usize,
    },
    /// A populated slot follows an empty one, so the elements aren't a
    /// contiguous run from the start of the buffer.
    #[error("slot {index} is populated but follows an empty slot")]
    Gap {
        /// Index of the first populated slot after the gap.
        index: usize,
    },
    /// The elements aren't in strictly ascending order.
    #[error("slot {index} does not order strictly after the slot before it")]
    Unsorted {
        /// Index of the first out-of-order element.
        index: usize,
    },
    /// The tree ran out of memory while it was being rebuilt.
    #[error(transparent)]
    Alloc(#[from] AllocError),
}

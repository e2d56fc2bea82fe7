//! An owning Binary Search Tree of unique elements. The element is its own key: its [`Ord`]
//! implementation decides both where it lives in the tree and whether two elements are the same.
//!
//! There is no way to remove a single element. The tree is emptied in bulk with
//! [`clear`][Tree::clear] or by moving every element out with
//! [`drain_to_array`][Tree::drain_to_array]. The tree doesn't balance itself on insertion but a
//! sorted array can be turned back into a balanced tree with
//! [`build_from_array`][Tree::build_from_array].
//!
//! # Examples
//!
//! ```
//! use bintree::tree::Tree;
//!
//! let mut tree = Tree::new();
//! for x in [5, 3, 8, 1, 4] {
//!     assert!(tree.insert(x));
//! }
//!
//! // Elements are unique.
//! assert!(!tree.insert(3));
//!
//! assert_eq!(tree.retrieve(&4), Some(&4));
//! assert_eq!(tree.retrieve(&9), None);
//! assert_eq!(tree.depth(&4), 3);
//! assert_eq!(tree.to_string(), " 1 3 4 5 8\n");
//!
//! // Move everything out, then rebuild a balanced tree from the sorted slots.
//! let mut slots = vec![None; tree.len()];
//! tree.drain_to_array(&mut slots).unwrap();
//! assert!(tree.is_empty());
//!
//! tree.build_from_array(&mut slots).unwrap();
//! assert_eq!(tree.height(), 3);
//! assert!(slots.iter().all(Option::is_none));
//! ```

use std::alloc;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};

use crate::error::{AllocError, ArrayError, InsertError};
use crate::util::try_box;

/// One level of indentation in the sideways rendering.
const INDENT: &str = "    ";

type Link<T> = Option<Box<Node<T>>>;

/// A Binary Search Tree holding unique elements in ascending order.
pub struct Tree<T> {
    root: Link<T>,
    len: usize,
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Returns `true` if the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The number of nodes on the longest path from the root to a leaf. An empty tree has a
    /// height of 0 and a tree holding a single element has a height of 1.
    pub fn height(&self) -> usize {
        fn height<T>(link: &Link<T>) -> usize {
            link.as_ref()
                .map_or(0, |n| height(&n.left).max(height(&n.right)) + 1)
        }

        height(&self.root)
    }

    /// Drops every element, leaving the tree empty.
    ///
    /// Nodes are freed in postorder using an explicit stack rather than recursion so a tree that
    /// degenerated into a long chain can't overflow the call stack.
    pub fn clear(&mut self) {
        let mut stack: Vec<Box<Node<T>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            if node.left.is_none() && node.right.is_none() {
                drop(node);
                continue;
            }

            // Revisit this node once both subtrees are gone. Left is on top so it goes first.
            let (left, right) = (node.left.take(), node.right.take());
            stack.push(node);
            stack.extend(right);
            stack.extend(left);
        }
        self.len = 0;
    }

    /// An iterator over the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::tree::Tree;
    ///
    /// let tree: Tree<_> = [3, 1, 2].iter().copied().collect();
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [&1, &2, &3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(&self.root);
        iter
    }

    /// Moves every element into `target`, in ascending order starting at slot 0, and leaves the
    /// tree empty. Returns the number of elements moved.
    ///
    /// `target` must have at least [`len`][Self::len] slots and the first `len` of them must be
    /// `None`. Otherwise nothing is moved and an [`ArrayError`] says which requirement failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::{error::ArrayError, tree::Tree};
    ///
    /// let mut tree: Tree<_> = [2, 3, 1].iter().copied().collect();
    ///
    /// let mut too_small = [None, None];
    /// assert_eq!(
    ///     tree.drain_to_array(&mut too_small),
    ///     Err(ArrayError::CapacityTooSmall { needed: 3, available: 2 })
    /// );
    ///
    /// let mut slots = [None; 4];
    /// assert_eq!(tree.drain_to_array(&mut slots), Ok(3));
    /// assert_eq!(slots, [Some(1), Some(2), Some(3), None]);
    /// assert!(tree.is_empty());
    /// ```
    pub fn drain_to_array(&mut self, target: &mut [Option<T>]) -> Result<usize, ArrayError> {
        if target.len() < self.len {
            return Err(ArrayError::CapacityTooSmall {
                needed: self.len,
                available: target.len(),
            });
        }
        if let Some(index) = target[..self.len].iter().position(Option::is_some) {
            return Err(ArrayError::SlotOccupied { index });
        }

        let mut index = 0;
        Self::drain_inorder(self.root.take(), &mut |value| {
            target[index] = Some(value);
            index += 1;
        });
        debug_assert_eq!(index, self.len);
        self.len = 0;

        log::debug!("moved {} elements out of the tree", index);
        Ok(index)
    }

    /// Moves every element into a new `Vec` in ascending order, leaving the tree empty.
    pub fn drain_sorted(&mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len);
        Self::drain_inorder(self.root.take(), &mut |value| sorted.push(value));
        self.len = 0;
        sorted
    }

    /// Takes apart the subtree at `link` in inorder, handing each element to `f`. Each node is
    /// freed as soon as its element has been moved out.
    fn drain_inorder<F>(link: Link<T>, f: &mut F)
    where
        F: FnMut(T),
    {
        if let Some(node) = link {
            let Node { value, left, right } = *node;
            Self::drain_inorder(left, f);
            f(value);
            Self::drain_inorder(right, f);
        }
    }

    /// A [`Display`][fmt::Display] adapter drawing the tree rotated a quarter turn
    /// counter-clockwise: the right subtree is printed above each element and the left subtree
    /// below it. An element at depth `d` is indented by `d + 1` levels of four spaces.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::tree::Tree;
    ///
    /// let tree: Tree<_> = [2, 1, 3].iter().copied().collect();
    /// assert_eq!(
    ///     tree.sideways().to_string(),
    ///     "            3\n        2\n            1\n"
    /// );
    /// ```
    pub fn sideways(&self) -> Sideways<'_, T> {
        Sideways(self)
    }

    /// Prints [`sideways`][Self::sideways] to standard output.
    pub fn display_sideways(&self)
    where
        T: fmt::Display,
    {
        print!("{}", self.sideways());
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    /// Inserts `element` unless an equal element is already present. Returns whether the element
    /// was inserted.
    ///
    /// A rejected duplicate is dropped. So is an element that couldn't be inserted because
    /// memory ran out, which is also logged. Use [`try_insert`][Self::try_insert] to get the
    /// element back in either case.
    pub fn insert(&mut self, element: T) -> bool {
        match self.try_insert(element) {
            Ok(()) => true,
            Err(InsertError::Duplicate(_)) => {
                log::trace!("rejected duplicate element");
                false
            }
            Err(InsertError::Alloc { source, .. }) => {
                log::error!("insert failed: {}", source);
                false
            }
        }
    }

    /// Inserts `element` as a new leaf. If an equal element is already present, or there is no
    /// memory for the new leaf, the tree is left as it was and the element is handed back in the
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::{error::InsertError, tree::Tree};
    ///
    /// let mut tree = Tree::new();
    /// assert!(tree.try_insert(String::from("b")).is_ok());
    ///
    /// match tree.try_insert(String::from("b")) {
    ///     Err(InsertError::Duplicate(rejected)) => assert_eq!(rejected, "b"),
    ///     _ => unreachable!(),
    /// }
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn try_insert(&mut self, element: T) -> Result<(), InsertError<T>> {
        Self::insert_item(&mut self.root, element)?;
        self.len += 1;
        Ok(())
    }

    fn insert_item(link: &mut Link<T>, element: T) -> Result<(), InsertError<T>> {
        match link {
            None => {
                let leaf = try_box(Node::new(element))
                    .map_err(|(node, source)| InsertError::Alloc {
                        element: node.value,
                        source,
                    })?;
                *link = Some(leaf);
                Ok(())
            }
            Some(node) => {
                let result = match element.cmp(&node.value) {
                    Ordering::Less => Self::insert_item(&mut node.left, element),
                    Ordering::Equal => Err(InsertError::Duplicate(element)),
                    Ordering::Greater => Self::insert_item(&mut node.right, element),
                };

                if cfg!(debug_assertions) {
                    if let Some(left) = &node.left {
                        assert!(left.value < node.value);
                    }
                    if let Some(right) = &node.right {
                        assert!(right.value > node.value);
                    }
                }
                result
            }
        }
    }

    /// Finds the element equal to `key`, if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(String::from("pear"));
    ///
    /// assert_eq!(tree.retrieve("pear").map(String::as_str), Some("pear"));
    /// assert_eq!(tree.retrieve("plum"), None);
    /// ```
    pub fn retrieve<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        fn retrieve<'a, T, Q>(link: &'a Link<T>, key: &Q) -> Option<&'a T>
        where
            T: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            let node = link.as_ref()?;
            match key.cmp(node.value.borrow()) {
                Ordering::Less => retrieve(&node.left, key),
                Ordering::Equal => Some(&node.value),
                Ordering::Greater => retrieve(&node.right, key),
            }
        }

        retrieve(&self.root, key)
    }

    /// Returns `true` if an element equal to `key` is in the tree.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.retrieve(key).is_some()
    }

    /// The depth of the element equal to `key`, counting the root as depth 1. Returns 0 when
    /// there is no such element.
    ///
    /// This visits the whole tree (left subtree before right) instead of following the ordering
    /// down a single path.
    pub fn depth<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        fn depth<T, Q>(link: &Link<T>, key: &Q) -> usize
        where
            T: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            let Some(node) = link else {
                return 0;
            };
            let value: &Q = node.value.borrow();
            if value == key {
                return 1;
            }

            match depth(&node.left, key) {
                0 => match depth(&node.right, key) {
                    0 => 0,
                    below => below + 1,
                },
                below => below + 1,
            }
        }

        depth(&self.root, key)
    }

    /// Replaces the contents of the tree with the elements in `slots`, building a balanced tree.
    /// Returns the number of elements taken.
    ///
    /// The elements must form a contiguous run of `Some` slots starting at index 0 and be in
    /// strictly ascending order. The middle element of the run becomes the root, then each half is
    /// built the same way, so `n` elements end up in a tree of height `⌈log₂(n + 1)⌉`. Every slot
    /// whose element was moved into the tree is left `None`.
    ///
    /// The buffer is checked before the tree is touched. If it is refused, both are unchanged.
    /// If memory runs out partway through, the element that couldn't be inserted is put back in
    /// its slot and the tree keeps what was inserted so far.
    ///
    /// # Examples
    ///
    /// ```
    /// use bintree::{error::ArrayError, tree::Tree};
    ///
    /// let mut tree = Tree::new();
    ///
    /// let mut slots = [Some(1), None, Some(3)];
    /// assert_eq!(tree.build_from_array(&mut slots), Err(ArrayError::Gap { index: 2 }));
    ///
    /// let mut slots = [Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)];
    /// assert_eq!(tree.build_from_array(&mut slots), Ok(7));
    /// assert_eq!(tree.depth(&4), 1);
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn build_from_array(&mut self, slots: &mut [Option<T>]) -> Result<usize, ArrayError> {
        let run = slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(slots.len());
        if let Some(offset) = slots[run..].iter().position(Option::is_some) {
            return Err(ArrayError::Gap { index: run + offset });
        }
        if let Some(offset) = slots[..run].windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ArrayError::Unsorted { index: offset + 1 });
        }

        self.clear();
        self.bisect_build(slots, 0, run)?;

        log::debug!(
            "built a tree of {} elements with height {}",
            self.len,
            self.height()
        );
        Ok(run)
    }

    /// Inserts the middle element of `slots[low..high]`, then builds each half beneath it.
    fn bisect_build(
        &mut self,
        slots: &mut [Option<T>],
        low: usize,
        high: usize,
    ) -> Result<(), AllocError> {
        if low >= high {
            return Ok(());
        }

        let mid = low + (high - low - 1) / 2;
        if let Some(element) = slots[mid].take() {
            match self.try_insert(element) {
                Ok(()) => {}
                Err(InsertError::Alloc { element, source }) => {
                    slots[mid] = Some(element);
                    return Err(source);
                }
                // The run was checked to be strictly ascending so this can't happen.
                Err(InsertError::Duplicate(element)) => slots[mid] = Some(element),
            }
        }

        self.bisect_build(slots, low, mid)?;
        self.bisect_build(slots, mid + 1, high)
    }
}

impl<T> Tree<T>
where
    T: Clone,
{
    /// Makes a deep copy of the tree with the same shape and cloned elements.
    ///
    /// If memory runs out, the partial copy is dropped and `self` is untouched.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        let mut copy = Self::new();
        copy.try_clone_from(self)?;
        Ok(copy)
    }

    /// Replaces the contents of `self` with a deep copy of `source`.
    ///
    /// If memory runs out, `self` is left empty.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), AllocError> {
        self.clear();
        self.root = Self::copy_tree(&source.root)?;
        self.len = source.len;
        Ok(())
    }

    /// Copies the subtree at `link` in preorder.
    fn copy_tree(link: &Link<T>) -> Result<Link<T>, AllocError> {
        let Some(node) = link else {
            return Ok(None);
        };

        let mut copy = try_box(Node::new(node.value.clone())).map_err(|(_, err)| err)?;
        copy.left = Self::copy_tree(&node.left)?;
        copy.right = Self::copy_tree(&node.right)?;
        Ok(Some(copy))
    }
}

/// Running out of memory is handled the way the standard collections handle it: the failure is
/// passed to [`handle_alloc_error`][alloc::handle_alloc_error]. Use
/// [`try_clone`][Tree::try_clone] to handle it yourself.
impl<T> Clone for Tree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| {
            log::error!("tree copy failed: {}", err);
            alloc::handle_alloc_error(err.layout())
        })
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.try_clone_from(source) {
            log::error!("tree copy failed: {}", err);
            alloc::handle_alloc_error(err.layout());
        }
    }
}

/// Two trees are equal when they have the same shape and equal elements in the same positions.
/// Trees holding the same elements but built in a different order are usually not equal.
impl<T> PartialEq for Tree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && same_shape_and_values(&self.root, &other.root)
    }
}

impl<T> Eq for Tree<T> where T: Eq {}

fn same_shape_and_values<T>(lhs: &Link<T>, rhs: &Link<T>) -> bool
where
    T: PartialEq,
{
    match (lhs, rhs) {
        (None, None) => true,
        (Some(l), Some(r)) => {
            l.value == r.value
                && same_shape_and_values(&l.left, &r.left)
                && same_shape_and_values(&l.right, &r.right)
        }
        _ => false,
    }
}

/// Writes the elements in ascending order, each preceded by a space, followed by a newline.
impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self {
            write!(f, " {}", value)?;
        }
        writeln!(f)
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    /// Inserts each element in turn. Duplicates are dropped.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over a [`Tree`], returned by [`Tree::iter`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut link: &'a Link<T>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Sideways rendering of a [`Tree`], returned by [`Tree::sideways`].
pub struct Sideways<'a, T>(&'a Tree<T>);

impl<T> fmt::Display for Sideways<'_, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn sideways<T: fmt::Display>(
            f: &mut fmt::Formatter<'_>,
            link: &Link<T>,
            level: usize,
        ) -> fmt::Result {
            let Some(node) = link else {
                return Ok(());
            };

            let level = level + 1;
            sideways(f, &node.right, level)?;
            for _ in 0..=level {
                f.write_str(INDENT)?;
            }
            writeln!(f, "{}", node.value)?;
            sideways(f, &node.left, level)
        }

        sideways(f, &self.0.root, 0)
    }
}

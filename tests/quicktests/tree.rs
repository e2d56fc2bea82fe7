use bintree::tree::Tree;

use quickcheck_macros::quickcheck;

use std::collections::BTreeSet;

use crate::Op;

/// Applies a set of operations to a tree and a set so that afterwards
/// both should hold the same elements.
fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, set: &mut BTreeSet<T>)
where
    T: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(x) => {
                tree.insert(x.clone());
                set.insert(x.clone());
            }
            Op::Rebalance => {
                let mut slots = vec![None; tree.len()];
                tree.drain_to_array(&mut slots).unwrap();
                tree.build_from_array(&mut slots).unwrap();
            }
        }
    }
}

/// `⌈log₂(n + 1)⌉`
fn balanced_height(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    tree.len() == set.len() && tree.iter().eq(set.iter())
}

#[quickcheck]
fn inorder_is_strictly_ascending(xs: Vec<i32>) -> bool {
    let tree: Tree<_> = xs.into_iter().collect();
    let sorted: Vec<_> = tree.iter().collect();

    sorted.windows(2).all(|pair| pair[0] < pair[1])
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    xs.iter().all(|x| tree.retrieve(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let added: BTreeSet<_> = xs.into_iter().collect();

    nots.iter()
        .filter(|x| !added.contains(*x))
        .all(|x| tree.retrieve(x).is_none() && tree.depth(x) == 0)
}

#[quickcheck]
fn duplicate_insert_changes_nothing(xs: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let before = tree.clone();

    xs.iter().all(|x| !tree.insert(*x)) && tree == before
}

#[quickcheck]
fn round_trip_keeps_elements_and_balances(xs: Vec<i16>) -> bool {
    let mut tree: Tree<_> = xs.into_iter().collect();
    let elements: Vec<_> = tree.iter().copied().collect();

    let mut slots = vec![None; tree.len()];
    let moved = tree.drain_to_array(&mut slots).unwrap();
    let emptied = tree.is_empty();
    let built = tree.build_from_array(&mut slots).unwrap();

    emptied
        && moved == elements.len()
        && built == elements.len()
        && tree.iter().copied().eq(elements.iter().copied())
        && tree.height() <= balanced_height(elements.len())
        && slots.iter().all(Option::is_none)
}

#[quickcheck]
fn copy_is_equal_and_independent(xs: Vec<i8>, extra: i8) -> bool {
    let original: Tree<_> = xs.iter().copied().collect();
    let mut copy = original.clone();
    let equal_before = copy == original && original == copy;

    let inserted = copy.insert(extra);
    let independent = !inserted || (copy != original && !original.contains(&extra));

    equal_before && independent
}

#[quickcheck]
fn different_sizes_are_never_equal(xs: Vec<i8>, extra: i8) -> bool {
    let a: Tree<_> = xs.iter().copied().collect();
    let mut b: Tree<_> = xs.iter().copied().collect();

    a == b && (!b.insert(extra) || a != b)
}

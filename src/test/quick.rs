use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// a tree in a quicktest.
#[derive(Clone, Debug)]
pub(crate) enum Op<T> {
    /// Insert the element into the tree
    Insert(T),
    /// Look the element up
    Retrieve(T),
    /// Find how deep the element is
    Depth(T),
    /// Export the tree to an array and build it back up balanced
    Rebalance,
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation. Inserts are
    /// weighted up so trees get big enough to be interesting.
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 0, 1, 2, 3]).unwrap() {
            0 => Op::Insert(T::arbitrary(g)),
            1 => Op::Retrieve(T::arbitrary(g)),
            2 => Op::Depth(T::arbitrary(g)),
            3 => Op::Rebalance,
            _ => unreachable!(),
        }
    }
}

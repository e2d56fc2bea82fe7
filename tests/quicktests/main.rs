use quickcheck::{Arbitrary, Gen};

mod tree;

/// Things to do to a tree in a quicktest.
#[derive(Copy, Clone, Debug)]
pub enum Op<T> {
    /// Insert the element into the tree
    Insert(T),
    /// Flatten the tree into an array and rebuild it from that array
    Rebalance,
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 0, 1]).unwrap() {
            0 => Op::Insert(T::arbitrary(g)),
            1 => Op::Rebalance,
            _ => unreachable!(),
        }
    }
}

//! Sorted joins.
//!
//! The N-ary joins (`full`, `inner`, `left`) read any number of inputs of the
//! same element type, each sorted on a key, and group the heads that share a
//! key into one `Joined` record per round. The pairwise joins read exactly
//! two inputs that may carry different element types.

pub mod full;
pub mod inner;
pub mod left;
pub mod pairwise;

pub use full::{full_join, full_join_by, FullJoin};
pub use inner::{inner_join, inner_join_by, InnerJoin};
pub use left::{left_join, left_join_by, LeftJoin};
pub use pairwise::{PairInnerJoin, PairLeftJoin};

/// One output record of an N-ary join: the shared key and one value slot per
/// input, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined<K, V> {
    pub key: K,
    pub values: Vec<V>,
}

impl<K, V> Joined<K, Option<V>> {
    /// Number of inputs that contributed a value.
    pub fn present(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

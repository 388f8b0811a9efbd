//! K-way merge of individually sorted inputs.

use seqflow_core::prelude::*;

use crate::sorted::SortedInputs;

/// Emits the smallest buffered head each round. Exhausted inputs drop out;
/// equal heads are emitted lowest input index first.
pub struct Merge<P: Provider, K, KF, C> {
    inputs: SortedInputs<P, K, KF, C>,
}

/// Merge on the natural order of the elements.
pub fn merge<P>(inputs: Vec<P>) -> Merge<P, P::Item, fn(&P::Item) -> P::Item, Natural>
where
    P: Provider,
    P::Item: Ord + Clone,
{
    let key: fn(&P::Item) -> P::Item = Clone::clone;
    Merge {
        inputs: SortedInputs::new(inputs, key, Natural),
    }
}

/// Merge on a key extracted from each element.
pub fn merge_by_key<P, K, KF>(inputs: Vec<P>, key: KF) -> Merge<P, K, KF, Natural>
where
    P: Provider,
    K: Ord + Clone,
    KF: FnMut(&P::Item) -> K,
{
    Merge {
        inputs: SortedInputs::new(inputs, key, Natural),
    }
}

/// Merge on an extracted key ordered by a custom comparator.
pub fn merge_by<P, K, KF, C>(inputs: Vec<P>, key: KF, cmp: C) -> Merge<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    Merge {
        inputs: SortedInputs::new(inputs, key, cmp),
    }
}

impl<P, K, KF, C> Lifecycle for Merge<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.inputs.open(ctx)
    }

    fn close(&mut self) {
        self.inputs.close()
    }
}

impl<P, K, KF, C> Provider for Merge<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        self.inputs.refill_all(ctx)?;
        let Some(index) = self.inputs.min_index() else {
            return Ok(None);
        };
        Ok(self.inputs.take(index).map(|(_, item)| item))
    }
}

impl<P, K, KF, C> Rewindable for Merge<P, K, KF, C>
where
    P: Rewindable,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
}

//! Full outer join: one record per distinct key seen on any input.

use seqflow_core::prelude::*;

use super::Joined;
use crate::sorted::SortedInputs;

pub struct FullJoin<P: Provider, K, KF, C> {
    inputs: SortedInputs<P, K, KF, C>,
}

pub fn full_join<P, K, KF>(inputs: Vec<P>, key: KF) -> FullJoin<P, K, KF, Natural>
where
    P: Provider,
    K: Ord + Clone,
    KF: FnMut(&P::Item) -> K,
{
    FullJoin {
        inputs: SortedInputs::new(inputs, key, Natural),
    }
}

pub fn full_join_by<P, K, KF, C>(inputs: Vec<P>, key: KF, cmp: C) -> FullJoin<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    FullJoin {
        inputs: SortedInputs::new(inputs, key, cmp),
    }
}

impl<P, K, KF, C> Lifecycle for FullJoin<P, K, KF, C>
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

impl<P, K, KF, C> Provider for FullJoin<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    type Item = Joined<K, Option<P::Item>>;

    fn emit(&mut self, ctx: &Context) -> Result<Option<Self::Item>> {
        self.inputs.refill_all(ctx)?;
        let Some(min) = self.inputs.min_index() else {
            return Ok(None);
        };
        let Some((key, first)) = self.inputs.take(min) else {
            return Ok(None);
        };

        let mut values = Vec::with_capacity(self.inputs.len());
        values.resize_with(min, || None);
        values.push(Some(first));
        for index in min + 1..self.inputs.len() {
            let matches = self
                .inputs
                .head_key(index)
                .is_some_and(|k| self.inputs.compare(k, &key).is_eq());
            values.push(if matches {
                self.inputs.take(index).map(|(_, item)| item)
            } else {
                None
            });
        }
        Ok(Some(Joined { key, values }))
    }
}

impl<P, K, KF, C> Rewindable for FullJoin<P, K, KF, C>
where
    P: Rewindable,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
}

//! Left join: one record per element of the primary input.

use seqflow_core::prelude::*;

use super::Joined;
use crate::sorted::SortedInputs;

/// The primary input sets the cadence. For each primary element, every
/// secondary input is advanced past smaller keys and contributes a copy of
/// its head only if that head has the primary element's key. A matched
/// secondary head stays buffered, so primary elements with duplicate keys
/// all see it.
pub struct LeftJoin<P: Provider, K, KF, C> {
    inputs: SortedInputs<P, K, KF, C>,
    primary: usize,
}

pub fn left_join<P, K, KF>(inputs: Vec<P>, primary: usize, key: KF) -> LeftJoin<P, K, KF, Natural>
where
    P: Provider,
    P::Item: Clone,
    K: Ord + Clone,
    KF: FnMut(&P::Item) -> K,
{
    LeftJoin {
        inputs: SortedInputs::new(inputs, key, Natural),
        primary,
    }
}

pub fn left_join_by<P, K, KF, C>(
    inputs: Vec<P>,
    primary: usize,
    key: KF,
    cmp: C,
) -> LeftJoin<P, K, KF, C>
where
    P: Provider,
    P::Item: Clone,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    LeftJoin {
        inputs: SortedInputs::new(inputs, key, cmp),
        primary,
    }
}

impl<P, K, KF, C> LeftJoin<P, K, KF, C>
where
    P: Provider,
    P::Item: Clone,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    /// Advance secondary `index` up to `key`; returns its head if it matches.
    fn seek(&mut self, index: usize, key: &K, ctx: &Context) -> Result<Option<P::Item>> {
        loop {
            ctx.check()?;
            self.inputs.refill(index, ctx)?;
            let Some(head) = self.inputs.head_key(index) else {
                return Ok(None);
            };
            match self.inputs.compare(head, key) {
                std::cmp::Ordering::Less => {
                    self.inputs.take(index);
                }
                std::cmp::Ordering::Equal => return Ok(self.inputs.head_value(index).cloned()),
                std::cmp::Ordering::Greater => return Ok(None),
            }
        }
    }
}

impl<P, K, KF, C> Lifecycle for LeftJoin<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        if !self.inputs.is_empty() && self.primary >= self.inputs.len() {
            return Err(Error::config(format!(
                "primary input {} out of range for {} inputs",
                self.primary,
                self.inputs.len()
            )));
        }
        self.inputs.open(ctx)
    }

    fn close(&mut self) {
        self.inputs.close()
    }
}

impl<P, K, KF, C> Provider for LeftJoin<P, K, KF, C>
where
    P: Provider,
    P::Item: Clone,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    type Item = Joined<K, Option<P::Item>>;

    fn emit(&mut self, ctx: &Context) -> Result<Option<Self::Item>> {
        self.inputs.refill(self.primary, ctx)?;
        let Some((key, item)) = self.inputs.take(self.primary) else {
            return Ok(None);
        };

        let n = self.inputs.len();
        let mut values = Vec::with_capacity(n);
        let mut item = Some(item);
        for index in 0..n {
            if index == self.primary {
                values.push(item.take());
            } else {
                values.push(self.seek(index, &key, ctx)?);
            }
        }
        Ok(Some(Joined { key, values }))
    }
}

impl<P, K, KF, C> Rewindable for LeftJoin<P, K, KF, C>
where
    P: Rewindable,
    P::Item: Clone,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
}

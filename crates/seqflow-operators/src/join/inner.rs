//! Inner join: keys present on every input.

use seqflow_core::prelude::*;

use super::Joined;
use crate::sorted::SortedInputs;

/// Chases the largest head: inputs strictly behind it are advanced until
/// every head agrees. The join ends as soon as any input is exhausted.
pub struct InnerJoin<P: Provider, K, KF, C> {
    inputs: SortedInputs<P, K, KF, C>,
    done: bool,
}

pub fn inner_join<P, K, KF>(inputs: Vec<P>, key: KF) -> InnerJoin<P, K, KF, Natural>
where
    P: Provider,
    K: Ord + Clone,
    KF: FnMut(&P::Item) -> K,
{
    InnerJoin {
        inputs: SortedInputs::new(inputs, key, Natural),
        done: false,
    }
}

pub fn inner_join_by<P, K, KF, C>(inputs: Vec<P>, key: KF, cmp: C) -> InnerJoin<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    InnerJoin {
        inputs: SortedInputs::new(inputs, key, cmp),
        done: false,
    }
}

impl<P, K, KF, C> Lifecycle for InnerJoin<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.done = false;
        self.inputs.open(ctx)
    }

    fn close(&mut self) {
        self.inputs.close()
    }
}

impl<P, K, KF, C> Provider for InnerJoin<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    type Item = Joined<K, P::Item>;

    fn emit(&mut self, ctx: &Context) -> Result<Option<Self::Item>> {
        loop {
            ctx.check()?;
            if self.done {
                return Ok(None);
            }
            self.inputs.refill_all(ctx)?;
            if self.inputs.any_exhausted() {
                self.done = true;
                return Ok(None);
            }
            let Some(max) = self.inputs.max_index() else {
                self.done = true;
                return Ok(None);
            };
            let Some(key) = self.inputs.head_key(max).cloned() else {
                continue;
            };

            let n = self.inputs.len();
            let mut aligned = true;
            for index in 0..n {
                let behind = self
                    .inputs
                    .head_key(index)
                    .is_some_and(|k| self.inputs.compare(k, &key).is_lt());
                if behind {
                    aligned = false;
                    self.inputs.take(index);
                }
            }
            if !aligned {
                continue;
            }

            let values: Vec<P::Item> = (0..n)
                .filter_map(|index| self.inputs.take(index).map(|(_, item)| item))
                .collect();
            return Ok(Some(Joined { key, values }));
        }
    }
}

impl<P, K, KF, C> Rewindable for InnerJoin<P, K, KF, C>
where
    P: Rewindable,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::drain;
    use seqflow_sources::{from_iter, from_vec};

    #[test]
    fn keeps_keys_common_to_all_inputs() {
        let seq = inner_join(
            vec![
                from_vec(vec![1, 2, 3, 5, 8]),
                from_vec(vec![2, 3, 4, 8]),
                from_vec(vec![0, 3, 8, 9]),
            ],
            |x: &i32| *x,
        );
        let keys: Vec<i32> = drain(seq).unwrap().into_iter().map(|j| j.key).collect();
        assert_eq!(keys, vec![3, 8]);
    }

    #[test]
    fn values_follow_input_order() {
        let seq = inner_join(
            vec![from_vec(vec![(1, "left")]), from_vec(vec![(1, "right")])],
            |pair: &(i32, &str)| pair.0,
        );
        let out = drain(seq).unwrap();
        assert_eq!(out[0].values, vec![(1, "left"), (1, "right")]);
    }

    #[test]
    fn stops_when_any_input_ends() {
        // The unbounded input would never end on its own.
        let seq = inner_join(
            vec![Sequence::new(from_iter(|| 0..)), Sequence::new(from_vec(vec![4, 6]))],
            |x: &i32| *x,
        );
        let keys: Vec<i32> = drain(seq).unwrap().into_iter().map(|j| j.key).collect();
        assert_eq!(keys, vec![4, 6]);
    }
}

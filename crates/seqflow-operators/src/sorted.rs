//! Cursors over sorted inputs shared by merge and the join family.
//!
//! Each input gets one head slot holding the next pulled element and its
//! key. Sortedness is checked lazily: every newly pulled key is compared with
//! the last key accepted from the same input, and a decrease fails with
//! `Error::Unsorted`.

use std::cmp::Ordering;

use seqflow_core::panic::catch;
use seqflow_core::prelude::*;

/// Lookahead slot for a single sorted input.
#[derive(Debug)]
pub struct HeadSlot<K, T> {
    head: Option<(K, T)>,
    last: Option<K>,
    exhausted: bool,
}

impl<K, T> Default for HeadSlot<K, T> {
    fn default() -> Self {
        Self {
            head: None,
            last: None,
            exhausted: false,
        }
    }
}

impl<K: Clone, T> HeadSlot<K, T> {
    /// Pull the next element from `input` unless a head is already buffered
    /// or the input has ended. Errors carry `index` as the input position.
    pub fn refill<P, KF, C>(
        &mut self,
        index: usize,
        input: &mut P,
        ctx: &Context,
        key: &mut KF,
        cmp: &C,
    ) -> Result<()>
    where
        P: Provider<Item = T> + ?Sized,
        KF: FnMut(&T) -> K,
        C: Comparator<K>,
    {
        if self.head.is_some() || self.exhausted {
            return Ok(());
        }
        let Some(item) = input.emit(ctx).map_err(|e| e.at_input(index))? else {
            self.exhausted = true;
            return Ok(());
        };
        let k = catch("key", || key(&item))?;
        if let Some(last) = &self.last {
            if cmp.compare(&k, last) == Ordering::Less {
                tracing::warn!(input = index, "sorted input decreased");
                return Err(Error::Unsorted { input: index });
            }
        }
        self.last = Some(k.clone());
        self.head = Some((k, item));
        Ok(())
    }

    pub fn key(&self) -> Option<&K> {
        self.head.as_ref().map(|(k, _)| k)
    }

    pub fn value(&self) -> Option<&T> {
        self.head.as_ref().map(|(_, v)| v)
    }

    pub fn take(&mut self) -> Option<(K, T)> {
        self.head.take()
    }

    /// No head buffered and nothing more to pull.
    pub fn is_exhausted(&self) -> bool {
        self.head.is_none() && self.exhausted
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// N sorted inputs with one head slot each.
pub struct SortedInputs<P: Provider, K, KF, C> {
    inputs: LifecycleStack<P>,
    slots: Vec<HeadSlot<K, P::Item>>,
    key: KF,
    cmp: C,
}

impl<P, K, KF, C> SortedInputs<P, K, KF, C>
where
    P: Provider,
    K: Clone,
    KF: FnMut(&P::Item) -> K,
    C: Comparator<K>,
{
    pub fn new(inputs: Vec<P>, key: KF, cmp: C) -> Self {
        Self {
            inputs: LifecycleStack::new(inputs),
            slots: Vec::new(),
            key,
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn open(&mut self, ctx: &Context) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::config("at least one sorted input is required"));
        }
        self.slots = (0..self.inputs.len()).map(|_| HeadSlot::default()).collect();
        self.inputs.open(ctx)
    }

    pub fn close(&mut self) {
        self.inputs.close();
        self.slots.clear();
    }

    pub fn refill(&mut self, index: usize, ctx: &Context) -> Result<()> {
        let (Some(slot), Some(input)) = (self.slots.get_mut(index), self.inputs.get_mut(index)) else {
            return Ok(());
        };
        slot.refill(index, input, ctx, &mut self.key, &self.cmp)
    }

    pub fn refill_all(&mut self, ctx: &Context) -> Result<()> {
        for index in 0..self.slots.len() {
            self.refill(index, ctx)?;
        }
        Ok(())
    }

    pub fn head_key(&self, index: usize) -> Option<&K> {
        self.slots.get(index).and_then(HeadSlot::key)
    }

    pub fn head_value(&self, index: usize) -> Option<&P::Item> {
        self.slots.get(index).and_then(HeadSlot::value)
    }

    pub fn take(&mut self, index: usize) -> Option<(K, P::Item)> {
        self.slots.get_mut(index).and_then(HeadSlot::take)
    }

    pub fn is_exhausted(&self, index: usize) -> bool {
        self.slots.get(index).map_or(true, HeadSlot::is_exhausted)
    }

    pub fn any_exhausted(&self) -> bool {
        self.slots.iter().any(HeadSlot::is_exhausted)
    }

    pub fn compare(&self, a: &K, b: &K) -> Ordering {
        self.cmp.compare(a, b)
    }

    /// Input holding the smallest head; ties go to the lowest index.
    pub fn min_index(&self) -> Option<usize> {
        self.extreme(Ordering::Less)
    }

    /// Input holding the largest head; ties go to the lowest index.
    pub fn max_index(&self) -> Option<usize> {
        self.extreme(Ordering::Greater)
    }

    fn extreme(&self, wanted: Ordering) -> Option<usize> {
        let mut best: Option<(usize, &K)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(k) = slot.key() else { continue };
            match best {
                Some((_, current)) if self.cmp.compare(k, current) != wanted => {}
                _ => best = Some((index, k)),
            }
        }
        best.map(|(index, _)| index)
    }
}

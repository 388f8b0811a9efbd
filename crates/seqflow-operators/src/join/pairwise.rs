//! Two-pointer joins over a left and a right input.
//!
//! Each side keeps a single lookahead slot and the side with the smaller key
//! advances. The sides may carry different element types as long as they
//! share a key type.
//!
//! Duplicate keys: a match consumes only the left element and clones the
//! right one, so every left element pairs with the first right element that
//! has its key. Further right elements with that key are skipped once the
//! left side moves past it. Joining `[1, 1]` with `[1, 1]` therefore yields
//! two pairs, not four.

use std::cmp::Ordering;

use seqflow_core::prelude::*;

use crate::sorted::HeadSlot;

struct Sides<L: Provider, R: Provider, K, KL, KR, C> {
    left: L,
    right: R,
    left_key: KL,
    right_key: KR,
    cmp: C,
    left_head: HeadSlot<K, L::Item>,
    right_head: HeadSlot<K, R::Item>,
    left_open: bool,
    right_open: bool,
}

impl<L, R, K, KL, KR, C> Sides<L, R, K, KL, KR, C>
where
    L: Provider,
    R: Provider,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
    fn new(left: L, right: R, left_key: KL, right_key: KR, cmp: C) -> Self {
        Self {
            left,
            right,
            left_key,
            right_key,
            cmp,
            left_head: HeadSlot::default(),
            right_head: HeadSlot::default(),
            left_open: false,
            right_open: false,
        }
    }

    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.close();
        self.left.open(ctx).map_err(|e| e.at_open(0))?;
        self.left_open = true;
        if let Err(err) = self.right.open(ctx) {
            self.close();
            return Err(err.at_open(1));
        }
        self.right_open = true;
        Ok(())
    }

    fn close(&mut self) {
        if std::mem::take(&mut self.right_open) {
            self.right.close();
        }
        if std::mem::take(&mut self.left_open) {
            self.left.close();
        }
        self.left_head.reset();
        self.right_head.reset();
    }

    fn refill_left(&mut self, ctx: &Context) -> Result<()> {
        self.left_head
            .refill(0, &mut self.left, ctx, &mut self.left_key, &self.cmp)
    }

    fn refill_right(&mut self, ctx: &Context) -> Result<()> {
        self.right_head
            .refill(1, &mut self.right, ctx, &mut self.right_key, &self.cmp)
    }

    /// Ordering of the two buffered heads, if both sides have one.
    fn order(&self) -> Option<Ordering> {
        let (l, r) = (self.left_head.key()?, self.right_head.key()?);
        Some(self.cmp.compare(l, r))
    }

    fn take_left(&mut self) -> Option<L::Item> {
        self.left_head.take().map(|(_, item)| item)
    }
}

/// Inner variant: emits `(left, right)` for every left element whose key
/// appears on the right; ends when either side is exhausted.
pub struct PairInnerJoin<L: Provider, R: Provider, K, KL, KR, C> {
    sides: Sides<L, R, K, KL, KR, C>,
}

impl<L, R, K, KL, KR> PairInnerJoin<L, R, K, KL, KR, Natural>
where
    L: Provider,
    R: Provider,
    K: Ord + Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
{
    pub fn new(left: L, right: R, left_key: KL, right_key: KR) -> Self {
        Self::with_comparator(left, right, left_key, right_key, Natural)
    }
}

impl<L, R, K, KL, KR, C> PairInnerJoin<L, R, K, KL, KR, C>
where
    L: Provider,
    R: Provider,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
    pub fn with_comparator(left: L, right: R, left_key: KL, right_key: KR, cmp: C) -> Self {
        Self {
            sides: Sides::new(left, right, left_key, right_key, cmp),
        }
    }
}

impl<L, R, K, KL, KR, C> Lifecycle for PairInnerJoin<L, R, K, KL, KR, C>
where
    L: Provider,
    R: Provider,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.sides.open(ctx)
    }

    fn close(&mut self) {
        self.sides.close()
    }
}

impl<L, R, K, KL, KR, C> Provider for PairInnerJoin<L, R, K, KL, KR, C>
where
    L: Provider,
    R: Provider,
    R::Item: Clone,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
    type Item = (L::Item, R::Item);

    fn emit(&mut self, ctx: &Context) -> Result<Option<Self::Item>> {
        loop {
            ctx.check()?;
            self.sides.refill_left(ctx)?;
            self.sides.refill_right(ctx)?;
            let Some(order) = self.sides.order() else {
                return Ok(None);
            };
            match order {
                Ordering::Less => {
                    self.sides.left_head.take();
                }
                Ordering::Greater => {
                    self.sides.right_head.take();
                }
                Ordering::Equal => {
                    let right = self.sides.right_head.value().cloned();
                    let left = self.sides.take_left();
                    if let (Some(l), Some(r)) = (left, right) {
                        return Ok(Some((l, r)));
                    }
                }
            }
        }
    }
}

impl<L, R, K, KL, KR, C> Rewindable for PairInnerJoin<L, R, K, KL, KR, C>
where
    L: Rewindable,
    R: Rewindable,
    R::Item: Clone,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
}

/// Left variant: exactly one `(left, Option<right>)` per left element.
pub struct PairLeftJoin<L: Provider, R: Provider, K, KL, KR, C> {
    sides: Sides<L, R, K, KL, KR, C>,
}

impl<L, R, K, KL, KR> PairLeftJoin<L, R, K, KL, KR, Natural>
where
    L: Provider,
    R: Provider,
    K: Ord + Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
{
    pub fn new(left: L, right: R, left_key: KL, right_key: KR) -> Self {
        Self::with_comparator(left, right, left_key, right_key, Natural)
    }
}

impl<L, R, K, KL, KR, C> PairLeftJoin<L, R, K, KL, KR, C>
where
    L: Provider,
    R: Provider,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
    pub fn with_comparator(left: L, right: R, left_key: KL, right_key: KR, cmp: C) -> Self {
        Self {
            sides: Sides::new(left, right, left_key, right_key, cmp),
        }
    }
}

impl<L, R, K, KL, KR, C> Lifecycle for PairLeftJoin<L, R, K, KL, KR, C>
where
    L: Provider,
    R: Provider,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.sides.open(ctx)
    }

    fn close(&mut self) {
        self.sides.close()
    }
}

impl<L, R, K, KL, KR, C> Provider for PairLeftJoin<L, R, K, KL, KR, C>
where
    L: Provider,
    R: Provider,
    R::Item: Clone,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
    type Item = (L::Item, Option<R::Item>);

    fn emit(&mut self, ctx: &Context) -> Result<Option<Self::Item>> {
        loop {
            ctx.check()?;
            self.sides.refill_left(ctx)?;
            if self.sides.left_head.key().is_none() {
                return Ok(None);
            }
            self.sides.refill_right(ctx)?;
            // Equality is re-checked for every left element, so duplicate
            // left keys all see the same right head.
            let matched = match self.sides.order() {
                None | Some(Ordering::Less) => None,
                Some(Ordering::Equal) => self.sides.right_head.value().cloned(),
                Some(Ordering::Greater) => {
                    self.sides.right_head.take();
                    continue;
                }
            };
            return Ok(self.sides.take_left().map(|left| (left, matched)));
        }
    }
}

impl<L, R, K, KL, KR, C> Rewindable for PairLeftJoin<L, R, K, KL, KR, C>
where
    L: Rewindable,
    R: Rewindable,
    R::Item: Clone,
    K: Clone,
    KL: FnMut(&L::Item) -> K,
    KR: FnMut(&R::Item) -> K,
    C: Comparator<K>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::drain;
    use seqflow_sources::{from_fn, from_vec};

    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        customer: u32,
        total: f64,
    }

    fn customers() -> seqflow_sources::VecSource<(u32, &'static str)> {
        from_vec(vec![(1, "ada"), (2, "bob"), (4, "eve")])
    }

    fn orders() -> seqflow_sources::VecSource<Order> {
        from_vec(vec![
            Order { customer: 1, total: 9.5 },
            Order { customer: 3, total: 1.0 },
            Order { customer: 4, total: 2.0 },
        ])
    }

    #[test]
    fn inner_join_of_different_types() {
        let seq = PairInnerJoin::new(customers(), orders(), |c: &(u32, &str)| c.0, |o: &Order| o.customer);
        let names: Vec<&str> = drain(seq).unwrap().into_iter().map(|(c, _)| c.1).collect();
        assert_eq!(names, vec!["ada", "eve"]);
    }

    #[test]
    fn left_join_keeps_unmatched_left() {
        let seq = PairLeftJoin::new(customers(), orders(), |c: &(u32, &str)| c.0, |o: &Order| o.customer);
        let out = drain(seq).unwrap();
        let totals: Vec<Option<f64>> = out.iter().map(|(_, o)| o.as_ref().map(|o| o.total)).collect();
        assert_eq!(totals, vec![Some(9.5), None, Some(2.0)]);
    }

    #[test]
    fn duplicate_left_keys_share_one_right_match() {
        let seq = PairLeftJoin::new(
            from_vec(vec![1, 1, 2]),
            from_vec(vec![(1, 'x'), (1, 'y'), (2, 'z')]),
            |l: &i32| *l,
            |r: &(i32, char)| r.0,
        );
        let out = drain(seq).unwrap();
        assert_eq!(out, vec![(1, Some((1, 'x'))), (1, Some((1, 'x'))), (2, Some((2, 'z')))]);
    }

    #[test]
    fn duplicate_keys_on_both_sides_pair_each_left_once() {
        let seq = PairInnerJoin::new(from_vec(vec![1, 1]), from_vec(vec![1, 1]), |l: &i32| *l, |r: &i32| *r);
        assert_eq!(drain(seq).unwrap(), vec![(1, 1), (1, 1)]);
    }

    #[test]
    fn inner_join_reports_decreasing_left() {
        let ctx = Context::new();
        let mut seq = PairInnerJoin::new(from_vec(vec![1, 3, 2]), from_vec(vec![1, 2, 3]), |l: &i32| *l, |r: &i32| *r);
        seq.open(&ctx).unwrap();
        assert_eq!(seq.emit(&ctx).unwrap(), Some((1, 1)));
        assert_eq!(seq.emit(&ctx).unwrap(), Some((3, 3)));
        assert!(matches!(seq.emit(&ctx), Err(Error::Unsorted { input: 0 })));
        seq.close();
    }

    #[test]
    fn left_join_reports_decreasing_right() {
        let ctx = Context::new();
        let mut seq = PairLeftJoin::new(from_vec(vec![1, 2, 3]), from_vec(vec![2, 1]), |l: &i32| *l, |r: &i32| *r);
        seq.open(&ctx).unwrap();
        assert_eq!(seq.emit(&ctx).unwrap(), Some((1, None)));
        assert_eq!(seq.emit(&ctx).unwrap(), Some((2, Some(2))));
        assert!(matches!(seq.emit(&ctx), Err(Error::Unsorted { input: 1 })));
        seq.close();
    }

    #[test]
    fn right_open_failure_closes_left() {
        let closed = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = std::sync::Arc::clone(&closed);
        let left = crate::attach::WithLifecycle::new(from_vec(vec![1])).attach(FnLifecycle::new(
            |_: &Context| Ok(()),
            move || flag.store(true, std::sync::atomic::Ordering::SeqCst),
        ));
        let right = crate::attach::WithLifecycle::new(from_fn(|_: &Context| Ok(Some(1))))
            .attach(FnLifecycle::new(|_: &Context| Err(Error::msg("no right side")), || {}));
        let seq = PairInnerJoin::new(left, right, |l: &i32| *l, |r: &i32| *r);
        let err = drain(seq).unwrap_err();
        assert!(matches!(err, Error::Open { index: 1, .. }));
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    }
}

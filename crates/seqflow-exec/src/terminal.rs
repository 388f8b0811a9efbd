//! Terminal operations: drive a sequence to completion.
//!
//! Every terminal opens the sequence, pulls until the end-of-sequence
//! sentinel, an error, or an early stop, and closes the sequence exactly once
//! on every path (a drop guard owns the close). Panics raised by `emit` or by
//! the caller's callback are returned as `Error::Panic`.

use std::ops::ControlFlow;

use seqflow_core::panic::catch_result;
use seqflow_core::prelude::*;
use seqflow_operators::sample::{rng_from_seed, Reservoir};

struct CloseGuard<'a, P: Lifecycle>(&'a mut P);

impl<P: Lifecycle> Drop for CloseGuard<'_, P> {
    fn drop(&mut self) {
        self.0.close();
    }
}

fn drive<P, F>(mut seq: P, ctx: &Context, mut f: F) -> Result<()>
where
    P: Provider,
    F: FnMut(P::Item) -> Result<ControlFlow<()>>,
{
    let mut guard = CloseGuard(&mut seq);
    catch_result("open", || guard.0.open(ctx))?;
    loop {
        ctx.check()?;
        let Some(item) = catch_result("emit", || guard.0.emit(ctx))? else {
            return Ok(());
        };
        if catch_result("consume", || f(item))?.is_break() {
            return Ok(());
        }
    }
}

/// Feed every element to `f`; the first error from either side stops the run.
pub fn consume<P, F>(seq: P, ctx: &Context, mut f: F) -> Result<()>
where
    P: Provider,
    F: FnMut(P::Item) -> Result<()>,
{
    drive(seq, ctx, |item| f(item).map(|_| ControlFlow::Continue(())))
}

pub fn for_each<P, F>(seq: P, ctx: &Context, mut f: F) -> Result<()>
where
    P: Provider,
    F: FnMut(P::Item),
{
    consume(seq, ctx, |item| {
        f(item);
        Ok(())
    })
}

pub fn collect<P: Provider>(seq: P, ctx: &Context) -> Result<Vec<P::Item>> {
    let mut out = Vec::new();
    for_each(seq, ctx, |item| out.push(item))?;
    Ok(out)
}

pub fn count<P: Provider>(seq: P, ctx: &Context) -> Result<usize> {
    let mut n = 0;
    for_each(seq, ctx, |_| n += 1)?;
    Ok(n)
}

pub fn fold<P, B, F>(seq: P, ctx: &Context, init: B, mut f: F) -> Result<B>
where
    P: Provider,
    F: FnMut(B, P::Item) -> B,
{
    let mut acc = Some(init);
    consume(seq, ctx, |item| {
        if let Some(current) = acc.take() {
            acc = Some(f(current, item));
        }
        Ok(())
    })?;
    acc.ok_or_else(|| Error::msg("fold accumulator lost"))
}

/// First element; stops pulling as soon as it arrives.
pub fn first<P: Provider>(seq: P, ctx: &Context) -> Result<Option<P::Item>> {
    let mut out = None;
    drive(seq, ctx, |item| {
        out = Some(item);
        Ok(ControlFlow::Break(()))
    })?;
    Ok(out)
}

pub fn last<P: Provider>(seq: P, ctx: &Context) -> Result<Option<P::Item>> {
    let mut out = None;
    for_each(seq, ctx, |item| out = Some(item))?;
    Ok(out)
}

/// Uniform sample of `size` elements in one pass.
pub fn sample<P: Provider>(seq: P, ctx: &Context, size: usize, seed: Option<u64>) -> Result<Vec<P::Item>> {
    let mut reservoir = Reservoir::new(size, rng_from_seed(seed))?;
    for_each(seq, ctx, |item| reservoir.offer(item))?;
    Ok(reservoir.into_vec())
}

//! Execution methods for every provider.

use seqflow_core::prelude::*;

use crate::buffer::Buffered;
use crate::concurrent::ConcurrentMap;
use crate::iter::{iter, SeqIter};
use crate::terminal;

pub trait ExecExt: Provider + Sized {
    /// Apply `f` on `workers` threads. Output order is unspecified.
    fn map_concurrent<U, F>(self, workers: usize, f: F) -> ConcurrentMap<Self, U, F>
    where
        F: Fn(Self::Item) -> Result<U> + Send + Sync + 'static,
    {
        ConcurrentMap::new(self, workers, f)
    }

    /// Pull ahead on a producer thread into a queue of `capacity` elements.
    fn buffered(self, capacity: usize) -> Buffered<Self> {
        Buffered::new(self, capacity)
    }

    fn consume<F>(self, ctx: &Context, f: F) -> Result<()>
    where
        F: FnMut(Self::Item) -> Result<()>,
    {
        terminal::consume(self, ctx, f)
    }

    fn for_each<F>(self, ctx: &Context, f: F) -> Result<()>
    where
        F: FnMut(Self::Item),
    {
        terminal::for_each(self, ctx, f)
    }

    fn collect_vec(self, ctx: &Context) -> Result<Vec<Self::Item>> {
        terminal::collect(self, ctx)
    }

    fn count(self, ctx: &Context) -> Result<usize> {
        terminal::count(self, ctx)
    }

    fn fold<B, F>(self, ctx: &Context, init: B, f: F) -> Result<B>
    where
        F: FnMut(B, Self::Item) -> B,
    {
        terminal::fold(self, ctx, init, f)
    }

    fn first(self, ctx: &Context) -> Result<Option<Self::Item>> {
        terminal::first(self, ctx)
    }

    fn last(self, ctx: &Context) -> Result<Option<Self::Item>> {
        terminal::last(self, ctx)
    }

    fn iter(self, ctx: &Context) -> SeqIter<Self> {
        iter(self, ctx)
    }
}

impl<P: Provider> ExecExt for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use seqflow_operators::SequenceExt;
    use seqflow_sources::from_iter;

    #[test]
    fn concurrent_then_buffered_pipeline() {
        let ctx = Context::new();
        let mut out = from_iter(|| 0..100)
            .filter(|x: &i32| x % 5 == 0)
            .map_concurrent(3, |x| Ok(x / 5))
            .buffered(4)
            .collect_vec(&ctx)
            .unwrap();
        out.sort_unstable();
        assert_eq!(out, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn terminals_through_the_trait() {
        let ctx = Context::new();
        assert_eq!(from_iter(|| 0..10).count(&ctx).unwrap(), 10);
        assert_eq!(from_iter(|| 3..10).first(&ctx).unwrap(), Some(3));
        assert_eq!(from_iter(|| 0..4).fold(&ctx, 1, |a, b| a + b).unwrap(), 7);
    }
}

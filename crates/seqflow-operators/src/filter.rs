//! Predicate filter.

use seqflow_core::panic::catch;
use seqflow_core::prelude::*;

pub struct Filter<P, F> {
    upstream: P,
    predicate: F,
}

impl<P: Provider, F> Filter<P, F> {
    pub fn new(upstream: P, predicate: F) -> Self
    where
        F: FnMut(&P::Item) -> bool,
    {
        Self {
            upstream,
            predicate,
        }
    }
}

impl<P: Lifecycle, F> Lifecycle for Filter<P, F> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.upstream.close()
    }
}

impl<P, F> Provider for Filter<P, F>
where
    P: Provider,
    F: FnMut(&P::Item) -> bool,
{
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        loop {
            // Long runs of rejected elements must still observe cancellation.
            ctx.check()?;
            let Some(item) = self.upstream.emit(ctx)? else {
                return Ok(None);
            };
            let predicate = &mut self.predicate;
            if catch("filter", || predicate(&item))? {
                return Ok(Some(item));
            }
        }
    }
}

impl<P, F> Rewindable for Filter<P, F>
where
    P: Rewindable,
    F: FnMut(&P::Item) -> bool,
{
}

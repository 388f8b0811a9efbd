//! Sources backed by native iterators.
//!
//! The source holds a factory rather than an iterator: every `open` builds a
//! fresh iterator, which makes these sources rewindable.

use seqflow_core::prelude::*;

pub struct IterSource<F, I: IntoIterator> {
    factory: F,
    iter: Option<I::IntoIter>,
}

/// Source over `factory()`, re-invoked on every open.
pub fn from_iter<F, I>(factory: F) -> IterSource<F, I>
where
    F: FnMut() -> I,
    I: IntoIterator,
{
    IterSource {
        factory,
        iter: None,
    }
}

impl<F, I> Lifecycle for IterSource<F, I>
where
    F: FnMut() -> I,
    I: IntoIterator,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        ctx.check()?;
        self.iter = Some((self.factory)().into_iter());
        Ok(())
    }

    fn close(&mut self) {
        self.iter = None;
    }
}

impl<F, I> Provider for IterSource<F, I>
where
    F: FnMut() -> I,
    I: IntoIterator,
{
    type Item = I::Item;

    fn emit(&mut self, _ctx: &Context) -> Result<Option<I::Item>> {
        match self.iter.as_mut() {
            Some(iter) => Ok(iter.next()),
            None => Err(Error::msg("iterator source emitted before open")),
        }
    }
}

impl<F, I> Rewindable for IterSource<F, I>
where
    F: FnMut() -> I,
    I: IntoIterator,
{
}

/// Like [`IterSource`] for iterators that yield `Result`s; an `Err` item is
/// surfaced as the emit error.
pub struct TryIterSource<F, I: IntoIterator> {
    inner: IterSource<F, I>,
}

pub fn from_results<F, I, T>(factory: F) -> TryIterSource<F, I>
where
    F: FnMut() -> I,
    I: IntoIterator<Item = Result<T>>,
{
    TryIterSource {
        inner: from_iter(factory),
    }
}

impl<F, I, T> Lifecycle for TryIterSource<F, I>
where
    F: FnMut() -> I,
    I: IntoIterator<Item = Result<T>>,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.inner.open(ctx)
    }

    fn close(&mut self) {
        self.inner.close()
    }
}

impl<F, I, T> Provider for TryIterSource<F, I>
where
    F: FnMut() -> I,
    I: IntoIterator<Item = Result<T>>,
{
    type Item = T;

    fn emit(&mut self, ctx: &Context) -> Result<Option<T>> {
        self.inner.emit(ctx)?.transpose()
    }
}

impl<F, I, T> Rewindable for TryIterSource<F, I>
where
    F: FnMut() -> I,
    I: IntoIterator<Item = Result<T>>,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_iterator_per_open() {
        let ctx = Context::new();
        let mut calls = 0;
        let mut src = from_iter(|| {
            calls += 1;
            1..=2
        });
        for _ in 0..2 {
            src.open(&ctx).unwrap();
            assert_eq!(src.emit(&ctx).unwrap(), Some(1));
            assert_eq!(src.emit(&ctx).unwrap(), Some(2));
            assert_eq!(src.emit(&ctx).unwrap(), None);
            src.close();
        }
        drop(src);
        assert_eq!(calls, 2);
    }

    #[test]
    fn result_items_surface_as_errors() {
        let ctx = Context::new();
        let mut src = from_results(|| vec![Ok(1), Err(Error::msg("bad row")), Ok(3)]);
        src.open(&ctx).unwrap();
        assert_eq!(src.emit(&ctx).unwrap(), Some(1));
        assert!(src.emit(&ctx).is_err());
        assert_eq!(src.emit(&ctx).unwrap(), Some(3));
    }
}

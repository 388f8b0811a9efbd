//! Type-erased sequence handle.

use crate::context::Context;
use crate::error::Result;
use crate::provider::{Lifecycle, Provider, Rewindable};

/// A boxed provider. Useful when pipelines of different concrete types must
/// be stored together (e.g. as the inputs of a join).
pub struct Sequence<T> {
    inner: Box<dyn Provider<Item = T> + Send + 'static>,
}

impl<T> Sequence<T> {
    pub fn new<P>(provider: P) -> Self
    where
        P: Provider<Item = T> + Send + 'static,
    {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl<T> Lifecycle for Sequence<T> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.inner.open(ctx)
    }

    fn close(&mut self) {
        self.inner.close()
    }
}

impl<T> Provider for Sequence<T> {
    type Item = T;

    fn emit(&mut self, ctx: &Context) -> Result<Option<T>> {
        self.inner.emit(ctx)
    }
}

impl<T> std::fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence").finish_non_exhaustive()
    }
}

/// A boxed provider that keeps the [`Rewindable`] marker, so a type-erased
/// pipeline can still be re-opened from the start (e.g. by a pager).
pub struct RewindableSequence<T> {
    inner: Box<dyn Rewindable<Item = T> + Send + 'static>,
}

impl<T> RewindableSequence<T> {
    pub fn new<P>(provider: P) -> Self
    where
        P: Rewindable<Item = T> + Send + 'static,
    {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl<T> Lifecycle for RewindableSequence<T> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.inner.open(ctx)
    }

    fn close(&mut self) {
        self.inner.close()
    }
}

impl<T> Provider for RewindableSequence<T> {
    type Item = T;

    fn emit(&mut self, ctx: &Context) -> Result<Option<T>> {
        self.inner.emit(ctx)
    }
}

impl<T> Rewindable for RewindableSequence<T> {}

impl<T> From<RewindableSequence<T>> for Sequence<T>
where
    T: 'static,
{
    fn from(seq: RewindableSequence<T>) -> Self {
        Sequence::new(seq)
    }
}

impl<T> std::fmt::Debug for RewindableSequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewindableSequence").finish_non_exhaustive()
    }
}

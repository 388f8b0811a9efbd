//! The pull protocol.
//!
//! Every sequence (leaf or derived) is a `Provider`: `open` acquires whatever
//! the sequence needs, `emit` pulls the next element (`Ok(None)` is the
//! end-of-sequence sentinel, not an error), and `close` releases everything
//! that `open` acquired.
//!
//! Invariants:
//! - `emit` is only called after a successful `open`, and never concurrently.
//! - `close` never fails or panics, is idempotent, and is safe to call after
//!   a failed (or partial) `open`.

use crate::context::Context;
use crate::error::Result;

/// An Open/Close pair tied to resource acquisition and release.
pub trait Lifecycle {
    fn open(&mut self, ctx: &Context) -> Result<()>;

    fn close(&mut self);
}

/// A lazily pulled, possibly unbounded series of elements.
pub trait Provider: Lifecycle {
    type Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<Self::Item>>;
}

/// Re-opening after a close restarts from the first element.
///
/// Value-backed sources (collections, iterator factories) are rewindable;
/// derived combinators inherit the marker from their inputs.
pub trait Rewindable: Provider {}

/// Re-opening continues from where the previous consumption stopped, which
/// for a drained source means an immediately exhausted sequence.
pub trait SingleUse: Provider {}

impl<L: Lifecycle + ?Sized> Lifecycle for &mut L {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        (**self).open(ctx)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<P: Provider + ?Sized> Provider for &mut P {
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<Self::Item>> {
        (**self).emit(ctx)
    }
}

impl<L: Lifecycle + ?Sized> Lifecycle for Box<L> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        (**self).open(ctx)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<Self::Item>> {
        (**self).emit(ctx)
    }
}

impl<P: Rewindable + ?Sized> Rewindable for &mut P {}
impl<P: Rewindable + ?Sized> Rewindable for Box<P> {}
impl<P: SingleUse + ?Sized> SingleUse for &mut P {}
impl<P: SingleUse + ?Sized> SingleUse for Box<P> {}

/// Lifecycle element built from a pair of closures.
///
/// `close` only runs the closure if the last `open` succeeded, so it is
/// idempotent like every other lifecycle element.
pub struct FnLifecycle<O, C> {
    on_open: O,
    on_close: C,
    open: bool,
}

impl<O, C> FnLifecycle<O, C>
where
    O: FnMut(&Context) -> Result<()>,
    C: FnMut(),
{
    pub fn new(on_open: O, on_close: C) -> Self {
        Self {
            on_open,
            on_close,
            open: false,
        }
    }
}

impl<O, C> Lifecycle for FnLifecycle<O, C>
where
    O: FnMut(&Context) -> Result<()>,
    C: FnMut(),
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.close();
        (self.on_open)(ctx)?;
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        if std::mem::replace(&mut self.open, false) {
            (self.on_close)();
        }
    }
}

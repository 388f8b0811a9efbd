//! Small leaf providers: generator closures, empty and single-element sources.

use std::marker::PhantomData;

use seqflow_core::prelude::*;

/// Generator closure. The closure owns its cursor state, so the source is
/// single-use: re-opening resumes wherever the closure left off.
pub struct FromFn<F> {
    f: F,
}

pub fn from_fn<F, T>(f: F) -> FromFn<F>
where
    F: FnMut(&Context) -> Result<Option<T>>,
{
    FromFn { f }
}

impl<F> Lifecycle for FromFn<F> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        ctx.check()
    }

    fn close(&mut self) {}
}

impl<F, T> Provider for FromFn<F>
where
    F: FnMut(&Context) -> Result<Option<T>>,
{
    type Item = T;

    fn emit(&mut self, ctx: &Context) -> Result<Option<T>> {
        (self.f)(ctx)
    }
}

impl<F, T> SingleUse for FromFn<F> where F: FnMut(&Context) -> Result<Option<T>> {}

pub struct Empty<T>(PhantomData<fn() -> T>);

pub fn empty<T>() -> Empty<T> {
    Empty(PhantomData)
}

impl<T> Lifecycle for Empty<T> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        ctx.check()
    }

    fn close(&mut self) {}
}

impl<T> Provider for Empty<T> {
    type Item = T;

    fn emit(&mut self, _ctx: &Context) -> Result<Option<T>> {
        Ok(None)
    }
}

impl<T> Rewindable for Empty<T> {}

pub struct Once<T> {
    value: T,
    done: bool,
}

pub fn once<T: Clone>(value: T) -> Once<T> {
    Once { value, done: false }
}

impl<T> Lifecycle for Once<T> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        ctx.check()?;
        self.done = false;
        Ok(())
    }

    fn close(&mut self) {}
}

impl<T: Clone> Provider for Once<T> {
    type Item = T;

    fn emit(&mut self, _ctx: &Context) -> Result<Option<T>> {
        if std::mem::replace(&mut self.done, true) {
            Ok(None)
        } else {
            Ok(Some(self.value.clone()))
        }
    }
}

impl<T: Clone> Rewindable for Once<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_keeps_state_across_opens() {
        let ctx = Context::new();
        let mut n = 0;
        let mut src = from_fn(move |_ctx: &Context| {
            n += 1;
            Ok(if n <= 2 { Some(n) } else { None })
        });
        src.open(&ctx).unwrap();
        assert_eq!(src.emit(&ctx).unwrap(), Some(1));
        src.close();
        src.open(&ctx).unwrap();
        assert_eq!(src.emit(&ctx).unwrap(), Some(2));
        assert_eq!(src.emit(&ctx).unwrap(), None);
    }

    #[test]
    fn once_rewinds() {
        let ctx = Context::new();
        let mut src = once("x");
        for _ in 0..2 {
            src.open(&ctx).unwrap();
            assert_eq!(src.emit(&ctx).unwrap(), Some("x"));
            assert_eq!(src.emit(&ctx).unwrap(), None);
            src.close();
        }
        let mut nothing = empty::<u8>();
        nothing.open(&ctx).unwrap();
        assert_eq!(nothing.emit(&ctx).unwrap(), None);
    }
}

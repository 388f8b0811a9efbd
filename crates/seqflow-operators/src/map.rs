//! Element-wise transforms.
//!
//! These add no lifecycle element of their own: open/close go straight to
//! the upstream. Panics in the caller's closure surface as `Error::Panic`.

use seqflow_core::panic::{catch, catch_result};
use seqflow_core::prelude::*;

pub struct Map<P, F> {
    upstream: P,
    f: F,
}

impl<P: Provider, F> Map<P, F> {
    pub fn new<U>(upstream: P, f: F) -> Self
    where
        F: FnMut(P::Item) -> U,
    {
        Self { upstream, f }
    }
}

impl<P: Lifecycle, F> Lifecycle for Map<P, F> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.upstream.close()
    }
}

impl<P, F, U> Provider for Map<P, F>
where
    P: Provider,
    F: FnMut(P::Item) -> U,
{
    type Item = U;

    fn emit(&mut self, ctx: &Context) -> Result<Option<U>> {
        match self.upstream.emit(ctx)? {
            Some(item) => {
                let f = &mut self.f;
                catch("map", || f(item)).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl<P, F, U> Rewindable for Map<P, F>
where
    P: Rewindable,
    F: FnMut(P::Item) -> U,
{
}

/// Fallible transform; an `Err` from the closure is the emit error.
pub struct TryMap<P, F> {
    upstream: P,
    f: F,
}

impl<P: Provider, F> TryMap<P, F> {
    pub fn new<U>(upstream: P, f: F) -> Self
    where
        F: FnMut(P::Item) -> Result<U>,
    {
        Self { upstream, f }
    }
}

impl<P: Lifecycle, F> Lifecycle for TryMap<P, F> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.upstream.close()
    }
}

impl<P, F, U> Provider for TryMap<P, F>
where
    P: Provider,
    F: FnMut(P::Item) -> Result<U>,
{
    type Item = U;

    fn emit(&mut self, ctx: &Context) -> Result<Option<U>> {
        match self.upstream.emit(ctx)? {
            Some(item) => {
                let f = &mut self.f;
                catch_result("try_map", || f(item)).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl<P, F, U> Rewindable for TryMap<P, F>
where
    P: Rewindable,
    F: FnMut(P::Item) -> Result<U>,
{
}

pub struct Inspect<P, F> {
    upstream: P,
    f: F,
}

impl<P: Provider, F> Inspect<P, F> {
    pub fn new(upstream: P, f: F) -> Self
    where
        F: FnMut(&P::Item),
    {
        Self { upstream, f }
    }
}

impl<P: Lifecycle, F> Lifecycle for Inspect<P, F> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.upstream.close()
    }
}

impl<P, F> Provider for Inspect<P, F>
where
    P: Provider,
    F: FnMut(&P::Item),
{
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        let item = self.upstream.emit(ctx)?;
        if let Some(item) = &item {
            let f = &mut self.f;
            catch("inspect", || f(item))?;
        }
        Ok(item)
    }
}

impl<P, F> Rewindable for Inspect<P, F>
where
    P: Rewindable,
    F: FnMut(&P::Item),
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::drain;
    use seqflow_sources::from_vec;

    #[test]
    fn maps_in_order() {
        let out = drain(Map::new(from_vec(vec![1, 2, 3]), |x| x * 10)).unwrap();
        assert_eq!(out, vec![10, 20, 30]);
    }

    #[test]
    fn try_map_forwards_closure_error() {
        let seq = TryMap::new(from_vec(vec![1, 2, 3]), |x| {
            if x == 2 {
                Err(Error::msg("two"))
            } else {
                Ok(x)
            }
        });
        let err = drain(seq).unwrap_err();
        assert_eq!(err.to_string(), "two");
    }

    #[test]
    fn panicking_closure_becomes_error() {
        let seq = Map::new(from_vec(vec![1, 2]), |x: i32| -> i32 {
            if x == 2 {
                panic!("cannot map 2");
            }
            x
        });
        match drain(seq).unwrap_err() {
            Error::Panic(p) => assert_eq!(p.message(), "cannot map 2"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn inspect_sees_every_element() {
        let mut seen = Vec::new();
        let out = drain(Inspect::new(from_vec(vec!['a', 'b']), |c: &char| seen.push(*c))).unwrap();
        assert_eq!(out, vec!['a', 'b']);
        assert_eq!(seen, vec!['a', 'b']);
    }
}

//! Expand each element into an inner sequence.
//!
//! An inner sequence is opened as soon as it is produced and closed when it
//! is exhausted, when it fails, or when the outer sequence is closed.

use seqflow_core::panic::catch;
use seqflow_core::prelude::*;

pub struct FlatMap<P, F, Q> {
    upstream: P,
    f: F,
    current: Option<Q>,
}

impl<P: Provider, F, Q> FlatMap<P, F, Q> {
    pub fn new(upstream: P, f: F) -> Self
    where
        F: FnMut(P::Item) -> Q,
    {
        Self {
            upstream,
            f,
            current: None,
        }
    }
}

impl<P: Lifecycle, F, Q: Lifecycle> FlatMap<P, F, Q> {
    fn close_current(&mut self) {
        if let Some(mut inner) = self.current.take() {
            inner.close();
        }
    }
}

impl<P: Lifecycle, F, Q: Lifecycle> Lifecycle for FlatMap<P, F, Q> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.close_current();
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.close_current();
        self.upstream.close();
    }
}

impl<P, F, Q> Provider for FlatMap<P, F, Q>
where
    P: Provider,
    F: FnMut(P::Item) -> Q,
    Q: Provider,
{
    type Item = Q::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<Q::Item>> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                match inner.emit(ctx) {
                    Ok(Some(item)) => return Ok(Some(item)),
                    Ok(None) => self.close_current(),
                    Err(err) => {
                        self.close_current();
                        return Err(err);
                    }
                }
            }

            let Some(item) = self.upstream.emit(ctx)? else {
                return Ok(None);
            };
            let f = &mut self.f;
            let mut inner = catch("flat_map", || f(item))?;
            if let Err(err) = inner.open(ctx) {
                inner.close();
                return Err(err);
            }
            self.current = Some(inner);
        }
    }
}

impl<P, F, Q> Rewindable for FlatMap<P, F, Q>
where
    P: Rewindable,
    F: FnMut(P::Item) -> Q,
    Q: Provider,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::drain;
    use seqflow_sources::{from_iter, from_vec};

    #[test]
    fn flattens_in_order() {
        let seq = FlatMap::new(from_vec(vec![0usize, 2, 1]), |n| from_iter(move || 0..n));
        assert_eq!(drain(seq).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn inner_failure_propagates() {
        let seq = FlatMap::new(from_vec(vec![1, 2]), |n: i32| {
            seqflow_sources::from_results(move || {
                if n == 2 {
                    vec![Err(Error::msg("inner broke"))]
                } else {
                    vec![Ok(n)]
                }
            })
        });
        let err = drain(seq).unwrap_err();
        assert_eq!(err.to_string(), "inner broke");
    }
}

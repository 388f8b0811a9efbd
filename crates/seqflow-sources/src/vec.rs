//! Value-backed collection source.

use std::sync::Arc;

use seqflow_core::prelude::*;

/// Emits clones of the elements of a shared slice. Each `open` restarts at
/// the first element, so the source can be consumed any number of times.
#[derive(Debug, Clone)]
pub struct VecSource<T> {
    items: Arc<[T]>,
    cursor: Option<usize>,
}

impl<T> VecSource<T> {
    pub fn new(items: impl Into<Arc<[T]>>) -> Self {
        Self {
            items: items.into(),
            cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn from_vec<T>(items: Vec<T>) -> VecSource<T> {
    VecSource::new(items)
}

impl<T> Lifecycle for VecSource<T> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        ctx.check()?;
        self.cursor = Some(0);
        Ok(())
    }

    fn close(&mut self) {
        self.cursor = None;
    }
}

impl<T: Clone> Provider for VecSource<T> {
    type Item = T;

    fn emit(&mut self, _ctx: &Context) -> Result<Option<T>> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| Error::msg("vec source emitted before open"))?;
        match self.items.get(*cursor) {
            Some(item) => {
                *cursor += 1;
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }
}

impl<T: Clone> Rewindable for VecSource<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<P: Provider>(p: &mut P) -> Vec<P::Item> {
        let ctx = Context::new();
        p.open(&ctx).unwrap();
        let mut out = Vec::new();
        while let Some(v) = p.emit(&ctx).unwrap() {
            out.push(v);
        }
        p.close();
        out
    }

    #[test]
    fn reconsumable() {
        let mut src = from_vec(vec![1, 2, 3]);
        assert_eq!(drain(&mut src), vec![1, 2, 3]);
        assert_eq!(drain(&mut src), vec![1, 2, 3]);
    }

    #[test]
    fn emit_before_open_is_an_error() {
        let mut src = from_vec(vec![1]);
        assert!(src.emit(&Context::new()).is_err());
    }
}

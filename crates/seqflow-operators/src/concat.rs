//! Back-to-back concatenation.
//!
//! All inputs are opened up front, in order, through a `LifecycleStack`, so
//! a failing open unwinds the inputs that were already opened.

use seqflow_core::prelude::*;

pub struct Concat<P: Provider> {
    inputs: LifecycleStack<P>,
    current: usize,
}

pub fn concat<P: Provider>(inputs: Vec<P>) -> Concat<P> {
    Concat {
        inputs: LifecycleStack::new(inputs),
        current: 0,
    }
}

impl<P: Provider> Lifecycle for Concat<P> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.current = 0;
        self.inputs.open(ctx)
    }

    fn close(&mut self) {
        self.inputs.close();
    }
}

impl<P: Provider> Provider for Concat<P> {
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        while let Some(input) = self.inputs.get_mut(self.current) {
            match input.emit(ctx)? {
                Some(item) => return Ok(Some(item)),
                None => self.current += 1,
            }
        }
        Ok(None)
    }
}

impl<P: Rewindable> Rewindable for Concat<P> {}

/// Two heterogeneous providers with the same item type, back to back.
pub struct Chain<A, B> {
    first: A,
    second: B,
    first_open: bool,
    second_open: bool,
    on_second: bool,
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            first_open: false,
            second_open: false,
            on_second: false,
        }
    }
}

impl<A: Lifecycle, B: Lifecycle> Lifecycle for Chain<A, B> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.close();
        self.first.open(ctx).map_err(|e| e.at_open(0))?;
        self.first_open = true;
        if let Err(err) = self.second.open(ctx) {
            self.close();
            return Err(err.at_open(1));
        }
        self.second_open = true;
        Ok(())
    }

    fn close(&mut self) {
        if std::mem::take(&mut self.second_open) {
            self.second.close();
        }
        if std::mem::take(&mut self.first_open) {
            self.first.close();
        }
        self.on_second = false;
    }
}

impl<A, B> Provider for Chain<A, B>
where
    A: Provider,
    B: Provider<Item = A::Item>,
{
    type Item = A::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<A::Item>> {
        if !self.on_second {
            match self.first.emit(ctx)? {
                Some(item) => return Ok(Some(item)),
                None => self.on_second = true,
            }
        }
        self.second.emit(ctx)
    }
}

impl<A, B> Rewindable for Chain<A, B>
where
    A: Rewindable,
    B: Rewindable<Item = A::Item>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::drain;
    use seqflow_sources::{empty, from_vec};

    #[test]
    fn concatenates_in_declared_order() {
        let seq = concat(vec![from_vec(vec![1, 2]), from_vec(vec![]), from_vec(vec![3])]);
        assert_eq!(drain(seq).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn chain_mixes_provider_types() {
        let seq = Chain::new(from_vec(vec![1]), empty());
        assert_eq!(drain(seq).unwrap(), vec![1]);
    }

    #[test]
    fn concat_is_rewindable() {
        let mut seq = concat(vec![from_vec(vec!['x']), from_vec(vec!['y'])]);
        assert_eq!(drain(&mut seq).unwrap(), vec!['x', 'y']);
        assert_eq!(drain(&mut seq).unwrap(), vec!['x', 'y']);
    }
}

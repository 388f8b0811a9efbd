//! Bridge from the pull protocol to `Iterator`.

use seqflow_core::panic::catch_result;
use seqflow_core::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Open,
    Done,
}

/// Yields `Result<T>` items. The sequence is opened on the first `next`, and
/// closed at its end, after the first error, or when the iterator is dropped.
/// After an error the iterator is fused.
pub struct SeqIter<P: Provider> {
    seq: P,
    ctx: Context,
    state: State,
}

pub fn iter<P: Provider>(seq: P, ctx: &Context) -> SeqIter<P> {
    SeqIter {
        seq,
        ctx: ctx.clone(),
        state: State::Pending,
    }
}

impl<P: Provider> SeqIter<P> {
    fn finish(&mut self) {
        if self.state == State::Open {
            self.seq.close();
        }
        self.state = State::Done;
    }
}

impl<P: Provider> Iterator for SeqIter<P> {
    type Item = Result<P::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => return None,
            State::Pending => {
                if let Err(err) = catch_result("open", || self.seq.open(&self.ctx)) {
                    self.seq.close();
                    self.state = State::Done;
                    return Some(Err(err));
                }
                self.state = State::Open;
            }
            State::Open => {}
        }
        let step = self
            .ctx
            .check()
            .and_then(|_| catch_result("emit", || self.seq.emit(&self.ctx)));
        match step {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.finish();
                None
            }
            Err(err) => {
                self.finish();
                Some(Err(err))
            }
        }
    }
}

impl<P: Provider> std::iter::FusedIterator for SeqIter<P> {}

impl<P: Provider> Drop for SeqIter<P> {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqflow_sources::{from_iter, from_results};

    #[test]
    fn works_with_iterator_adapters() {
        let ctx = Context::new();
        let total: i32 = iter(from_iter(|| 1..=4), &ctx).map(|r| r.unwrap()).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn fused_after_error() {
        let ctx = Context::new();
        let mut it = iter(from_results(|| vec![Ok(1), Err(Error::msg("gone")), Ok(3)]), &ctx);
        assert_eq!(it.next().unwrap().unwrap(), 1);
        assert!(it.next().unwrap().is_err());
        assert!(it.next().is_none());
    }

    #[test]
    fn collects_into_result() {
        let ctx = Context::new();
        let out: Result<Vec<char>> = iter(from_iter(|| "abc".chars()), &ctx).collect();
        assert_eq!(out.unwrap(), vec!['a', 'b', 'c']);
    }
}

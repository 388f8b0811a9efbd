//! Composition graph: an ordered list of child lifecycle elements.
//!
//! Children are opened in declaration order. If child `i` fails, children
//! `[0..i)` are closed in reverse order and the error is returned wrapped
//! with `i`. `close` releases whatever is currently open, last-opened first,
//! and is idempotent. Dropping the stack closes it.

use crate::context::Context;
use crate::error::Result;
use crate::provider::Lifecycle;

pub struct LifecycleStack<L: Lifecycle> {
    items: Vec<L>,
    opened: usize,
}

impl<L: Lifecycle> Default for LifecycleStack<L> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            opened: 0,
        }
    }
}

impl<L: Lifecycle> LifecycleStack<L> {
    pub fn new(items: Vec<L>) -> Self {
        Self { items, opened: 0 }
    }

    /// Register another child. It is opened after every earlier child.
    pub fn push(&mut self, item: L) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of children currently open.
    pub fn opened(&self) -> usize {
        self.opened
    }

    pub fn is_open(&self) -> bool {
        self.opened == self.items.len() && self.opened > 0
    }

    pub fn open(&mut self, ctx: &Context) -> Result<()> {
        // Re-open starts from a clean slate.
        self.close();
        for index in 0..self.items.len() {
            if let Err(err) = ctx.check().and_then(|_| self.items[index].open(ctx)) {
                tracing::debug!(index, opened = self.opened, "open failed; unwinding");
                self.close();
                return Err(err.at_open(index));
            }
            self.opened = index + 1;
        }
        tracing::trace!(len = self.items.len(), "lifecycle stack opened");
        Ok(())
    }

    pub fn close(&mut self) {
        while self.opened > 0 {
            self.opened -= 1;
            self.items[self.opened].close();
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut L> {
        self.items.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, L> {
        self.items.iter_mut()
    }

    pub fn as_mut_slice(&mut self) -> &mut [L] {
        &mut self.items
    }
}

impl<L: Lifecycle> Lifecycle for LifecycleStack<L> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        LifecycleStack::open(self, ctx)
    }

    fn close(&mut self) {
        LifecycleStack::close(self)
    }
}

impl<L: Lifecycle> Drop for LifecycleStack<L> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        id: usize,
        fail: bool,
        log: Arc<Mutex<Vec<String>>>,
        open: bool,
    }

    impl Lifecycle for Recorder {
        fn open(&mut self, _ctx: &Context) -> Result<()> {
            self.log.lock().unwrap().push(format!("open {}", self.id));
            if self.fail {
                return Err(Error::msg(format!("element {} failed", self.id)));
            }
            self.open = true;
            Ok(())
        }

        fn close(&mut self) {
            if std::mem::replace(&mut self.open, false) {
                self.log.lock().unwrap().push(format!("close {}", self.id));
            }
        }
    }

    fn recorders(n: usize, fail_at: Option<usize>, log: &Arc<Mutex<Vec<String>>>) -> Vec<Recorder> {
        (0..n)
            .map(|id| Recorder {
                id,
                fail: Some(id) == fail_at,
                log: Arc::clone(log),
                open: false,
            })
            .collect()
    }

    #[test]
    fn opens_in_order_and_closes_in_reverse() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut stack = LifecycleStack::new(recorders(3, None, &log));
        stack.open(&Context::new()).unwrap();
        assert!(stack.is_open());
        stack.close();
        stack.close();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["open 0", "open 1", "open 2", "close 2", "close 1", "close 0"]
        );
    }

    #[test]
    fn partial_open_unwinds_opened_prefix() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut stack = LifecycleStack::new(recorders(4, Some(2), &log));
        let err = stack.open(&Context::new()).unwrap_err();
        assert!(matches!(err, Error::Open { index: 2, .. }));
        assert_eq!(stack.opened(), 0);
        stack.close();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["open 0", "open 1", "open 2", "close 1", "close 0"]
        );
    }

    #[test]
    fn cancelled_context_stops_opening() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut stack = LifecycleStack::new(recorders(2, None, &log));
        let ctx = Context::new();
        ctx.cancel();
        let err = stack.open(&ctx).unwrap_err();
        assert!(err.is_cancelled());
        assert!(log.lock().unwrap().is_empty());
    }
}

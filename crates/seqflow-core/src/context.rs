//! Cooperative cancellation.
//!
//! A `CancelToken` is a one-shot flag plus a signal channel that becomes
//! ready (disconnected) the moment the token fires, so blocking queue
//! operations can `select!` on it. Tokens form a tree: firing a parent fires
//! every live child, never the other way around.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crossbeam_channel::{Receiver, Sender};

use crate::error::{Error, Result};

struct TokenInner {
    cancelled: AtomicBool,
    // Dropped on cancel; receivers then observe disconnection.
    signal: Mutex<Option<Sender<()>>>,
    done: Receiver<()>,
    children: Mutex<Vec<Weak<TokenInner>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl TokenInner {
    fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self {
            cancelled: AtomicBool::new(false),
            signal: Mutex::new(Some(tx)),
            done: rx,
            children: Mutex::new(Vec::new()),
        }
    }

    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        drop(lock(&self.signal).take());
        let children = std::mem::take(&mut *lock(&self.children));
        for child in children {
            if let Some(child) = child.upgrade() {
                child.cancel();
            }
        }
    }
}

#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner::new()),
        }
    }

    /// New token that fires when `self` fires (or when cancelled directly).
    pub fn child(&self) -> CancelToken {
        let child = CancelToken::new();
        {
            let mut children = lock(&self.inner.children);
            children.retain(|w| w.strong_count() > 0);
            children.push(Arc::downgrade(&child.inner));
        }
        // The parent may have fired between the push and now.
        if self.is_cancelled() {
            child.cancel();
        }
        child
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Channel that never yields a value and disconnects once cancelled.
    /// Intended for `crossbeam_channel::select!`.
    pub fn cancelled(&self) -> &Receiver<()> {
        &self.inner.done
    }
}

/// Per-pull context handed to `open` and `emit`.
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: CancelToken,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancelToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Context governed by a child of this context's token.
    pub fn child(&self) -> Context {
        Context {
            token: self.token.child(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// `Err(Error::Cancelled)` once the token has fired.
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parent_cancels_children() {
        let root = CancelToken::new();
        let child = root.child();
        let grandchild = child.child();
        root.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn child_does_not_cancel_parent() {
        let root = CancelToken::new();
        let child = root.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!root.is_cancelled());
    }

    #[test]
    fn child_of_cancelled_parent_starts_cancelled() {
        let root = CancelToken::new();
        root.cancel();
        assert!(root.child().is_cancelled());
    }

    #[test]
    fn signal_channel_disconnects_on_cancel() {
        let token = CancelToken::new();
        assert!(token
            .cancelled()
            .recv_timeout(Duration::from_millis(10))
            .is_err());
        token.cancel();
        assert!(matches!(
            token.cancelled().recv(),
            Err(crossbeam_channel::RecvError)
        ));
    }

    #[test]
    fn check_reports_cancellation() {
        let ctx = Context::new();
        assert!(ctx.check().is_ok());
        ctx.cancel();
        assert!(matches!(ctx.check(), Err(Error::Cancelled)));
    }
}

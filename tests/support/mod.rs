//! Shared helpers for the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use seqflow::operators::WithLifecycle;
use seqflow::prelude::*;
use seqflow::sources::{from_vec, VecSource};

/// Counts open and close calls of an attached lifecycle element.
#[derive(Clone, Default)]
pub struct Recorder {
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self) -> impl Lifecycle + Send + 'static {
        let opens = Arc::clone(&self.opens);
        let closes = Arc::clone(&self.closes);
        FnLifecycle::new(
            move |_: &Context| {
                opens.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            move || {
                closes.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Every open has been matched by a close.
    pub fn balanced(&self) -> bool {
        self.opens() == self.closes()
    }
}

pub fn tracked<T>(items: Vec<T>, recorder: &Recorder) -> WithLifecycle<VecSource<T>>
where
    T: Clone,
{
    from_vec(items).with_lifecycle(recorder.element())
}

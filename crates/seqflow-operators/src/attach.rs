//! Attach extra lifecycle elements to a sequence.
//!
//! Registered elements are opened in registration order before the upstream
//! and closed after it. If the upstream fails to open, the error carries the
//! upstream's position (the number of attached elements).

use seqflow_core::prelude::*;

pub type BoxLifecycle = Box<dyn Lifecycle + Send + 'static>;

pub struct WithLifecycle<P> {
    resources: LifecycleStack<BoxLifecycle>,
    upstream: P,
    upstream_open: bool,
}

impl<P> WithLifecycle<P> {
    pub fn new(upstream: P) -> Self {
        Self {
            resources: LifecycleStack::default(),
            upstream,
            upstream_open: false,
        }
    }

    /// Register another element; it opens after those already registered.
    pub fn attach<L>(mut self, element: L) -> Self
    where
        L: Lifecycle + Send + 'static,
    {
        self.resources.push(Box::new(element));
        self
    }
}

impl<P: Lifecycle> Lifecycle for WithLifecycle<P> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.close();
        self.resources.open(ctx)?;
        if let Err(err) = self.upstream.open(ctx) {
            self.upstream.close();
            self.resources.close();
            return Err(err.at_open(self.resources.len()));
        }
        self.upstream_open = true;
        Ok(())
    }

    fn close(&mut self) {
        if std::mem::take(&mut self.upstream_open) {
            self.upstream.close();
        }
        self.resources.close();
    }
}

impl<P: Provider> Provider for WithLifecycle<P> {
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        self.upstream.emit(ctx)
    }
}

impl<P: Rewindable> Rewindable for WithLifecycle<P> {}

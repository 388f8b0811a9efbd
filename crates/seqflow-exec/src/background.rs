//! Threads that run behind a provider.
//!
//! One thread (the owner) receives the upstream provider by value once it is
//! running and hands it back through its `JoinHandle`; any number of helper
//! threads run alongside. Shutdown fires the stop token, joins every thread,
//! and only then closes the recovered upstream, so `close` never races a
//! thread still pulling it.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, SendError};

use seqflow_core::prelude::*;

pub(crate) fn spawn<T, F>(name: String, f: F) -> Result<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    #[cfg(test)]
    failpoint::check_spawn()?;
    thread::Builder::new()
        .name(name)
        .spawn(f)
        .map_err(Error::provider)
}


pub(crate) struct Background<P: Lifecycle> {
    stop: CancelToken,
    helpers: Vec<JoinHandle<()>>,
    owner: Option<JoinHandle<Option<P>>>,
}

impl<P: Lifecycle> Background<P> {
    pub fn new(stop: CancelToken) -> Self {
        Self {
            stop,
            helpers: Vec::new(),
            owner: None,
        }
    }

    pub fn stop(&self) -> &CancelToken {
        &self.stop
    }

    pub fn push_helper(&mut self, handle: JoinHandle<()>) {
        self.helpers.push(handle);
    }

    /// Start the owner thread, then move `upstream` into it. When the thread
    /// cannot be started the upstream comes back untouched with the error.
    pub fn spawn_owner<F>(&mut self, name: String, upstream: P, run: F) -> std::result::Result<(), (P, Error)>
    where
        P: Send + 'static,
        F: FnOnce(&mut P) + Send + 'static,
    {
        let (handoff_tx, handoff_rx) = bounded::<P>(1);
        let handle = match spawn(name, move || {
            let mut upstream = handoff_rx.recv().ok()?;
            run(&mut upstream);
            Some(upstream)
        }) {
            Ok(handle) => handle,
            Err(err) => return Err((upstream, err)),
        };
        if let Err(SendError(upstream)) = handoff_tx.send(upstream) {
            let _ = handle.join();
            return Err((upstream, Error::msg("upstream thread exited before handoff")));
        }
        self.owner = Some(handle);
        Ok(())
    }

    /// Stop and join everything; returns the closed upstream.
    pub fn shutdown(&mut self) -> Option<P> {
        self.stop.cancel();
        for handle in self.helpers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("background helper thread panicked");
            }
        }
        let handle = self.owner.take()?;
        match handle.join() {
            Ok(Some(mut upstream)) => {
                upstream.close();
                Some(upstream)
            }
            Ok(None) => None,
            Err(_) => {
                tracing::warn!("upstream thread panicked; upstream dropped");
                None
            }
        }
    }
}

impl<P: Lifecycle> Drop for Background<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

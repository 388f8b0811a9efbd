//! Bounded concurrent mapping.
//!
//! Layout while open:
//!
//! ```text
//! upstream -> [fetch thread] -> requests (cap = workers)
//!          -> [worker x N]   -> results  (cap = workers) -> emit
//! ```
//!
//! The fetch thread signals a clean end by dropping the request sender; it
//! never sends a marker. Workers stop on request-queue disconnect or on the
//! stop token, and the result queue disconnects once the last worker has
//! exited. Output order is unspecified.

use std::sync::Arc;

use crossbeam_channel::{bounded, select, Receiver, Sender};

use seqflow_core::panic::catch_result;
use seqflow_core::prelude::*;

use crate::background::{spawn, Background};

pub struct ConcurrentMap<P: Provider, U, F> {
    upstream: Option<P>,
    f: Arc<F>,
    workers: usize,
    running: Option<Running<P, U>>,
    finished: bool,
}

struct Running<P: Lifecycle, U> {
    background: Background<P>,
    results: Receiver<Result<U>>,
}

impl<P, U, F> ConcurrentMap<P, U, F>
where
    P: Provider,
    F: Fn(P::Item) -> Result<U> + Send + Sync + 'static,
{
    pub fn new(upstream: P, workers: usize, f: F) -> Self {
        Self {
            upstream: Some(upstream),
            f: Arc::new(f),
            workers,
            running: None,
            finished: false,
        }
    }

    pub fn with_config(upstream: P, config: &EngineConfig, f: F) -> Self {
        Self::new(upstream, config.workers, f)
    }
}

fn fetch<P: Provider>(upstream: &mut P, ctx: &Context, requests: Sender<Result<P::Item>>) {
    while !ctx.is_cancelled() {
        let (entry, last) = match catch_result("emit", || upstream.emit(ctx)) {
            Ok(Some(item)) => (Ok(item), false),
            Ok(None) => break,
            Err(err) => (Err(err), true),
        };
        select! {
            send(requests, entry) -> sent => if sent.is_err() || last { break },
            recv(ctx.token().cancelled()) -> _ => break,
        }
    }
}

fn work<T, U, F>(f: &F, requests: &Receiver<Result<T>>, results: &Sender<Result<U>>, stop: &CancelToken)
where
    F: Fn(T) -> Result<U>,
{
    loop {
        let entry = select! {
            recv(requests) -> msg => match msg {
                Ok(entry) => entry,
                Err(_) => return,
            },
            recv(stop.cancelled()) -> _ => return,
        };
        // Upstream errors pass through untouched.
        let out = entry.and_then(|item| catch_result("concurrent_map", || f(item)));
        select! {
            send(results, out) -> sent => if sent.is_err() { return },
            recv(stop.cancelled()) -> _ => return,
        }
    }
}

impl<P, U, F> Lifecycle for ConcurrentMap<P, U, F>
where
    P: Provider + Send + 'static,
    P::Item: Send + 'static,
    U: Send + 'static,
    F: Fn(P::Item) -> Result<U> + Send + Sync + 'static,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.close();
        self.finished = false;
        if self.workers == 0 {
            return Err(Error::config("concurrent map needs at least one worker"));
        }
        let mut upstream = self
            .upstream
            .take()
            .ok_or_else(|| Error::msg("concurrent map upstream was lost by an earlier failure"))?;
        if let Err(err) = upstream.open(ctx) {
            upstream.close();
            self.upstream = Some(upstream);
            return Err(err);
        }

        let stop = ctx.token().child();
        let (requests_tx, requests_rx) = bounded::<Result<P::Item>>(self.workers);
        let (results_tx, results_rx) = bounded::<Result<U>>(self.workers);
        let mut background = Background::new(stop.clone());

        for id in 0..self.workers {
            let requests = requests_rx.clone();
            let results = results_tx.clone();
            let stop = stop.clone();
            let f = Arc::clone(&self.f);
            match spawn(format!("seqflow-map-{id}"), move || work(&*f, &requests, &results, &stop)) {
                Ok(handle) => background.push_helper(handle),
                Err(err) => {
                    drop(background);
                    upstream.close();
                    self.upstream = Some(upstream);
                    return Err(err);
                }
            }
        }
        drop((requests_rx, results_tx));

        let fetch_ctx = Context::with_token(stop);
        let started = background.spawn_owner("seqflow-fetch".to_string(), upstream, move |upstream| {
            fetch(upstream, &fetch_ctx, requests_tx)
        });
        if let Err((mut upstream, err)) = started {
            drop(background);
            upstream.close();
            self.upstream = Some(upstream);
            return Err(err);
        }

        tracing::debug!(workers = self.workers, "concurrent map started");
        self.running = Some(Running {
            background,
            results: results_rx,
        });
        Ok(())
    }

    fn close(&mut self) {
        let Some(mut running) = self.running.take() else {
            return;
        };
        if let Some(upstream) = running.background.shutdown() {
            self.upstream = Some(upstream);
        }
        tracing::debug!(workers = self.workers, "concurrent map stopped");
    }
}

impl<P, U, F> Provider for ConcurrentMap<P, U, F>
where
    P: Provider + Send + 'static,
    P::Item: Send + 'static,
    U: Send + 'static,
    F: Fn(P::Item) -> Result<U> + Send + Sync + 'static,
{
    type Item = U;

    fn emit(&mut self, ctx: &Context) -> Result<Option<U>> {
        if self.finished {
            return Ok(None);
        }
        ctx.check()?;
        let Some(running) = &self.running else {
            return Err(Error::msg("concurrent map emitted before open"));
        };
        let received = select! {
            recv(running.results) -> msg => msg.ok(),
            recv(ctx.token().cancelled()) -> _ => return Err(Error::Cancelled),
        };
        match received {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(err)) => {
                // First error wins; stop everything behind it.
                running.background.stop().cancel();
                self.finished = true;
                Err(err)
            }
            None => {
                self.finished = true;
                if running.background.stop().is_cancelled() {
                    Err(Error::Cancelled)
                } else {
                    Ok(None)
                }
            }
        }
    }
}

impl<P, U, F> Rewindable for ConcurrentMap<P, U, F>
where
    P: Rewindable + Send + 'static,
    P::Item: Send + 'static,
    U: Send + 'static,
    F: Fn(P::Item) -> Result<U> + Send + Sync + 'static,
{
}

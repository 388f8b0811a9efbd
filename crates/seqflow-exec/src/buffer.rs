//! Backpressure buffering.
//!
//! A producer thread drains the upstream into a bounded queue, ending with
//! the upstream's own end-of-sequence or error. The producer blocks while
//! the queue is full; cancellation unblocks both sides.

use crossbeam_channel::{bounded, select, Receiver, Sender};

use seqflow_core::panic::catch_result;
use seqflow_core::prelude::*;

use crate::background::Background;

pub struct Buffered<P: Provider> {
    upstream: Option<P>,
    capacity: usize,
    running: Option<Producer<P>>,
    finished: bool,
}

struct Producer<P: Provider> {
    background: Background<P>,
    queue: Receiver<Result<Option<P::Item>>>,
}

impl<P: Provider> Buffered<P> {
    pub fn new(upstream: P, capacity: usize) -> Self {
        Self {
            upstream: Some(upstream),
            capacity,
            running: None,
            finished: false,
        }
    }

    pub fn with_config(upstream: P, config: &EngineConfig) -> Self {
        Self::new(upstream, config.buffer_capacity)
    }
}

fn produce<P: Provider>(upstream: &mut P, ctx: &Context, queue: Sender<Result<Option<P::Item>>>) {
    while !ctx.is_cancelled() {
        let next = catch_result("emit", || upstream.emit(ctx));
        let last = !matches!(next, Ok(Some(_)));
        select! {
            send(queue, next) -> sent => if sent.is_err() || last { break },
            recv(ctx.token().cancelled()) -> _ => break,
        }
    }
}

impl<P> Lifecycle for Buffered<P>
where
    P: Provider + Send + 'static,
    P::Item: Send + 'static,
{
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.close();
        self.finished = false;
        if self.capacity == 0 {
            return Err(Error::config("buffer capacity must be > 0"));
        }
        let mut upstream = self
            .upstream
            .take()
            .ok_or_else(|| Error::msg("buffered upstream was lost by an earlier failure"))?;
        if let Err(err) = upstream.open(ctx) {
            upstream.close();
            self.upstream = Some(upstream);
            return Err(err);
        }

        let stop = ctx.token().child();
        let (tx, rx) = bounded(self.capacity);
        let mut background = Background::new(stop.clone());
        let producer_ctx = Context::with_token(stop);
        let started = background.spawn_owner("seqflow-buffer".to_string(), upstream, move |upstream| {
            produce(upstream, &producer_ctx, tx)
        });
        if let Err((mut upstream, err)) = started {
            upstream.close();
            self.upstream = Some(upstream);
            return Err(err);
        }

        tracing::debug!(capacity = self.capacity, "buffer producer started");
        self.running = Some(Producer {
            background,
            queue: rx,
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
        tracing::debug!(capacity = self.capacity, "buffer producer stopped");
    }
}

impl<P> Provider for Buffered<P>
where
    P: Provider + Send + 'static,
    P::Item: Send + 'static,
{
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        if self.finished {
            return Ok(None);
        }
        ctx.check()?;
        let Some(running) = &self.running else {
            return Err(Error::msg("buffer emitted before open"));
        };
        let received = select! {
            recv(running.queue) -> msg => msg,
            recv(ctx.token().cancelled()) -> _ => return Err(Error::Cancelled),
        };
        match received {
            Ok(Ok(Some(item))) => Ok(Some(item)),
            Ok(Ok(None)) => {
                self.finished = true;
                Ok(None)
            }
            Ok(Err(err)) => {
                self.finished = true;
                Err(err)
            }
            Err(_) => {
                self.finished = true;
                if running.background.stop().is_cancelled() {
                    Err(Error::Cancelled)
                } else {
                    Err(Error::msg("buffer producer exited without an end marker"))
                }
            }
        }
    }
}

impl<P> Rewindable for Buffered<P>
where
    P: Rewindable + Send + 'static,
    P::Item: Send + 'static,
{
}

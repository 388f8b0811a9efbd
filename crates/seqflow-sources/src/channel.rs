//! Native queue source.
//!
//! Single-use: a channel can only be drained once. Re-opening a drained,
//! disconnected channel yields an immediately exhausted sequence.

use crossbeam_channel::{Receiver, Sender};
use seqflow_core::prelude::*;

#[derive(Debug)]
pub struct ChannelSource<T> {
    rx: Receiver<T>,
}

impl<T> ChannelSource<T> {
    pub fn new(rx: Receiver<T>) -> Self {
        Self { rx }
    }
}

/// Bounded channel whose receiving half is a sequence.
pub fn channel<T>(capacity: usize) -> (Sender<T>, ChannelSource<T>) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (tx, ChannelSource::new(rx))
}

impl<T> Lifecycle for ChannelSource<T> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        ctx.check()
    }

    fn close(&mut self) {}
}

impl<T> Provider for ChannelSource<T> {
    type Item = T;

    fn emit(&mut self, ctx: &Context) -> Result<Option<T>> {
        ctx.check()?;
        crossbeam_channel::select! {
            recv(self.rx) -> msg => Ok(msg.ok()),
            recv(ctx.token().cancelled()) -> _ => Err(Error::Cancelled),
        }
    }
}

impl<T> SingleUse for ChannelSource<T> {}

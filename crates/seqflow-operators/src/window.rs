//! Sliding and tumbling windows.

use seqflow_core::prelude::*;

/// Window shape. `step` defaults to `size` (tumbling windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub size: usize,
    pub step: usize,
    pub omit_partial: bool,
}

impl WindowConfig {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            step: size,
            omit_partial: false,
        }
    }

    pub fn step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Drop a trailing window that holds fewer than `size` elements.
    pub fn omit_partial(mut self, omit: bool) -> Self {
        self.omit_partial = omit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::config("window size must be > 0"));
        }
        if self.step == 0 || self.step > self.size {
            return Err(Error::config(format!(
                "window step must be in [1, {}], got {}",
                self.size, self.step
            )));
        }
        Ok(())
    }
}

/// Emits owned copies of the first `size` buffered elements, then slides the
/// buffer by `step`.
///
/// A trailing partial window is emitted only if it holds elements that no
/// earlier window has covered, so unit-step sliding never repeats a tail of
/// the last full window.
pub struct Window<P: Provider> {
    upstream: P,
    config: WindowConfig,
    buffer: Vec<P::Item>,
    fresh: usize,
    done: bool,
}

impl<P: Provider> Window<P> {
    pub fn new(upstream: P, config: WindowConfig) -> Self {
        Self {
            upstream,
            config,
            buffer: Vec::new(),
            fresh: 0,
            done: false,
        }
    }

    fn slide(&mut self) {
        if self.config.step >= self.buffer.len() {
            self.buffer.clear();
        } else {
            self.buffer.drain(..self.config.step);
        }
        self.fresh = 0;
    }
}

impl<P: Provider> Lifecycle for Window<P> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.config.validate()?;
        self.buffer.clear();
        self.fresh = 0;
        self.done = false;
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.upstream.close();
        self.buffer.clear();
    }
}

impl<P> Provider for Window<P>
where
    P: Provider,
    P::Item: Clone,
{
    type Item = Vec<P::Item>;

    fn emit(&mut self, ctx: &Context) -> Result<Option<Vec<P::Item>>> {
        if self.done {
            return Ok(None);
        }
        loop {
            ctx.check()?;
            match self.upstream.emit(ctx)? {
                Some(item) => {
                    self.buffer.push(item);
                    self.fresh += 1;
                    if self.buffer.len() == self.config.size {
                        let window = self.buffer.clone();
                        self.slide();
                        return Ok(Some(window));
                    }
                }
                None => {
                    self.done = true;
                    if self.buffer.is_empty() || self.fresh == 0 || self.config.omit_partial {
                        return Ok(None);
                    }
                    self.fresh = 0;
                    return Ok(Some(std::mem::take(&mut self.buffer)));
                }
            }
        }
    }
}

impl<P> Rewindable for Window<P>
where
    P: Rewindable,
    P::Item: Clone,
{
}

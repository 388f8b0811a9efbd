//! Slicing and paging.

use seqflow_core::prelude::*;

pub struct Skip<P> {
    upstream: P,
    n: usize,
    skipped: usize,
}

impl<P> Skip<P> {
    pub fn new(upstream: P, n: usize) -> Self {
        Self {
            upstream,
            n,
            skipped: 0,
        }
    }
}

impl<P: Lifecycle> Lifecycle for Skip<P> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.skipped = 0;
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.upstream.close()
    }
}

impl<P: Provider> Provider for Skip<P> {
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        while self.skipped < self.n {
            ctx.check()?;
            if self.upstream.emit(ctx)?.is_none() {
                return Ok(None);
            }
            self.skipped += 1;
        }
        self.upstream.emit(ctx)
    }
}

impl<P: Rewindable> Rewindable for Skip<P> {}

/// Stops after `n` elements without pulling the upstream any further.
pub struct Take<P> {
    upstream: P,
    n: usize,
    taken: usize,
}

impl<P> Take<P> {
    pub fn new(upstream: P, n: usize) -> Self {
        Self {
            upstream,
            n,
            taken: 0,
        }
    }
}

impl<P: Lifecycle> Lifecycle for Take<P> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        self.taken = 0;
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.upstream.close()
    }
}

impl<P: Provider> Provider for Take<P> {
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        if self.taken >= self.n {
            return Ok(None);
        }
        let item = self.upstream.emit(ctx)?;
        if item.is_some() {
            self.taken += 1;
        }
        Ok(item)
    }
}

impl<P: Rewindable> Rewindable for Take<P> {}

/// Page `number` (0-based) of `size` elements.
pub struct Page<P> {
    inner: Take<Skip<P>>,
    number: usize,
    size: usize,
}

impl<P> Page<P> {
    pub fn new(upstream: P, number: usize, size: usize) -> Self {
        let offset = number.saturating_mul(size);
        Self {
            inner: Take::new(Skip::new(upstream, offset), size),
            number,
            size,
        }
    }
}

fn check_page(number: usize, size: usize) -> Result<usize> {
    if size == 0 {
        return Err(Error::config("page size must be > 0"));
    }
    number
        .checked_mul(size)
        .ok_or_else(|| Error::config(format!("page {number} of size {size} overflows")))
}

impl<P: Lifecycle> Lifecycle for Page<P> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        check_page(self.number, self.size)?;
        self.inner.open(ctx)
    }

    fn close(&mut self) {
        self.inner.close()
    }
}

impl<P: Provider> Provider for Page<P> {
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        self.inner.emit(ctx)
    }
}

impl<P: Rewindable> Rewindable for Page<P> {}

/// Random-access pages over a rewindable source. Every fetch re-opens the
/// source from its first element and closes it before returning.
pub struct Pager<P> {
    source: P,
    size: usize,
}

impl<P: Rewindable> Pager<P> {
    pub fn new(source: P, size: usize) -> Self {
        Self { source, size }
    }

    pub fn page_size(&self) -> usize {
        self.size
    }

    /// Elements of page `number`; empty once past the end.
    pub fn fetch(&mut self, ctx: &Context, number: usize) -> Result<Vec<P::Item>> {
        let offset = check_page(number, self.size)?;
        self.source.open(ctx)?;
        let out = self.read_page(ctx, offset);
        self.source.close();
        out
    }

    fn read_page(&mut self, ctx: &Context, offset: usize) -> Result<Vec<P::Item>> {
        for _ in 0..offset {
            ctx.check()?;
            if self.source.emit(ctx)?.is_none() {
                return Ok(Vec::new());
            }
        }
        let mut out = Vec::new();
        while out.len() < self.size {
            ctx.check()?;
            match self.source.emit(ctx)? {
                Some(item) => out.push(item),
                None => break,
            }
        }
        Ok(out)
    }

    pub fn into_inner(self) -> P {
        self.source
    }
}

//! Reservoir sampling (algorithm R).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use seqflow_core::prelude::*;

/// Seeded generator when `seed` is set, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform fixed-size sample over a stream of unknown length.
#[derive(Debug)]
pub struct Reservoir<T> {
    capacity: usize,
    seen: usize,
    items: Vec<T>,
    rng: StdRng,
}

impl<T> Reservoir<T> {
    pub fn new(capacity: usize, rng: StdRng) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("sample size must be > 0"));
        }
        Ok(Self {
            capacity,
            seen: 0,
            items: Vec::new(),
            rng,
        })
    }

    pub fn offer(&mut self, item: T) {
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else {
            let slot = self.rng.gen_range(0..=self.seen);
            if slot < self.capacity {
                self.items[slot] = item;
            }
        }
        self.seen += 1;
    }

    /// Elements offered so far.
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

/// Drains the upstream on the first `emit`, then emits the sample.
pub struct ReservoirSample<P: Provider> {
    upstream: P,
    size: usize,
    seed: Option<u64>,
    output: Option<std::vec::IntoIter<P::Item>>,
}

impl<P: Provider> ReservoirSample<P> {
    pub fn new(upstream: P, size: usize) -> Self {
        Self {
            upstream,
            size,
            seed: None,
            output: None,
        }
    }

    /// Fix the generator seed; every open then draws the same sample.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_config(upstream: P, size: usize, config: &EngineConfig) -> Self {
        Self {
            seed: config.seed,
            ..Self::new(upstream, size)
        }
    }

    fn fill(&mut self, ctx: &Context) -> Result<Vec<P::Item>> {
        let mut reservoir = Reservoir::new(self.size, rng_from_seed(self.seed))?;
        loop {
            ctx.check()?;
            match self.upstream.emit(ctx)? {
                Some(item) => reservoir.offer(item),
                None => break,
            }
        }
        tracing::trace!(seen = reservoir.seen(), size = self.size, "reservoir filled");
        Ok(reservoir.into_vec())
    }
}

impl<P: Provider> Lifecycle for ReservoirSample<P> {
    fn open(&mut self, ctx: &Context) -> Result<()> {
        if self.size == 0 {
            return Err(Error::config("sample size must be > 0"));
        }
        self.output = None;
        self.upstream.open(ctx)
    }

    fn close(&mut self) {
        self.upstream.close();
        self.output = None;
    }
}

impl<P: Provider> Provider for ReservoirSample<P> {
    type Item = P::Item;

    fn emit(&mut self, ctx: &Context) -> Result<Option<P::Item>> {
        if self.output.is_none() {
            let sample = self.fill(ctx)?;
            self.output = Some(sample.into_iter());
        }
        Ok(self.output.as_mut().and_then(Iterator::next))
    }
}

impl<P: Rewindable> Rewindable for ReservoirSample<P> {}

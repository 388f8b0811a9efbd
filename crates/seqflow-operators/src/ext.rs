//! Builder methods for every provider.

use seqflow_core::prelude::*;

use crate::attach::WithLifecycle;
use crate::concat::Chain;
use crate::filter::Filter;
use crate::flat_map::FlatMap;
use crate::map::{Inspect, Map, TryMap};
use crate::page::{Page, Skip, Take};
use crate::sample::ReservoirSample;
use crate::window::{Window, WindowConfig};

pub trait SequenceExt: Provider + Sized {
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: FnMut(Self::Item) -> U,
    {
        Map::new(self, f)
    }

    fn try_map<U, F>(self, f: F) -> TryMap<Self, F>
    where
        F: FnMut(Self::Item) -> Result<U>,
    {
        TryMap::new(self, f)
    }

    fn inspect<F>(self, f: F) -> Inspect<Self, F>
    where
        F: FnMut(&Self::Item),
    {
        Inspect::new(self, f)
    }

    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        Filter::new(self, predicate)
    }

    fn flat_map<Q, F>(self, f: F) -> FlatMap<Self, F, Q>
    where
        Q: Provider,
        F: FnMut(Self::Item) -> Q,
    {
        FlatMap::new(self, f)
    }

    fn chain<B>(self, other: B) -> Chain<Self, B>
    where
        B: Provider<Item = Self::Item>,
    {
        Chain::new(self, other)
    }

    fn skip(self, n: usize) -> Skip<Self> {
        Skip::new(self, n)
    }

    fn take(self, n: usize) -> Take<Self> {
        Take::new(self, n)
    }

    fn page(self, number: usize, size: usize) -> Page<Self> {
        Page::new(self, number, size)
    }

    fn window(self, config: WindowConfig) -> Window<Self> {
        Window::new(self, config)
    }

    fn sample(self, size: usize) -> ReservoirSample<Self> {
        ReservoirSample::new(self, size)
    }

    fn sample_seeded(self, size: usize, seed: u64) -> ReservoirSample<Self> {
        ReservoirSample::new(self, size).seeded(seed)
    }

    /// Open `element` before this sequence and close it after.
    fn with_lifecycle<L>(self, element: L) -> WithLifecycle<Self>
    where
        L: Lifecycle + Send + 'static,
    {
        WithLifecycle::new(self).attach(element)
    }

    fn boxed(self) -> Sequence<Self::Item>
    where
        Self: Send + 'static,
    {
        Sequence::new(self)
    }

    /// Like [`boxed`](SequenceExt::boxed), keeping the ability to rewind.
    fn boxed_rewindable(self) -> RewindableSequence<Self::Item>
    where
        Self: Rewindable + Send + 'static,
    {
        RewindableSequence::new(self)
    }
}

impl<P: Provider> SequenceExt for P {}

#![forbid(unsafe_code)]
//! seqflow-operators: lazy combinators over `Provider`s.
//!
//! Design intent:
//! - Everything here is single-threaded and pull-driven; the caller's
//!   `emit` is the only thing that moves data.
//! - Single-input combinators add no lifecycle element of their own. They
//!   delegate `open`/`close` to their upstream and forward `Rewindable`.
//! - Multi-input combinators (concat, merge, joins) open their inputs through
//!   a `LifecycleStack`, so a failing open unwinds the inputs already opened.
//! - Caller closures run under `catch_unwind`; a panic becomes `Error::Panic`.

pub mod attach;
pub mod concat;
pub mod ext;
pub mod filter;
pub mod flat_map;
pub mod join;
pub mod map;
pub mod merge;
pub mod page;
pub mod sample;
pub mod sorted;
pub mod window;

pub use attach::{BoxLifecycle, WithLifecycle};
pub use concat::{concat, Chain, Concat};
pub use ext::SequenceExt;
pub use filter::Filter;
pub use flat_map::FlatMap;
pub use join::{
    full_join, full_join_by, inner_join, inner_join_by, left_join, left_join_by, FullJoin,
    InnerJoin, Joined, LeftJoin, PairInnerJoin, PairLeftJoin,
};
pub use map::{Inspect, Map, TryMap};
pub use merge::{merge, merge_by, merge_by_key, Merge};
pub use page::{Page, Pager, Skip, Take};
pub use sample::{rng_from_seed, Reservoir, ReservoirSample};
pub use window::{Window, WindowConfig};

#![forbid(unsafe_code)]
//! seqflow-sources: in-memory leaf providers.
//!
//! File/SQL/HTTP adapters live outside this workspace; they only need to
//! implement `seqflow_core::provider::Provider`.

pub mod channel;
pub mod func;
pub mod iter;
pub mod vec;

pub use channel::{channel, ChannelSource};
pub use func::{empty, from_fn, once, Empty, FromFn, Once};
pub use iter::{from_iter, from_results, IterSource, TryIterSource};
pub use vec::{from_vec, VecSource};

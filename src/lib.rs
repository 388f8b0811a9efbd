#![forbid(unsafe_code)]
//! seqflow: lazy, pull-based, composable sequence processing.
//!
//! ```
//! use seqflow::prelude::*;
//!
//! let ctx = Context::new();
//! let windows = seqflow::sources::from_iter(|| 1..=7)
//!     .window(WindowConfig::new(3).step(1))
//!     .collect_vec(&ctx)
//!     .unwrap();
//! assert_eq!(windows.len(), 5);
//! ```
//!
//! The workspace is split the same way this facade is:
//! - [`core`]: the `Provider`/`Lifecycle` contract, cancellation, errors, config.
//! - [`sources`]: in-memory leaf providers.
//! - [`operators`]: combinators, sorted merge and joins, windows, sampling.
//! - [`exec`]: terminals, iterator bridge, concurrent mapping, buffering.

pub use seqflow_core as core;
pub use seqflow_exec as exec;
pub use seqflow_operators as operators;
pub use seqflow_sources as sources;

pub use seqflow_core::{Error, Result};

pub mod prelude {
    pub use seqflow_core::prelude::*;
    pub use seqflow_exec::ExecExt;
    pub use seqflow_operators::{Joined, SequenceExt, WindowConfig};
}

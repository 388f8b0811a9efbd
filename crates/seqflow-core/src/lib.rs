#![forbid(unsafe_code)]
//! seqflow-core: the pull/lifecycle contract shared by every seqflow crate.
//!
//! - `provider`: `Lifecycle` + `Provider` traits and the capability markers.
//! - `lifecycle`: ordered child composition with reverse-order unwind.
//! - `context`: cooperative cancellation tokens.
//! - `error`: the single error taxonomy that flows through every combinator.
//!
//! Keep deps minimal; no operators or threads in core.

pub mod compare;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod panic;
pub mod prelude;
pub mod provider;
pub mod sequence;

pub use error::{Error, Result};

//! Convenient re-exports for downstream crates.

pub use crate::compare::{Comparator, Natural};
pub use crate::config::EngineConfig;
pub use crate::context::{CancelToken, Context};
pub use crate::error::{Error, Result};
pub use crate::lifecycle::LifecycleStack;
pub use crate::provider::{FnLifecycle, Lifecycle, Provider, Rewindable, SingleUse};
pub use crate::sequence::{RewindableSequence, Sequence};

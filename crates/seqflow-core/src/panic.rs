//! Recover panics raised by caller-supplied closures at the pull boundary.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{Error, PanicError, Result};

/// Run `f`, converting a panic into `Error::Panic` tagged with `context`.
pub fn catch<R>(context: &'static str, f: impl FnOnce() -> R) -> Result<R> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        tracing::debug!(context, "recovered panic");
        Error::Panic(PanicError::new(context, payload))
    })
}

/// Like [`catch`] for closures that already return a `Result`.
pub fn catch_result<R>(context: &'static str, f: impl FnOnce() -> Result<R>) -> Result<R> {
    catch(context, f).and_then(|r| r)
}

use std::any::Any;
use std::fmt;
use std::sync::Mutex;

use thiserror::Error;

/// Canonical result for every seqflow crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed leaf error produced by an external provider.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors travel up the pull chain unchanged; the annotating variants only
/// record *where* a failure happened.
#[derive(Debug, Error)]
pub enum Error {
    #[error("sequence cancelled")]
    Cancelled,

    #[error("open failed at lifecycle index {index}: {source}")]
    Open {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("input {index} failed: {source}")]
    Input {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("input {input} is not sorted: value decreased against the previous one")]
    Unsorted { input: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Panic(PanicError),

    #[error("provider error: {0}")]
    Provider(#[source] BoxError),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn provider<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Provider(Box::new(err))
    }

    pub fn msg(msg: impl Into<String>) -> Self {
        Error::Message(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Wrap with the index of the lifecycle element that failed to open.
    pub fn at_open(self, index: usize) -> Self {
        Error::Open {
            index,
            source: Box::new(self),
        }
    }

    /// Wrap with the index of the join/merge input that failed.
    pub fn at_input(self, index: usize) -> Self {
        Error::Input {
            index,
            source: Box::new(self),
        }
    }

    /// Innermost error, looking through index annotations.
    pub fn root(&self) -> &Error {
        match self {
            Error::Open { source, .. } | Error::Input { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Error::Cancelled)
    }
}

/// A panic recovered from caller-supplied code, converted into an ordinary
/// error. The original payload is kept and can be taken back out.
pub struct PanicError {
    context: &'static str,
    message: String,
    payload: Mutex<Option<Box<dyn Any + Send + 'static>>>,
}

impl PanicError {
    pub fn new(context: &'static str, payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self {
            context,
            message,
            payload: Mutex::new(Some(payload)),
        }
    }

    /// Where the panic was caught (e.g. `"map"`, `"consume"`).
    pub fn context(&self) -> &'static str {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Take the original panic payload, e.g. to resume unwinding with it.
    /// Returns `None` once taken.
    pub fn take_payload(&self) -> Option<Box<dyn Any + Send + 'static>> {
        match self.payload.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl fmt::Debug for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicError")
            .field("context", &self.context)
            .field("message", &self.message)
            .finish()
    }
}

impl fmt::Display for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panic in {}: {}", self.context, self.message)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

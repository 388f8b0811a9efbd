#![forbid(unsafe_code)]
//! seqflow-exec: driving sequences and the two opt-in concurrency points.
//!
//! - `terminal` / `iter`: consume a sequence on the caller's thread.
//! - `concurrent`: bounded worker pool behind a fetch thread (unordered).
//! - `buffer`: one producer thread pulling ahead into a bounded queue.
//!
//! Background threads communicate only through bounded `crossbeam-channel`
//! queues, and every blocking queue operation also selects on a cancellation
//! token. Upstream `close` runs only after every background thread has been
//! joined.

mod background;

pub mod buffer;
pub mod concurrent;
pub mod ext;
pub mod iter;
pub mod terminal;

pub use buffer::Buffered;
pub use concurrent::ConcurrentMap;
pub use ext::ExecExt;
pub use iter::{iter, SeqIter};
pub use terminal::{collect, consume, count, first, fold, for_each, last, sample};

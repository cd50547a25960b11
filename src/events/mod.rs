//! # Events
//!
//! Synchronous publish/subscribe used by the opener registry to announce
//! completed opens and changes to the handler set.

pub mod emitter;
pub mod types;

pub use emitter::{Emitter, DEFAULT_STREAM_CAPACITY};
pub use types::UriOpenEvent;

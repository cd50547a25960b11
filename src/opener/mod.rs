//! # Opener
//!
//! Open handler contract and the service that votes between handlers.
//!
//! ```text
//! caller ──► OpenerService::open ──► prioritize_all(can_handle) ──► winner.open
//!                                                                      │
//!                                       on_uri_open listeners ◄────────┘
//! ```

pub mod handler;
pub mod service;

pub use handler::{OpenHandler, OpenedResource, OpenedResult, OpenerOptions};
pub use service::{OpenerService, OPEN_HANDLER};

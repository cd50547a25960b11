#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Opener Core
//!
//! Open handler resolution for the project IDE shell.
//!
//! ## Overview
//!
//! UI code asks the [`OpenerService`] to open a [`Uri`]. Every registered
//! [`OpenHandler`] bids on the uri concurrently; the highest bid wins, ties go
//! to the earliest registration, and the winner opens the resource. Completed
//! opens and changes to the handler set are announced through synchronous
//! [`Emitter`](events::Emitter)s.
//!
//! ## Module Organization
//!
//! - [`opener`] - Handler contract and the opener service
//! - [`prioritizer`] - Concurrent scoring and ranking
//! - [`registry`] - Capability-keyed static contributions
//! - [`events`] - Publish/subscribe channels
//! - [`uri`] - Resource locator
//! - [`disposable`] - Teardown handles
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use async_trait::async_trait;
//! use opener_core::error::BoxError;
//! use opener_core::opener::{OpenHandler, OpenedResult, OpenerOptions, OpenerService, OPEN_HANDLER};
//! use opener_core::registry::ContributionRegistry;
//! use opener_core::Uri;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct ExternalLink;
//!
//! #[async_trait]
//! impl OpenHandler for ExternalLink {
//!     fn handler_id(&self) -> &str {
//!         "external-link"
//!     }
//!
//!     async fn can_handle(&self, uri: &Uri, _: Option<&OpenerOptions>) -> Result<f64, BoxError> {
//!         Ok(if uri.scheme() == "https" { 1.0 } else { 0.0 })
//!     }
//!
//!     async fn open(&self, _: &Uri, _: Option<&OpenerOptions>) -> Result<OpenedResult, BoxError> {
//!         Ok(None)
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let registry = ContributionRegistry::builder()
//!     .bind(OPEN_HANDLER, || Arc::new(ExternalLink) as Arc<dyn OpenHandler>)
//!     .build();
//! let opener = OpenerService::from_registry(&registry)?;
//!
//! let opened = opener.open(&Uri::new("https://example.com"), None).await?;
//! assert!(opened.is_none());
//!
//! let missing = opener.open(&Uri::new("ftp://example.com"), None).await;
//! assert!(missing.unwrap_err().is_no_opener());
//! # Ok::<(), opener_core::OpenerError>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod disposable;
pub mod error;
pub mod events;
pub mod logging;
pub mod opener;
pub mod prioritizer;
pub mod registry;
pub mod uri;

pub use config::OpenerConfig;
pub use disposable::Disposable;
pub use error::{BoxError, OpenerError, OpenerResult};
pub use events::{Emitter, UriOpenEvent};
pub use opener::{OpenHandler, OpenedResource, OpenedResult, OpenerOptions, OpenerService, OPEN_HANDLER};
pub use prioritizer::{prioritize_all, prioritize_all_sync, Prioritized};
pub use registry::{Capability, ContributionProvider, ContributionRegistry};
pub use uri::Uri;

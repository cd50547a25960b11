//! # Open Handler Contract
//!
//! An open handler answers two questions about a [`Uri`]: how well it can open
//! it, and (if it wins the vote) what opening it produces.
//!
//! ## Priority Contract
//!
//! `can_handle` returns a priority. Anything strictly positive is a bid; zero,
//! negative or NaN means "not mine". Returning `Err` (or panicking) is treated
//! exactly like returning zero: the registry logs it and moves on.
//!
//! `open` is only called on the highest bidder. Its error, if any, reaches the
//! caller unchanged; there is no fallback to the runner-up.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use opener_core::error::BoxError;
//! use opener_core::opener::{OpenHandler, OpenedResource, OpenerOptions};
//! use opener_core::Uri;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct MarkdownPreview;
//!
//! #[derive(Debug)]
//! struct PreviewWidget(String);
//!
//! impl OpenedResource for PreviewWidget {
//!     fn resource_name(&self) -> &str {
//!         &self.0
//!     }
//! }
//!
//! #[async_trait]
//! impl OpenHandler for MarkdownPreview {
//!     fn handler_id(&self) -> &str {
//!         "markdown-preview"
//!     }
//!
//!     async fn can_handle(&self, uri: &Uri, _options: Option<&OpenerOptions>) -> Result<f64, BoxError> {
//!         Ok(if uri.path().ends_with(".md") { 200.0 } else { 0.0 })
//!     }
//!
//!     async fn open(
//!         &self,
//!         uri: &Uri,
//!         _options: Option<&OpenerOptions>,
//!     ) -> Result<Option<Arc<dyn OpenedResource>>, BoxError> {
//!         Ok(Some(Arc::new(PreviewWidget(uri.display_name().to_string()))))
//!     }
//! }
//! ```

use crate::error::BoxError;
use crate::uri::Uri;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Open-ended options forwarded untouched from caller to handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenerOptions {
    values: HashMap<String, Value>,
}

impl OpenerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl From<HashMap<String, Value>> for OpenerOptions {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}

/// Whatever a handler produced by opening a resource (a widget, an editor).
pub trait OpenedResource: Send + Sync + fmt::Debug {
    /// Name for logging.
    fn resource_name(&self) -> &str;
}

/// Result of a successful open. `None` means the handler acted without
/// producing an object, e.g. it navigated to a page.
pub type OpenedResult = Option<Arc<dyn OpenedResource>>;

#[async_trait]
pub trait OpenHandler: Send + Sync + fmt::Debug {
    /// Stable identifier for logging and for UIs listing alternatives.
    fn handler_id(&self) -> &str;

    /// Bid for `uri`. Positive values are bids; higher wins.
    async fn can_handle(&self, uri: &Uri, options: Option<&OpenerOptions>)
        -> Result<f64, BoxError>;

    /// Open `uri`. Only called after a positive bid from `can_handle`.
    async fn open(&self, uri: &Uri, options: Option<&OpenerOptions>)
        -> Result<OpenedResult, BoxError>;
}

//! # Opener Service
//!
//! Picks the open handler for a [`Uri`] by letting every registered handler
//! bid through [`OpenHandler::can_handle`] and invoking the highest bidder.
//!
//! ## Resolution Flow
//!
//! ```text
//! open(uri, options)
//!        │
//!   ┌────▼──────────────┐      ┌──────────────────────────┐
//!   │ snapshot handlers │─────►│ prioritize_all           │
//!   │ static ∪ dynamic  │      │ (concurrent can_handle,  │
//!   └───────────────────┘      │  errors score 0)         │
//!                              └────────────┬─────────────┘
//!                        empty ◄────────────┤
//!                          │                ▼ first
//!                   NoOpener error    handler.open(uri, options)
//!                                           │ Ok
//!                                           ▼
//!                                  fire UriOpenEvent, return
//! ```
//!
//! ## Handler Sources
//!
//! Static handlers come from a [`ContributionProvider`] bound under
//! [`OPEN_HANDLER`] and are queried on every call. Dynamic handlers are added
//! with [`OpenerService::add_handler`] and removed by disposing the returned
//! handle. Static handlers rank ahead of dynamic ones when scores tie.

use super::handler::{OpenHandler, OpenedResult, OpenerOptions};
use crate::config::OpenerConfig;
use crate::disposable::Disposable;
use crate::error::{OpenerError, OpenerResult};
use crate::events::{Emitter, UriOpenEvent, DEFAULT_STREAM_CAPACITY};
use crate::logging::{log_error, log_opener_operation};
use crate::prioritizer::{prioritize_all, Prioritized};
use crate::registry::{Capability, ContributionProvider, ContributionRegistry};
use crate::uri::Uri;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Capability under which open handlers are contributed.
pub const OPEN_HANDLER: Capability<dyn OpenHandler> = Capability::new("OpenHandler");

struct DynamicHandler {
    registration_id: u64,
    handler: Arc<dyn OpenHandler>,
}

/// Registry and dispatcher for open handlers.
///
/// `OpenerService` is `Send + Sync`; share it behind an `Arc`. No lock is
/// held while handlers run, so handlers and event listeners may call back
/// into the service.
pub struct OpenerService {
    handlers_provider: Arc<dyn ContributionProvider<dyn OpenHandler>>,
    dynamic_handlers: Arc<RwLock<Vec<DynamicHandler>>>,
    next_registration_id: AtomicU64,
    dedupe_handlers: bool,
    on_did_change_openers: Emitter<()>,
    on_uri_open: Emitter<UriOpenEvent>,
}

impl OpenerService {
    pub fn new(handlers_provider: Arc<dyn ContributionProvider<dyn OpenHandler>>) -> Self {
        Self::build(handlers_provider, DEFAULT_STREAM_CAPACITY, true)
    }

    pub fn with_config(
        handlers_provider: Arc<dyn ContributionProvider<dyn OpenHandler>>,
        config: &OpenerConfig,
    ) -> Self {
        Self::build(
            handlers_provider,
            config.event_channel_capacity,
            config.dedupe_handlers,
        )
    }

    /// Service over the handlers bound to [`OPEN_HANDLER`] in `registry`.
    pub fn from_registry(registry: &ContributionRegistry) -> OpenerResult<Self> {
        let provider = registry.provider(OPEN_HANDLER)?;
        Ok(Self::new(provider))
    }

    fn build(
        handlers_provider: Arc<dyn ContributionProvider<dyn OpenHandler>>,
        event_capacity: usize,
        dedupe_handlers: bool,
    ) -> Self {
        Self {
            handlers_provider,
            dynamic_handlers: Arc::new(RwLock::new(Vec::new())),
            next_registration_id: AtomicU64::new(0),
            dedupe_handlers,
            on_did_change_openers: Emitter::with_capacity(event_capacity),
            on_uri_open: Emitter::with_capacity(event_capacity),
        }
    }

    /// Open `uri` with the best-scoring handler.
    ///
    /// Fails with [`OpenerError::NoOpener`] when no handler bids, or with
    /// [`OpenerError::HandlerOpen`] carrying the winner's own error. The
    /// [`UriOpenEvent`] fires only after the handler succeeded.
    #[instrument(skip(self, uri, options), fields(uri = %uri))]
    pub async fn open(&self, uri: &Uri, options: Option<&OpenerOptions>) -> OpenerResult<OpenedResult> {
        let opener = self.get_opener(uri, options).await?;

        let result = match opener.open(uri, options).await {
            Ok(result) => result,
            Err(error) => {
                log_error(
                    "opener_service",
                    "open",
                    &error.to_string(),
                    Some(opener.handler_id()),
                );
                return Err(OpenerError::HandlerOpen(error));
            }
        };

        log_opener_operation(
            "open",
            uri.as_str(),
            Some(opener.handler_id()),
            "completed",
            result.as_ref().map(|opened| opened.resource_name()),
        );

        self.on_uri_open
            .fire(&UriOpenEvent::new(uri.clone(), options.cloned()));
        Ok(result)
    }

    /// The highest-ranked handler for `uri`.
    #[instrument(skip(self, uri, options), fields(uri = %uri))]
    pub async fn get_opener(
        &self,
        uri: &Uri,
        options: Option<&OpenerOptions>,
    ) -> OpenerResult<Arc<dyn OpenHandler>> {
        self.prioritize(uri, options)
            .await
            .into_iter()
            .next()
            .ok_or_else(|| {
                debug!("No handler bid for uri");
                OpenerError::no_opener(uri)
            })
    }

    /// With a uri: every bidding handler, best first. Without: all handlers,
    /// unranked.
    #[instrument(skip(self, uri, options), fields(uri = uri.map(tracing::field::display)))]
    pub async fn get_openers(
        &self,
        uri: Option<&Uri>,
        options: Option<&OpenerOptions>,
    ) -> Vec<Arc<dyn OpenHandler>> {
        match uri {
            Some(uri) => self.prioritize(uri, options).await,
            None => self.get_handlers(),
        }
    }

    /// Register a handler at runtime.
    ///
    /// Each call creates an independent registration, even for a handler that
    /// is already registered. Disposing the handle removes exactly that
    /// registration; disposing again does nothing.
    pub fn add_handler(&self, handler: Arc<dyn OpenHandler>) -> Disposable {
        let registration_id = self.next_registration_id.fetch_add(1, Ordering::Relaxed);
        let handler_id = handler.handler_id().to_string();

        self.dynamic_handlers.write().push(DynamicHandler {
            registration_id,
            handler,
        });
        info!(handler = %handler_id, registration_id, "Added open handler");
        self.on_did_change_openers.fire(&());

        let handlers = Arc::downgrade(&self.dynamic_handlers);
        let changed = self.on_did_change_openers.clone();
        Disposable::new(move || {
            let Some(handlers) = handlers.upgrade() else {
                return;
            };
            let removed = {
                let mut handlers = handlers.write();
                let before = handlers.len();
                handlers.retain(|entry| entry.registration_id != registration_id);
                handlers.len() != before
            };
            if removed {
                info!(handler = %handler_id, registration_id, "Removed open handler");
                changed.fire(&());
            }
        })
    }

    /// Fires after a handler finished opening a uri.
    pub fn on_uri_open(&self) -> &Emitter<UriOpenEvent> {
        &self.on_uri_open
    }

    /// Fires whenever a dynamic handler is added or removed.
    pub fn on_did_change_openers(&self) -> &Emitter<()> {
        &self.on_did_change_openers
    }

    pub fn handler_count(&self) -> usize {
        self.get_handlers().len()
    }

    async fn prioritize(
        &self,
        uri: &Uri,
        options: Option<&OpenerOptions>,
    ) -> Vec<Arc<dyn OpenHandler>> {
        let handlers = self.get_handlers();
        let candidates = handlers.len();

        let ranked = prioritize_all(handlers, |handler| {
            let handler = Arc::clone(handler);
            async move { handler.can_handle(uri, options).await }
        })
        .await;

        debug!(
            candidates,
            ranking = %RankingSummary(&ranked),
            "Ranked open handlers"
        );

        ranked.into_iter().map(Prioritized::into_value).collect()
    }

    /// Static contributions followed by dynamic registrations.
    fn get_handlers(&self) -> Vec<Arc<dyn OpenHandler>> {
        let mut handlers = self.handlers_provider.get_contributions();
        {
            let dynamic = self.dynamic_handlers.read();
            handlers.extend(dynamic.iter().map(|entry| Arc::clone(&entry.handler)));
        }

        if self.dedupe_handlers {
            let mut unique: Vec<Arc<dyn OpenHandler>> = Vec::with_capacity(handlers.len());
            for handler in handlers {
                if !unique.iter().any(|seen| same_handler(seen, &handler)) {
                    unique.push(handler);
                }
            }
            unique
        } else {
            handlers
        }
    }
}

/// Identity comparison on the data pointer only.
fn same_handler(a: &Arc<dyn OpenHandler>, b: &Arc<dyn OpenHandler>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

struct RankingSummary<'a>(&'a [Prioritized<Arc<dyn OpenHandler>>]);

impl fmt::Display for RankingSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, candidate) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", candidate.value.handler_id(), candidate.priority)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for OpenerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenerService")
            .field("dynamic_handlers", &self.dynamic_handlers.read().len())
            .field("dedupe_handlers", &self.dedupe_handlers)
            .field("on_did_change_openers", &self.on_did_change_openers)
            .field("on_uri_open", &self.on_uri_open)
            .finish()
    }
}

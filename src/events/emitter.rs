use crate::disposable::Disposable;
use parking_lot::RwLock;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{error, trace};

/// Default capacity of the broadcast stream behind each emitter.
pub const DEFAULT_STREAM_CAPACITY: usize = 256;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Publish/subscribe channel with synchronous delivery.
///
/// [`fire`](Emitter::fire) calls every listener registered at the moment of
/// firing, in subscription order, on the caller's thread. Listeners added or
/// removed while a delivery is in progress take effect from the next fire.
/// A panicking listener is logged and skipped; the remaining listeners still
/// receive the event.
///
/// Async consumers can call [`stream`](Emitter::stream) instead and receive
/// the same events through a bounded `tokio::sync::broadcast` channel.
pub struct Emitter<T> {
    inner: Arc<EmitterInner<T>>,
}

struct EmitterInner<T> {
    listeners: RwLock<Vec<(u64, Listener<T>)>>,
    next_listener_id: AtomicU64,
    sender: broadcast::Sender<T>,
}

impl<T> Emitter<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STREAM_CAPACITY)
    }

    /// Create an emitter whose broadcast stream buffers `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(EmitterInner {
                listeners: RwLock::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                sender,
            }),
        }
    }

    /// Register a listener. Disposing the returned handle unsubscribes it.
    pub fn subscribe<F>(&self, listener: F) -> Disposable
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.write().push((id, Arc::new(listener)));

        let weak: Weak<EmitterInner<T>> = Arc::downgrade(&self.inner);
        Disposable::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.write().retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Receive events asynchronously. Slow receivers observe
    /// `RecvError::Lagged` rather than slowing down `fire`.
    pub fn stream(&self) -> broadcast::Receiver<T> {
        self.inner.sender.subscribe()
    }

    pub fn fire(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = self
            .inner
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        trace!(listeners = snapshot.len(), "Delivering event");

        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!("Event listener panicked; continuing delivery");
            }
        }

        if self.inner.sender.receiver_count() > 0 {
            // No receivers left between the check and the send is fine.
            let _ = self.inner.sender.send(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }

    pub fn stream_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Emitter<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.inner.listeners.read().len())
            .field("streams", &self.inner.sender.receiver_count())
            .finish()
    }
}

//! One-shot teardown handles.
//!
//! A [`Disposable`] is returned by every registration in the crate (dynamic
//! handlers, event listeners). Disposal runs the teardown at most once;
//! dropping the handle without calling [`Disposable::dispose`] leaves the
//! registration in place.

use parking_lot::Mutex;
use std::fmt;

type Teardown = Box<dyn FnOnce() + Send + 'static>;

pub struct Disposable {
    teardown: Mutex<Option<Teardown>>,
}

impl Disposable {
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// A handle with nothing to tear down.
    pub fn noop() -> Self {
        Self {
            teardown: Mutex::new(None),
        }
    }

    /// Run the teardown. Subsequent calls do nothing.
    pub fn dispose(&self) {
        // Take under the lock, run outside it: teardowns may fire events.
        let teardown = self.teardown.lock().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.teardown.lock().is_none()
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

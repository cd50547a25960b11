use async_trait::async_trait;
use opener_core::error::BoxError;
use opener_core::opener::{OpenHandler, OpenedResource, OpenedResult, OpenerOptions};
use opener_core::Uri;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How a mock handler answers `can_handle`
#[derive(Debug, Clone)]
pub enum MockScore {
    Fixed(f64),
    /// Score only uris with this scheme
    Scheme(String, f64),
    Delayed(f64, Duration),
    Fails(String),
    Panics,
}

/// How a mock handler answers `open`
#[derive(Debug, Clone)]
pub enum MockOpen {
    Widget(String),
    Nothing,
    Fails(String),
}

#[derive(Debug)]
pub struct MockWidget {
    pub name: String,
}

impl OpenedResource for MockWidget {
    fn resource_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockHandlerError(pub String);

/// Open handler with scripted behavior that records how it was called
#[derive(Debug)]
pub struct MockHandler {
    pub id: String,
    pub score: MockScore,
    pub on_open: MockOpen,
    pub can_handle_calls: AtomicUsize,
    pub opened: Mutex<Vec<(Uri, Option<OpenerOptions>)>>,
}

impl MockHandler {
    pub fn new(id: &str, score: MockScore, on_open: MockOpen) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            score,
            on_open,
            can_handle_calls: AtomicUsize::new(0),
            opened: Mutex::new(Vec::new()),
        })
    }

    /// Handler with a fixed score that opens a widget named `<id>-widget`
    pub fn scoring(id: &str, score: f64) -> Arc<Self> {
        Self::new(id, MockScore::Fixed(score), MockOpen::Widget(format!("{id}-widget")))
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().len()
    }

    pub fn can_handle_count(&self) -> usize {
        self.can_handle_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OpenHandler for MockHandler {
    fn handler_id(&self) -> &str {
        &self.id
    }

    async fn can_handle(
        &self,
        uri: &Uri,
        _options: Option<&OpenerOptions>,
    ) -> Result<f64, BoxError> {
        self.can_handle_calls.fetch_add(1, Ordering::SeqCst);
        match &self.score {
            MockScore::Fixed(score) => Ok(*score),
            MockScore::Scheme(scheme, score) => {
                Ok(if uri.scheme() == scheme { *score } else { 0.0 })
            }
            MockScore::Delayed(score, delay) => {
                tokio::time::sleep(*delay).await;
                Ok(*score)
            }
            MockScore::Fails(message) => Err(Box::new(MockHandlerError(message.clone()))),
            MockScore::Panics => panic!("{} can_handle panicked", self.id),
        }
    }

    async fn open(
        &self,
        uri: &Uri,
        options: Option<&OpenerOptions>,
    ) -> Result<OpenedResult, BoxError> {
        self.opened.lock().push((uri.clone(), options.cloned()));
        match &self.on_open {
            MockOpen::Widget(name) => Ok(Some(Arc::new(MockWidget { name: name.clone() }))),
            MockOpen::Nothing => Ok(None),
            MockOpen::Fails(message) => Err(Box::new(MockHandlerError(message.clone()))),
        }
    }
}

pub fn as_handlers(handlers: &[&Arc<MockHandler>]) -> Vec<Arc<dyn OpenHandler>> {
    handlers
        .iter()
        .map(|handler| Arc::clone(*handler) as Arc<dyn OpenHandler>)
        .collect()
}

pub fn handler_ids(handlers: &[Arc<dyn OpenHandler>]) -> Vec<String> {
    handlers
        .iter()
        .map(|handler| handler.handler_id().to_string())
        .collect()
}

use crate::opener::OpenerOptions;
use crate::uri::Uri;
use chrono::{DateTime, Utc};

/// Published after a handler finished opening a resource successfully.
#[derive(Debug, Clone)]
pub struct UriOpenEvent {
    pub uri: Uri,
    pub options: Option<OpenerOptions>,
    pub opened_at: DateTime<Utc>,
}

impl UriOpenEvent {
    pub fn new(uri: Uri, options: Option<OpenerOptions>) -> Self {
        Self {
            uri,
            options,
            opened_at: Utc::now(),
        }
    }
}

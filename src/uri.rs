//! # Resource Locator
//!
//! Immutable, cheaply cloneable reference to a resource. The opener registry
//! treats a [`Uri`] as an opaque key and only ever renders it for error
//! messages; the component accessors exist for open handlers that want to
//! match on scheme or path.
//!
//! Any string is a valid locator. Absolute references are parsed with
//! [`url::Url`], so components come back normalized (lowercase scheme and
//! host). Relative references stay opaque: every component is empty and the
//! derived-value constructors return them unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use url::{Position, Url};

#[derive(Clone)]
pub struct Uri {
    inner: Arc<UriInner>,
}

struct UriInner {
    raw: String,
    parsed: Option<Url>,
}

impl Uri {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = Url::parse(&raw).ok();
        Self {
            inner: Arc::new(UriInner { raw, parsed }),
        }
    }

    /// Assemble a locator from its components.
    pub fn from_components(
        scheme: &str,
        authority: Option<&str>,
        path: &str,
        query: Option<&str>,
        fragment: Option<&str>,
    ) -> Self {
        let mut raw = String::new();
        if !scheme.is_empty() {
            raw.push_str(scheme);
            raw.push(':');
        }
        if let Some(authority) = authority {
            raw.push_str("//");
            raw.push_str(authority);
            if !path.is_empty() && !path.starts_with('/') {
                raw.push('/');
            }
        }
        raw.push_str(path);
        if let Some(query) = query {
            raw.push('?');
            raw.push_str(query);
        }
        if let Some(fragment) = fragment {
            raw.push('#');
            raw.push_str(fragment);
        }
        Self::new(raw)
    }

    /// The text the locator was created from.
    pub fn as_str(&self) -> &str {
        &self.inner.raw
    }

    /// Parsed form, or `None` for a relative reference.
    pub fn as_url(&self) -> Option<&Url> {
        self.inner.parsed.as_ref()
    }

    pub fn is_relative(&self) -> bool {
        self.inner.parsed.is_none()
    }

    /// Lowercase scheme without the trailing `:`; empty for relative references.
    pub fn scheme(&self) -> &str {
        self.as_url().map_or("", Url::scheme)
    }

    pub fn authority(&self) -> Option<&str> {
        self.as_url()
            .filter(|url| url.has_authority())
            .map(|url| &url[Position::BeforeUsername..Position::AfterPort])
    }

    pub fn path(&self) -> &str {
        self.as_url().map_or("", Url::path)
    }

    pub fn query(&self) -> Option<&str> {
        self.as_url().and_then(Url::query)
    }

    pub fn fragment(&self) -> Option<&str> {
        self.as_url().and_then(Url::fragment)
    }

    /// Last non-empty path segment, falling back to the full text.
    pub fn display_name(&self) -> &str {
        self.path()
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or_else(|| self.as_str())
    }

    pub fn with_path(&self, path: &str) -> Self {
        self.derive(|url| url.set_path(path))
    }

    pub fn with_query(&self, query: Option<&str>) -> Self {
        self.derive(|url| url.set_query(query))
    }

    pub fn with_fragment(&self, fragment: Option<&str>) -> Self {
        self.derive(|url| url.set_fragment(fragment))
    }

    /// Append path segments, inserting a single `/` separator. Locators
    /// without a hierarchical path are returned unchanged.
    pub fn join(&self, segment: &str) -> Self {
        self.derive(|url| {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments
                    .pop_if_empty()
                    .extend(segment.split('/').filter(|part| !part.is_empty()));
            }
        })
    }

    fn derive(&self, edit: impl FnOnce(&mut Url)) -> Self {
        match self.as_url() {
            Some(url) => {
                let mut url = url.clone();
                edit(&mut url);
                Self::from(url)
            }
            None => self.clone(),
        }
    }

    /// Comparison key: the normalized serialization when parsed.
    fn key(&self) -> &str {
        self.as_url().map_or(self.as_str(), Url::as_str)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Uri").field(&self.as_str()).finish()
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Uri {}

impl Hash for Uri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Uri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

impl From<&str> for Uri {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Uri {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<Url> for Uri {
    fn from(url: Url) -> Self {
        Self {
            inner: Arc::new(UriInner {
                raw: url.as_str().to_string(),
                parsed: Some(url),
            }),
        }
    }
}

impl Serialize for Uri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Uri::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_full_uri_components() {
        let uri = Uri::new("https://studio.example.com/space/42/bot?tab=prompt#section-2");
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.authority(), Some("studio.example.com"));
        assert_eq!(uri.path(), "/space/42/bot");
        assert_eq!(uri.query(), Some("tab=prompt"));
        assert_eq!(uri.fragment(), Some("section-2"));
        assert_eq!(uri.display_name(), "bot");
        assert!(!uri.is_relative());
    }

    #[test]
    fn test_scheme_without_authority() {
        let uri = Uri::new("workflow:/flows/7f3a");
        assert_eq!(uri.scheme(), "workflow");
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.path(), "/flows/7f3a");
        assert_eq!(uri.query(), None);
    }

    #[test]
    fn test_scheme_and_host_are_case_insensitive() {
        let shouted = Uri::new("HTTPS://Example.com/a");
        let quiet = Uri::new("https://example.com/a");

        assert_eq!(shouted.scheme(), "https");
        assert_eq!(shouted.authority(), Some("example.com"));
        assert_eq!(shouted, quiet);
        assert_eq!(shouted.to_string(), "HTTPS://Example.com/a");

        let set: HashSet<Uri> = [shouted, quiet].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_relative_reference_is_opaque() {
        let uri = Uri::new("docs/readme.md");
        assert!(uri.is_relative());
        assert_eq!(uri.scheme(), "");
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.path(), "");
        assert_eq!(uri.query(), None);
        assert_eq!(uri.display_name(), "docs/readme.md");

        // A colon after a slash is not a scheme separator
        assert!(Uri::new("./a:b").is_relative());
    }

    #[test]
    fn test_derived_values_of_relative_reference_are_unchanged() {
        let empty = Uri::new("");
        let joined = empty.join("c:foo");
        assert_eq!(joined.scheme(), "");
        assert_eq!(joined.as_str(), "");
        assert_eq!(Uri::new("docs").with_path("/x"), Uri::new("docs"));
    }

    #[test]
    fn test_fragment_containing_question_mark() {
        let uri = Uri::new("file:///a.txt#what?");
        assert_eq!(uri.query(), None);
        assert_eq!(uri.fragment(), Some("what?"));
        assert_eq!(uri.authority(), Some(""));
        assert_eq!(uri.path(), "/a.txt");
    }

    #[test]
    fn test_derived_uris_leave_original_untouched() {
        let uri = Uri::new("file:///workspace/src?rev=1");
        let joined = uri.join("main.rs");
        let no_query = joined.with_query(None);
        let anchored = no_query.with_fragment(Some("L10"));

        assert_eq!(uri.as_str(), "file:///workspace/src?rev=1");
        assert_eq!(joined.as_str(), "file:///workspace/src/main.rs?rev=1");
        assert_eq!(no_query.as_str(), "file:///workspace/src/main.rs");
        assert_eq!(anchored.as_str(), "file:///workspace/src/main.rs#L10");
        assert_eq!(anchored.with_path("/other").path(), "/other");
        assert_eq!(uri.join("/nested/deeper/").path(), "/workspace/src/nested/deeper");
    }

    #[test]
    fn test_from_components_keeps_scheme() {
        let uri = Uri::from_components("https", Some("example.com"), "docs", Some("q=1"), None);
        assert_eq!(uri.as_str(), "https://example.com/docs?q=1");
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.path(), "/docs");
    }

    #[test]
    fn test_equality_ordering_and_display() {
        let a = Uri::from("file:///a");
        let b = Uri::from("file:///b".to_string());
        assert_eq!(a, Uri::new("file:///a"));
        assert!(a < b);
        assert_eq!(format!("{a}"), "file:///a");
        assert_eq!(format!("{a:?}"), "Uri(\"file:///a\")");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let uri = Uri::new("plugin://store/123");
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, "\"plugin://store/123\"");
        let back: Uri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uri);
    }
}

//! Query-string and request-URL encoding.
//!
//! Every operation with optional parameters owns an options type that
//! implements [`QueryParameters`]. Encoding is a pure function of the options
//! value and follows the same rules everywhere:
//!
//! - a boolean contributes `key=1` when true and nothing when false;
//! - a string contributes its key only when non-empty, unless the engine
//!   requires the key unconditionally ([`Query::always`]);
//! - a number contributes its key only when explicitly set, rendered as a
//!   signed decimal (`Some(0)` is sent, `None` is not);
//! - a list repeats its key once per value, in caller order.
//!
//! Keys are emitted in sorted order so the encoded string does not depend on
//! the order parameters were added in.

use url::{form_urlencoded, Url};

use crate::error::Result;

/// Every request targets this placeholder origin; the transport ignores it and
/// dials the configured local endpoint.
pub const BASE_URL: &str = "http://localhost";

/// Encodes an options value into query parameters.
pub trait QueryParameters {
    fn to_query(&self) -> Query;
}

/// An ordered multiset of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key=1` when `enabled`.
    pub fn flag(&mut self, key: &'static str, enabled: bool) -> &mut Self {
        if enabled {
            self.pairs.push((key, "1".to_owned()));
        }
        self
    }

    /// Adds `key=value` when `value` is non-empty.
    pub fn non_empty(&mut self, key: &'static str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.pairs.push((key, value.to_owned()));
        }
        self
    }

    /// Adds `key=value` even when `value` is empty.
    pub fn always(&mut self, key: &'static str, value: &str) -> &mut Self {
        self.pairs.push((key, value.to_owned()));
        self
    }

    /// Adds `key=<n>` when a number is set.
    pub fn number(&mut self, key: &'static str, value: Option<i64>) -> &mut Self {
        if let Some(n) = value {
            self.pairs.push((key, n.to_string()));
        }
        self
    }

    /// Adds `key=<v>` once per value, preserving order.
    pub fn repeated(&mut self, key: &'static str, values: &[String]) -> &mut Self {
        self.pairs.extend(values.iter().map(|v| (key, v.clone())));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Form-urlencodes the parameters, sorted by key.
    ///
    /// The sort is stable, so repeated keys keep their insertion order.
    pub fn encode(&self) -> String {
        let mut pairs: Vec<_> = self.pairs.iter().collect();
        pairs.sort_by_key(|(k, _)| *k);

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

/// Builds the request URL for `segments` below [`BASE_URL`].
///
/// Each segment is percent-encoded on its own, so an identifier can never
/// inject a path separator or a query string.
pub fn request_url(segments: &[&str], query: &Query) -> Result<Url> {
    let mut url = Url::parse(BASE_URL)?;
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    if !query.is_empty() {
        url.set_query(Some(&query.encode()));
    }
    Ok(url)
}

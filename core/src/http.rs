//! HTTP messages described as plain data.
//!
//! # Design
//! Bodies are `serde_json::Value`s because every message on this wire is
//! JSON. Headers keep insertion order so serialization is byte-exact and
//! deterministic; a repeated key replaces the earlier value in place.

use serde_json::{json, Value};

/// Ordered header mapping with last-value-wins semantics.
///
/// Keys are compared exactly, without case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set `key` to `value`. An existing entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// An outgoing HTTP request.
///
/// `path` may be a full endpoint (`http://host:port/path`) or just a path;
/// the codec resolves it through `Url::parse` when serializing.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: Headers,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A received HTTP response.
///
/// Always carries a status. Failures anywhere between connecting and decoding
/// surface as status 500 with an `{"error": ...}` body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Headers, body: Option<Value>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A status-500 response whose body is `{"error": message}`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(500, Headers::new(), Some(json!({ "error": message.into() })))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` field of the body, if there is one.
    pub fn error_message(&self) -> Option<&str> {
        self.body.as_ref()?.get("error")?.as_str()
    }
}

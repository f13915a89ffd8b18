//! Inbound request snapshot shared by both backend calls

use bytes::Bytes;
use reqwest::header::{self, HeaderMap};
use reqwest::Method;

/// Headers the outbound client computes itself
static RECOMPUTED_HEADERS: [header::HeaderName; 4] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// One mirrored request, fully buffered
///
/// The body is read once from the inbound connection and held as [`Bytes`];
/// each backend call gets its own handle onto the same immutable buffer, so
/// neither side can drain the body for the other.
#[derive(Debug, Clone)]
pub struct ReplayedRequest {
    pub method: Method,
    /// Path plus optional `?query`, exactly as received
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ReplayedRequest {
    pub fn new(
        method: Method,
        path_and_query: impl Into<String>,
        headers: HeaderMap,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            method,
            path_and_query: path_and_query.into(),
            headers,
            body: body.into(),
        }
    }

    pub fn path(&self) -> &str {
        match self.path_and_query.split_once('?') {
            Some((path, _)) => path,
            None => &self.path_and_query,
        }
    }

    /// Raw query string without the leading `?`, empty if there is none
    pub fn query(&self) -> &str {
        match self.path_and_query.split_once('?') {
            Some((_, query)) => query,
            None => "",
        }
    }

    /// Inbound headers minus the ones tied to the inbound connection
    pub fn forwarded_headers(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        for name in &RECOMPUTED_HEADERS {
            headers.remove(name);
        }
        headers
    }
}

//! # Requests
//!
//! An already-parsed HTTP/1.1 request. Parsing bytes off the wire happens elsewhere;
//! this module only models the result and the lookups resolvers need (headers by
//! name, query parameters, body text).
//!
//! Requests are immutable values built fluently:
//!
//! ```rust
//! use resource_dispatch::{Body, Header, Request};
//! use http::Method;
//!
//! let request = Request::has(Method::POST)
//!     .and_uri("/users/42/profile?verbose=true")
//!     .and_header(Header::of("Content-Type", "application/json"))
//!     .and_body(Body::from("{}"));
//!
//! assert_eq!(request.path(), "/users/42/profile");
//! assert_eq!(request.header_value_or("content-length", "0"), "2");
//! ```

use http::Method;
use std::fmt;
use url::form_urlencoded;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const LOCATION: &str = "Location";

/// One header line. Names compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn of(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn matches_name_of(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn matches_value_of(&self, value: &str) -> bool {
        self.value == value
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Plain text body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    content: String,
}

impl Body {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

impl From<&str> for Body {
    fn from(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

impl From<String> for Body {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Only HTTP/1.1 is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Version {
    #[default]
    Http1_1,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HTTP/1.1")
    }
}

/// Decoded query string, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    parameters: Vec<(String, String)>,
}

impl QueryParameters {
    pub fn parse(query: &str) -> Self {
        let parameters = form_urlencoded::parse(query.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        Self { parameters }
    }

    /// Every value given for `name`, possibly none.
    pub fn values_of(&self, name: &str) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn first_value_of(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in &self.parameters {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub uri: String,
    pub version: Version,
    pub headers: Vec<Header>,
    pub body: Body,
}

impl Request {
    /// Builds a request, adding `Content-Length` when the body has content and the
    /// header is missing.
    pub fn from_parts(
        method: Method,
        uri: &str,
        version: Version,
        headers: Vec<Header>,
        body: Body,
    ) -> Self {
        let mut headers = headers;
        if body.has_content() && !headers.iter().any(|h| h.matches_name_of(CONTENT_LENGTH)) {
            headers.push(Header::of(CONTENT_LENGTH, &body.content().len().to_string()));
        }
        Self {
            method,
            uri: uri.to_string(),
            version,
            headers,
            body,
        }
    }

    /// A request for `/` with no headers and an empty body.
    pub fn has(method: Method) -> Self {
        Self::from_parts(method, "/", Version::Http1_1, Vec::new(), Body::empty())
    }

    pub fn and_uri(self, uri: &str) -> Self {
        Self::from_parts(self.method, uri, self.version, self.headers, self.body)
    }

    pub fn and_header(self, header: Header) -> Self {
        let mut headers = self.headers;
        headers.push(header);
        Self::from_parts(self.method, &self.uri, self.version, headers, self.body)
    }

    pub fn and_headers(self, headers: Vec<Header>) -> Self {
        Self::from_parts(self.method, &self.uri, self.version, headers, self.body)
    }

    /// Replaces the body. `Content-Length` always describes the new body.
    pub fn and_body(self, body: Body) -> Self {
        let mut headers = self.headers;
        headers.retain(|header| !header.matches_name_of(CONTENT_LENGTH));
        Self::from_parts(self.method, &self.uri, self.version, headers, body)
    }

    pub fn and_version(self, version: Version) -> Self {
        Self::from_parts(self.method, &self.uri, version, self.headers, self.body)
    }

    pub fn header(self, name: &str, value: &str) -> Self {
        self.and_header(Header::of(name, value))
    }

    pub fn body(self, body: &str) -> Self {
        self.and_body(Body::from(body))
    }

    /// The URI without its query string.
    pub fn path(&self) -> &str {
        self.uri.split_once('?').map_or(self.uri.as_str(), |(path, _)| path)
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, query)| query)
    }

    /// First header whose name matches, ignoring case.
    pub fn header_of(&self, name: &str) -> Option<&Header> {
        self.headers.iter().find(|header| header.matches_name_of(name))
    }

    pub fn header_matches(&self, name: &str, value: &str) -> bool {
        self.header_of(name)
            .is_some_and(|header| header.matches_value_of(value))
    }

    pub fn header_value_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.header_of(name)
            .map_or(default, |header| header.value.as_str())
    }

    pub fn query_parameters(&self) -> QueryParameters {
        self.query().map(QueryParameters::parse).unwrap_or_default()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.method, self.uri, self.version)?;
        for header in &self.headers {
            writeln!(f, "{}", header)?;
        }
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let request = Request::has(Method::GET).header("X-Correlation-Id", "abc");
        assert_eq!(request.header_of("x-correlation-id").unwrap().value, "abc");
        assert!(request.header_matches("X-CORRELATION-ID", "abc"));
        assert_eq!(request.header_value_or("Accept", "*/*"), "*/*");
    }

    #[test]
    fn test_content_length_added_once_for_body() {
        let request = Request::has(Method::POST).body("hello").header("Accept", "*/*");
        let lengths: Vec<&Header> = request
            .headers
            .iter()
            .filter(|h| h.matches_name_of(CONTENT_LENGTH))
            .collect();
        assert_eq!(lengths.len(), 1);
        assert_eq!(lengths[0].value, "5");

        let empty = Request::has(Method::GET);
        assert!(empty.header_of(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_replacing_body_refreshes_content_length() {
        let request = Request::has(Method::POST).body("a").body("hello");
        assert_eq!(request.header_of(CONTENT_LENGTH).unwrap().value, "5");
        assert_eq!(
            request.headers.iter().filter(|h| h.matches_name_of(CONTENT_LENGTH)).count(),
            1
        );

        let cleared = request.and_body(Body::empty());
        assert!(cleared.header_of(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_query_parameters() {
        let request = Request::has(Method::GET).and_uri("/posts?page=2&tag=a&tag=b%20c");
        let query = request.query_parameters();
        assert_eq!(request.path(), "/posts");
        assert_eq!(query.first_value_of("page"), Some("2"));
        assert_eq!(query.values_of("tag"), vec!["a", "b c"]);
        assert_eq!(query.names(), vec!["page", "tag"]);
        assert!(query.values_of("missing").is_empty());
    }

    #[test]
    fn test_uri_without_query() {
        let request = Request::has(Method::GET).and_uri("/posts");
        assert_eq!(request.query(), None);
        assert!(request.query_parameters().is_empty());
    }
}

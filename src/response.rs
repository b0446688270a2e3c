//! # Responses
//!
//! The value a handler eventually produces. Writing it back to the wire is the
//! transport's job.

use crate::request::{Body, Header};
use http::StatusCode;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<Header>,
    pub entity: Body,
}

impl Response {
    pub fn of(status: StatusCode, entity: impl Into<String>) -> Self {
        Self::of_headers(status, Vec::new(), entity)
    }

    pub fn of_headers(status: StatusCode, headers: Vec<Header>, entity: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            entity: Body::from(entity.into()),
        }
    }

    /// A response with no entity.
    pub fn with_status(status: StatusCode) -> Self {
        Self::of(status, String::new())
    }

    pub fn and_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    pub fn header_of(&self, name: &str) -> Option<&Header> {
        self.headers.iter().find(|header| header.matches_name_of(name))
    }

    pub fn entity(&self) -> &str {
        self.entity.content()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HTTP/1.1 {}", self.status)?;
        for header in &self.headers {
            writeln!(f, "{}", header)?;
        }
        write!(f, "{}", self.entity)
    }
}

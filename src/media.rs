//! # Media Types
//!
//! [`ContentMediaType`] is a parsed `type/subtype[+suffix][; parameters]` descriptor.
//! Mapper lookup always happens on the *base type*: parameters such as `charset` are
//! dropped, and so is a structured-syntax suffix (`application/vnd.blog+json` becomes
//! `application/vnd.blog`).
//!
//! [`ContentType`] is the response-side header value a resource handler advertises.

use crate::request::{Header, CONTENT_TYPE};
use std::fmt;

/// A parsed media type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentMediaType {
    mime_type: String,
    mime_sub_type: String,
    parameters: Vec<(String, String)>,
}

impl ContentMediaType {
    pub fn new(mime_type: &str, mime_sub_type: &str) -> Self {
        Self {
            mime_type: mime_type.trim().to_ascii_lowercase(),
            mime_sub_type: mime_sub_type.trim().to_ascii_lowercase(),
            parameters: Vec::new(),
        }
    }

    pub fn json() -> Self {
        Self::new("application", "json")
    }

    pub fn xml() -> Self {
        Self::new("application", "xml")
    }

    pub fn plain_text() -> Self {
        Self::new("text", "plain")
    }

    /// Parses a descriptor such as `application/json; charset=UTF-8`.
    ///
    /// A descriptor without a `/` is kept whole as the type with an empty subtype, so
    /// it simply never matches a registered mapper.
    pub fn parse_from_descriptor(descriptor: &str) -> Self {
        let mut parts = descriptor.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let (mime_type, mime_sub_type) = essence.split_once('/').unwrap_or((essence, ""));

        let mut media_type = Self::new(mime_type, mime_sub_type);
        media_type.parameters = parts
            .filter_map(|parameter| {
                let (name, value) = parameter.split_once('=')?;
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim().trim_matches('"').to_string();
                (!name.is_empty()).then_some((name, value))
            })
            .collect();
        media_type
    }

    /// Strips parameters and any `+suffix` from the subtype.
    pub fn to_base_type(&self) -> Self {
        let sub_type = self
            .mime_sub_type
            .split('+')
            .next()
            .unwrap_or(&self.mime_sub_type);
        Self::new(&self.mime_type, sub_type)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn mime_sub_type(&self) -> &str {
        &self.mime_sub_type
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for ContentMediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mime_type, self.mime_sub_type)?;
        for (name, value) in &self.parameters {
            write!(f, "; {}={}", name, value)?;
        }
        Ok(())
    }
}

/// Value of a response `Content-Type` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub media_type: String,
    pub charset: Option<String>,
}

impl ContentType {
    pub fn of(media_type: &str, charset: &str) -> Self {
        Self {
            media_type: media_type.to_string(),
            charset: (!charset.is_empty()).then(|| charset.to_string()),
        }
    }

    pub fn to_response_header(&self) -> Header {
        Header::of(CONTENT_TYPE, &self.to_string())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.charset {
            Some(charset) => write!(f, "{}; charset={}", self.media_type, charset),
            None => f.write_str(&self.media_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_parameters() {
        let media_type = ContentMediaType::parse_from_descriptor("Application/JSON; charset=UTF-8");
        assert_eq!(media_type.mime_type(), "application");
        assert_eq!(media_type.mime_sub_type(), "json");
        assert_eq!(media_type.parameter("charset"), Some("UTF-8"));
        assert_eq!(media_type.to_string(), "application/json; charset=UTF-8");
    }

    #[test]
    fn test_base_type_drops_parameters_and_suffix() {
        let with_charset = ContentMediaType::parse_from_descriptor("application/json; charset=utf-8");
        assert_eq!(with_charset.to_base_type(), ContentMediaType::json());

        let vendor = ContentMediaType::parse_from_descriptor("application/vnd.blog+json");
        assert_eq!(vendor.to_base_type().to_string(), "application/vnd.blog");
    }

    #[test]
    fn test_content_type_header() {
        let content_type = ContentType::of("text/plain", "us-ascii");
        let header = content_type.to_response_header();
        assert_eq!(header.name, "Content-Type");
        assert_eq!(header.value, "text/plain; charset=us-ascii");
    }
}

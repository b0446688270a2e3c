//! # Media Type Mapper
//!
//! Registry from base media type to [`Mapper`]. It is built once at startup through
//! [`MediaTypeMapperBuilder`], which refuses to register the same media type twice,
//! and is then shared read-only (behind an `Arc`) by every worker.
//!
//! ```rust
//! use resource_dispatch::{ContentMediaType, JsonMapper, MediaTypeMapper};
//! use std::sync::Arc;
//!
//! let mapper = MediaTypeMapper::builder()
//!     .add_mapper_for(ContentMediaType::json(), Arc::new(JsonMapper))
//!     .unwrap()
//!     .build();
//!
//! let json_utf8 = ContentMediaType::parse_from_descriptor("application/json; charset=utf-8");
//! let numbers: Vec<u32> = mapper.from("[1,2,3]", &json_utf8).unwrap();
//! assert_eq!(numbers, vec![1, 2, 3]);
//! ```

use crate::error::ResourceError;
use crate::mapper::{JsonMapper, Mapper, MapperExt, TextMapper};
use crate::media::ContentMediaType;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub struct MediaTypeMapper {
    mappers_by_content_type: HashMap<ContentMediaType, Arc<dyn Mapper>>,
}

impl MediaTypeMapper {
    pub fn builder() -> MediaTypeMapperBuilder {
        MediaTypeMapperBuilder::default()
    }

    /// JSON for `application/json` and plain text for `text/plain`.
    pub fn with_defaults() -> Self {
        let mut mappers_by_content_type: HashMap<ContentMediaType, Arc<dyn Mapper>> =
            HashMap::new();
        mappers_by_content_type.insert(ContentMediaType::json(), Arc::new(JsonMapper));
        mappers_by_content_type.insert(ContentMediaType::plain_text(), Arc::new(TextMapper));
        Self {
            mappers_by_content_type,
        }
    }

    /// The mapper registered for the base type of `content_media_type`.
    pub fn mapper_for(
        &self,
        content_media_type: &ContentMediaType,
    ) -> Result<&Arc<dyn Mapper>, ResourceError> {
        self.mappers_by_content_type
            .get(&content_media_type.to_base_type())
            .ok_or_else(|| ResourceError::MediaTypeNotSupported(content_media_type.to_string()))
    }

    /// Deserializes `data` with the mapper for `content_media_type`.
    pub fn from<T: DeserializeOwned + 'static>(
        &self,
        data: &str,
        content_media_type: &ContentMediaType,
    ) -> Result<T, ResourceError> {
        self.mapper_for(content_media_type)?.deserialize(data)
    }

    /// Serializes `value` with the mapper for `content_media_type`.
    pub fn to_string<T: Serialize>(
        &self,
        value: &T,
        content_media_type: &ContentMediaType,
    ) -> Result<String, ResourceError> {
        self.mapper_for(content_media_type)?.serialize(value)
    }

    pub fn mapped_media_types(&self) -> Vec<ContentMediaType> {
        self.mappers_by_content_type.keys().cloned().collect()
    }
}

impl Default for MediaTypeMapper {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for MediaTypeMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut media_types: Vec<String> = self
            .mappers_by_content_type
            .keys()
            .map(ContentMediaType::to_string)
            .collect();
        media_types.sort();
        f.debug_struct("MediaTypeMapper")
            .field("media_types", &media_types)
            .finish()
    }
}

#[derive(Default)]
pub struct MediaTypeMapperBuilder {
    mappers_by_content_type: HashMap<ContentMediaType, Arc<dyn Mapper>>,
}

impl MediaTypeMapperBuilder {
    /// Registers `mapper` for the base type of `content_media_type`.
    pub fn add_mapper_for(
        mut self,
        content_media_type: ContentMediaType,
        mapper: Arc<dyn Mapper>,
    ) -> Result<Self, ResourceError> {
        let base_type = content_media_type.to_base_type();
        if self.mappers_by_content_type.contains_key(&base_type) {
            return Err(ResourceError::IllegalState(format!(
                "Content media type already added: {}",
                base_type
            )));
        }
        self.mappers_by_content_type.insert(base_type, mapper);
        Ok(self)
    }

    pub fn build(self) -> MediaTypeMapper {
        MediaTypeMapper {
            mappers_by_content_type: self.mappers_by_content_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_registration_fails_at_build_time() {
        let result = MediaTypeMapper::builder()
            .add_mapper_for(ContentMediaType::json(), Arc::new(JsonMapper))
            .and_then(|builder| {
                builder.add_mapper_for(
                    ContentMediaType::parse_from_descriptor("application/json; charset=utf-8"),
                    Arc::new(JsonMapper),
                )
            });
        assert!(matches!(result, Err(ResourceError::IllegalState(_))));
    }

    #[test]
    fn test_lookup_uses_base_type() {
        let mapper = MediaTypeMapper::with_defaults();
        let descriptor = ContentMediaType::parse_from_descriptor("text/plain; charset=us-ascii");
        let text: String = mapper.from("hello", &descriptor).unwrap();
        assert_eq!(text, "hello");
        assert_eq!(
            mapper.to_string(&vec![1, 2], &ContentMediaType::json()).unwrap(),
            "[1,2]"
        );
    }

    #[test]
    fn test_unregistered_media_type_is_not_supported() {
        let mapper = MediaTypeMapper::with_defaults();
        let csv = ContentMediaType::parse_from_descriptor("text/csv");
        let result: Result<String, _> = mapper.from("a,b", &csv);
        assert_eq!(
            result,
            Err(ResourceError::MediaTypeNotSupported("text/csv".into()))
        );
    }

    #[test]
    fn test_mapped_media_types() {
        let mut media_types: Vec<String> = MediaTypeMapper::with_defaults()
            .mapped_media_types()
            .iter()
            .map(ContentMediaType::to_string)
            .collect();
        media_types.sort();
        assert_eq!(media_types, vec!["application/json", "text/plain"]);
    }
}

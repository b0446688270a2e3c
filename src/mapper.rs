//! # Payload Mappers
//!
//! A [`Mapper`] converts between payload text and a structured value for one family of
//! media types. Implementations only deal in [`serde_json::Value`]; the generic
//! [`deserialize`](MapperExt::deserialize) and [`serialize`](MapperExt::serialize)
//! helpers bridge to concrete `serde` types.
//!
//! Asking for a `String` always returns the payload text unchanged, whatever the mapper.

use crate::error::ResourceError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;

/// Converts payload text to and from a structured value.
pub trait Mapper: Send + Sync {
    fn from_data(&self, data: &str) -> Result<Value, ResourceError>;

    fn to_data(&self, value: &Value) -> Result<String, ResourceError>;
}

/// Typed helpers available on every mapper.
pub trait MapperExt {
    fn deserialize<T: DeserializeOwned + 'static>(&self, data: &str) -> Result<T, ResourceError>;

    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, ResourceError>;
}

impl<M: Mapper + ?Sized> MapperExt for M {
    fn deserialize<T: DeserializeOwned + 'static>(&self, data: &str) -> Result<T, ResourceError> {
        let text: Box<dyn Any> = Box::new(data.to_string());
        match text.downcast::<T>() {
            Ok(text) => Ok(*text),
            Err(_) => Ok(serde_json::from_value(self.from_data(data)?)?),
        }
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, ResourceError> {
        self.to_data(&serde_json::to_value(value)?)
    }
}

/// `application/json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMapper;

impl Mapper for JsonMapper {
    fn from_data(&self, data: &str) -> Result<Value, ResourceError> {
        Ok(serde_json::from_str(data)?)
    }

    fn to_data(&self, value: &Value) -> Result<String, ResourceError> {
        Ok(serde_json::to_string(value)?)
    }
}

/// `text/plain`: the payload is a single string value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextMapper;

impl Mapper for TextMapper {
    fn from_data(&self, data: &str) -> Result<Value, ResourceError> {
        Ok(Value::String(data.to_string()))
    }

    fn to_data(&self, value: &Value) -> Result<String, ResourceError> {
        match value {
            Value::String(text) => Ok(text.clone()),
            other => Ok(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Name {
        given: String,
        family: String,
    }

    #[test]
    fn test_json_round_trip_of_struct() {
        let json = r#"{"given":"John","family":"Doe"}"#;
        let name: Name = JsonMapper.deserialize(json).unwrap();
        assert_eq!(
            name,
            Name {
                given: "John".into(),
                family: "Doe".into()
            }
        );
        assert_eq!(JsonMapper.serialize(&name).unwrap(), json);
    }

    #[derive(Serialize)]
    struct Card {
        zip: u32,
        name: Name,
        active: bool,
    }

    #[test]
    fn test_serialize_keeps_declared_field_order() {
        let card = Card {
            zip: 12345,
            name: Name {
                given: "Jane".into(),
                family: "Doe".into(),
            },
            active: true,
        };
        assert_eq!(
            JsonMapper.serialize(&card).unwrap(),
            r#"{"zip":12345,"name":{"given":"Jane","family":"Doe"},"active":true}"#
        );
    }

    #[test]
    fn test_string_target_is_identity() {
        let raw = "not { json";
        let text: String = JsonMapper.deserialize(raw).unwrap();
        assert_eq!(text, raw);
    }

    #[test]
    fn test_malformed_json_is_a_mapping_error() {
        let result: Result<Name, _> = JsonMapper.deserialize("{");
        assert!(matches!(result, Err(ResourceError::Mapping(_))));
    }

    #[test]
    fn test_text_mapper_writes_strings_bare() {
        assert_eq!(TextMapper.serialize(&"hello").unwrap(), "hello");
        assert_eq!(TextMapper.serialize(&42).unwrap(), "42");
    }
}

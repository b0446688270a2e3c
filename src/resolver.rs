//! # Parameter Resolvers
//!
//! A [`ParameterResolver<T>`] extracts one typed handler argument from a request and the
//! [`MappedParameters`] produced by the action matcher. Resolvers are built once at
//! route-definition time, hold no state, and are shared across every request.
//!
//! | Kind | Source | On failure |
//! |------|--------|------------|
//! | `Path` | positional raw segment | `InvalidArgument` naming expected and actual type |
//! | `Query` | first value of a query key | the declared default, never an error |
//! | `Header` | first header with the name, any case | `None` |
//! | `Body` | request body via a mapper | `MediaTypeNotSupported` or `Mapping` |
//!
//! Query targets are limited to the [`QueryValue`] types, so an unsupported target type
//! is a compile error rather than a runtime one.

use crate::action::MappedParameters;
use crate::error::ResourceError;
use crate::mapper::{Mapper, MapperExt};
use crate::media::ContentMediaType;
use crate::media_type_mapper::MediaTypeMapper;
use crate::request::{Header, Request, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    Path,
    Body,
    Header,
    Query,
}

type Resolve<T> = dyn Fn(&Request, &MappedParameters) -> Result<T, ResourceError> + Send + Sync;

/// A typed extraction rule for one handler parameter.
pub struct ParameterResolver<T> {
    kind: ResolverKind,
    type_name: &'static str,
    position: Option<usize>,
    resolver: Arc<Resolve<T>>,
}

impl<T> Clone for ParameterResolver<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            type_name: self.type_name,
            position: self.position,
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<T> fmt::Debug for ParameterResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterResolver")
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("position", &self.position)
            .finish()
    }
}

impl<T> ParameterResolver<T> {
    fn new<F>(kind: ResolverKind, type_name: &'static str, position: Option<usize>, resolver: F) -> Self
    where
        F: Fn(&Request, &MappedParameters) -> Result<T, ResourceError> + Send + Sync + 'static,
    {
        Self {
            kind,
            type_name,
            position,
            resolver: Arc::new(resolver),
        }
    }

    pub fn kind(&self) -> ResolverKind {
        self.kind
    }

    /// Short name of the declared type, e.g. `"String"` or `"i32"`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Placeholder position for path resolvers.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn apply(&self, request: &Request, mapped: &MappedParameters) -> Result<T, ResourceError> {
        (self.resolver)(request, mapped)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.split("::").last().unwrap_or(full)
}

impl<T: PathValue + 'static> ParameterResolver<T> {
    /// The raw segment captured at placeholder `position`, coerced to `T`.
    pub fn path(position: usize) -> Self {
        Self::new(
            ResolverKind::Path,
            T::TYPE_NAME,
            Some(position),
            move |_request, mapped| {
                let parameter = mapped.mapped.get(position).ok_or_else(|| {
                    ResourceError::InvalidArgument(format!(
                        "No path parameter at position {} of {}",
                        position, mapped.path
                    ))
                })?;
                T::from_path(&parameter.value).ok_or_else(|| {
                    ResourceError::InvalidArgument(format!(
                        "Value {} is of type {} instead of {}",
                        parameter.value,
                        parameter.type_name,
                        T::TYPE_NAME
                    ))
                })
            },
        )
    }
}

impl<T: DeserializeOwned + 'static> ParameterResolver<T> {
    /// Deserializes the body with the mapper registered for its `Content-Type`.
    ///
    /// A request without `Content-Type` is treated as `application/json`.
    pub fn body(media_type_mapper: Arc<MediaTypeMapper>) -> Self {
        Self::new(
            ResolverKind::Body,
            short_type_name::<T>(),
            None,
            move |request, _mapped| {
                let assumed = ContentMediaType::json().to_string();
                let descriptor = request.header_value_or(CONTENT_TYPE, &assumed);
                media_type_mapper.from(
                    request.body.content(),
                    &ContentMediaType::parse_from_descriptor(descriptor),
                )
            },
        )
    }

    /// Deserializes the body with `mapper`, ignoring `Content-Type`.
    pub fn body_with_mapper(mapper: Arc<dyn Mapper>) -> Self {
        Self::new(
            ResolverKind::Body,
            short_type_name::<T>(),
            None,
            move |request, _mapped| mapper.deserialize(request.body.content()),
        )
    }
}

impl ParameterResolver<Option<Header>> {
    pub fn header(name: &str) -> Self {
        let name = name.to_string();
        Self::new(ResolverKind::Header, "Header", None, move |request, _mapped| {
            Ok(request.header_of(&name).cloned())
        })
    }
}

impl ParameterResolver<Option<String>> {
    /// The first value of query key `name`, if any.
    pub fn query(name: &str) -> Self {
        ParameterResolver::query_as(name)
    }
}

impl<T: QueryValue + 'static> ParameterResolver<Option<T>> {
    /// The first value of `name` parsed as `T`; `None` when absent or unparsable.
    pub fn query_as(name: &str) -> Self {
        let name = name.to_string();
        Self::new(ResolverKind::Query, T::TYPE_NAME, None, move |request, _mapped| {
            Ok(request
                .query_parameters()
                .first_value_of(&name)
                .and_then(T::parse_query))
        })
    }
}

impl<T: QueryValue + Clone + Send + Sync + 'static> ParameterResolver<T> {
    /// The first value of `name` parsed as `T`, or `default` when absent or unparsable.
    pub fn query_or(name: &str, default: T) -> Self {
        let name = name.to_string();
        Self::new(ResolverKind::Query, T::TYPE_NAME, None, move |request, _mapped| {
            Ok(request
                .query_parameters()
                .first_value_of(&name)
                .and_then(T::parse_query)
                .unwrap_or_else(|| default.clone()))
        })
    }
}

/// Types a path segment can be coerced to.
pub trait PathValue: Sized {
    const TYPE_NAME: &'static str;

    fn from_path(raw: &str) -> Option<Self>;
}

/// Types a query value can be parsed as.
pub trait QueryValue: Sized {
    const TYPE_NAME: &'static str;

    fn parse_query(raw: &str) -> Option<Self>;
}

impl PathValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_path(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl QueryValue for String {
    const TYPE_NAME: &'static str = "String";

    fn parse_query(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

/// `true` only for a case-insensitive `"true"`; anything else is `false`.
impl QueryValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_query(raw: &str) -> Option<Self> {
        Some(raw.eq_ignore_ascii_case("true"))
    }
}

impl PathValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_path(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

// Integers reject surrounding whitespace; floating point values tolerate it.
macro_rules! parsed_values {
    ($normalize:expr; $($t:ty),*) => {
        $(
            impl PathValue for $t {
                const TYPE_NAME: &'static str = stringify!($t);

                fn from_path(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }

            impl QueryValue for $t {
                const TYPE_NAME: &'static str = stringify!($t);

                fn parse_query(raw: &str) -> Option<Self> {
                    let normalize: fn(&str) -> &str = $normalize;
                    normalize(raw).parse().ok()
                }
            }
        )*
    };
}

parsed_values!(|raw| raw; i8, i16, i32, i64, u8, u16, u32, u64, usize);
parsed_values!(str::trim; f32, f64);

//! # Action Matcher
//!
//! An [`Action`] is one route registration: a method plus a compiled [`PathTemplate`].
//! Templates use `{name}` placeholders, each standing for exactly one non-empty path
//! segment:
//!
//! ```text
//! /posts/{postId}/comment/{commentId}
//! ```
//!
//! Matching is positional. A match yields [`MappedParameters`] holding the raw captured
//! segments in template order; coercion to typed values happens later, in the
//! [`ParameterResolver`](crate::resolver::ParameterResolver). Placeholder names are
//! documentation only.
//!
//! When several actions match, the first registered wins.

use crate::error::ResourceError;
use http::Method;

/// Declared type of every raw value captured from a path.
pub const RAW_PATH_TYPE: &str = "String";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A compiled `{name}` path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
    segments: Vec<Segment>,
}

fn split_segments(path: &str) -> Vec<&str> {
    match path.strip_prefix('/') {
        Some("") => Vec::new(),
        Some(rest) => rest.split('/').collect(),
        None => path.split('/').collect(),
    }
}

impl PathTemplate {
    pub fn compile(template: &str) -> Result<Self, ResourceError> {
        if !template.starts_with('/') {
            return Err(ResourceError::InvalidTemplate(format!(
                "{}: must start with '/'",
                template
            )));
        }

        let mut segments = Vec::new();
        for segment in split_segments(template) {
            if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if inner.is_empty() || inner.contains(['{', '}']) {
                    return Err(ResourceError::InvalidTemplate(format!(
                        "{}: malformed placeholder '{}'",
                        template, segment
                    )));
                }
                segments.push(Segment::Placeholder(inner.to_string()));
            } else if segment.contains(['{', '}']) {
                return Err(ResourceError::InvalidTemplate(format!(
                    "{}: placeholder must span a whole segment in '{}'",
                    template, segment
                )));
            } else {
                segments.push(Segment::Literal(segment.to_string()));
            }
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholder names in template order.
    pub fn placeholder_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Captured placeholder values, or `None` if `path` has a different shape.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let parts = split_segments(path);
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Placeholder(_) if !part.is_empty() => captured.push(part.to_string()),
                _ => return None,
            }
        }
        Some(captured)
    }
}

/// Placeholder names of a template string, without validating it.
pub fn placeholder_names_of(template: &str) -> Vec<String> {
    split_segments(template)
        .into_iter()
        .filter_map(|segment| {
            segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .map(str::to_string)
        })
        .collect()
}

/// One raw value captured at a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedParameter {
    pub type_name: String,
    pub value: String,
}

impl MappedParameter {
    pub fn new(type_name: &str, value: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            value: value.to_string(),
        }
    }
}

/// The outcome of matching one request against one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedParameters {
    /// Registration index of the matched action.
    pub action_id: usize,
    pub method: Method,
    pub path: String,
    pub mapped: Vec<MappedParameter>,
}

impl MappedParameters {
    pub fn new(action_id: usize, method: Method, path: &str, mapped: Vec<MappedParameter>) -> Self {
        Self {
            action_id,
            method,
            path: path.to_string(),
            mapped,
        }
    }

    /// Parameters for an action with no placeholders.
    pub fn empty(method: Method, path: &str) -> Self {
        Self::new(0, method, path, Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct Action {
    pub id: usize,
    pub method: Method,
    pub template: PathTemplate,
}

impl Action {
    pub fn new(id: usize, method: Method, template: &str) -> Result<Self, ResourceError> {
        Ok(Self {
            id,
            method,
            template: PathTemplate::compile(template)?,
        })
    }

    /// Matches the method exactly and the path structurally. The query string is ignored.
    pub fn match_with(&self, method: &Method, uri: &str) -> Option<MappedParameters> {
        if &self.method != method {
            return None;
        }
        let path = uri.split_once('?').map_or(uri, |(path, _)| path);
        let captured = self.template.captures(path)?;
        let mapped = captured
            .iter()
            .map(|value| MappedParameter::new(RAW_PATH_TYPE, value))
            .collect();
        Some(MappedParameters::new(self.id, method.clone(), path, mapped))
    }
}

/// Ordered route table. The first action to match wins.
#[derive(Debug, Clone, Default)]
pub struct ActionMatcher {
    actions: Vec<Action>,
}

impl ActionMatcher {
    /// Compiles every `(method, template)` pair, in registration order.
    pub fn compile<'a, I>(routes: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = (Method, &'a str)>,
    {
        let actions = routes
            .into_iter()
            .enumerate()
            .map(|(id, (method, template))| Action::new(id, method, template))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { actions })
    }

    pub fn match_with(&self, method: &Method, uri: &str) -> Option<MappedParameters> {
        self.actions
            .iter()
            .find_map(|action| action.match_with(method, uri))
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(mapped: &MappedParameters) -> Vec<&str> {
        mapped.mapped.iter().map(|p| p.value.as_str()).collect()
    }

    #[test]
    fn test_captures_placeholders_in_template_order() {
        let templates = [
            ("/posts/{postId}", vec!["p1"], "/posts/p1"),
            (
                "/posts/{postId}/comment/{commentId}",
                vec!["my-post", "my-comment"],
                "/posts/my-post/comment/my-comment",
            ),
            (
                "/a/{w}/{x}/b/{y}/{z}",
                vec!["1", "2", "3", "4"],
                "/a/1/2/b/3/4",
            ),
        ];
        for (template, expected, uri) in templates {
            let action = Action::new(0, Method::GET, template).unwrap();
            let mapped = action.match_with(&Method::GET, uri).unwrap();
            assert_eq!(values(&mapped), expected, "template {}", template);
            assert!(mapped.mapped.iter().all(|p| p.type_name == RAW_PATH_TYPE));
        }
    }

    #[test]
    fn test_method_and_shape_must_match() {
        let action = Action::new(0, Method::GET, "/posts/{postId}").unwrap();
        assert!(action.match_with(&Method::POST, "/posts/1").is_none());
        assert!(action.match_with(&Method::GET, "/posts").is_none());
        assert!(action.match_with(&Method::GET, "/posts/").is_none());
        assert!(action.match_with(&Method::GET, "/posts/1/extra").is_none());
        assert!(action.match_with(&Method::GET, "/users/1").is_none());
    }

    #[test]
    fn test_query_string_is_ignored() {
        let action = Action::new(0, Method::GET, "/posts/{postId}").unwrap();
        let mapped = action.match_with(&Method::GET, "/posts/7?page=2").unwrap();
        assert_eq!(values(&mapped), vec!["7"]);
        assert_eq!(mapped.path, "/posts/7");
    }

    #[test]
    fn test_first_registered_action_wins() {
        let matcher = ActionMatcher::compile([
            (Method::GET, "/users/{id}"),
            (Method::GET, "/users/me"),
        ])
        .unwrap();
        let mapped = matcher.match_with(&Method::GET, "/users/me").unwrap();
        assert_eq!(mapped.action_id, 0);
        assert!(matcher.match_with(&Method::DELETE, "/users/me").is_none());
    }

    #[test]
    fn test_root_template() {
        let action = Action::new(0, Method::GET, "/").unwrap();
        assert!(action.match_with(&Method::GET, "/").is_some());
        assert!(action.match_with(&Method::GET, "/x").is_none());
    }

    #[test]
    fn test_malformed_templates_are_rejected() {
        for template in ["posts/{id}", "/posts/{}", "/posts/id-{id}", "/posts/{id"] {
            assert!(
                matches!(
                    PathTemplate::compile(template),
                    Err(ResourceError::InvalidTemplate(_))
                ),
                "template {}",
                template
            );
        }
    }

    #[test]
    fn test_placeholder_names() {
        let template = PathTemplate::compile("/posts/{postId}/comment/{commentId}").unwrap();
        assert_eq!(template.placeholder_names(), vec!["postId", "commentId"]);
        assert_eq!(
            placeholder_names_of("/posts/{postId}/comment/{commentId}"),
            vec!["postId".to_string(), "commentId".to_string()]
        );
    }
}

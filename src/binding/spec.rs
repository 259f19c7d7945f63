//! Parameter descriptors and bound values.

use std::any::{type_name, Any};
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::DeserializeOwned;

use crate::codec;
use crate::dispatch::HandlerError;
use crate::routing::PathTemplate;

/// Where a parameter's raw value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Path,
    Query,
    Body,
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSource::Path => write!(f, "path"),
            ParamSource::Query => write!(f, "query"),
            ParamSource::Body => write!(f, "body"),
        }
    }
}

/// Decodes a request body into a type-erased entity.
pub type EntityDecoder = fn(&[u8]) -> Result<Box<dyn Any + Send>, serde_json::Error>;

/// The type a parameter is coerced to.
#[derive(Clone, Copy)]
pub enum ParamType {
    /// A signed 64-bit decimal integer.
    Integer,
    /// Any text, taken verbatim.
    Text,
    /// A structured entity decoded from the request body.
    Entity {
        name: &'static str,
        decode: EntityDecoder,
    },
}

impl ParamType {
    /// An entity of type `T`, decoded with the JSON codec.
    pub fn entity<T: DeserializeOwned + Send + 'static>() -> Self {
        ParamType::Entity {
            name: type_name::<T>(),
            decode: decode_entity::<T>,
        }
    }

    /// Human-readable type name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Integer => "integer",
            ParamType::Text => "string",
            ParamType::Entity { name, .. } => *name,
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, ParamType::Entity { .. })
    }
}

impl fmt::Debug for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Integer => f.write_str("Integer"),
            ParamType::Text => f.write_str("Text"),
            ParamType::Entity { name, .. } => f.debug_tuple("Entity").field(name).finish(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn decode_entity<T: DeserializeOwned + Send + 'static>(
    bytes: &[u8],
) -> Result<Box<dyn Any + Send>, serde_json::Error> {
    let entity: T = codec::decode(bytes)?;
    Ok(Box::new(entity))
}

/// Declares one handler parameter.
///
/// ```
/// use microroute_rs::{ParamSpec, ParamType};
///
/// let id = ParamSpec::path("id", ParamType::Integer);
/// let page = ParamSpec::query("page", ParamType::Integer).with_default("1");
/// assert!(id.required);
/// assert!(!page.required);
/// ```
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// The parameter name. For path parameters this is the template variable.
    pub name: String,
    pub source: ParamSource,
    pub ty: ParamType,
    /// Whether binding fails when the value is absent.
    pub required: bool,
    /// Raw value used for an absent query parameter.
    pub default: Option<String>,
}

impl ParamSpec {
    fn new(name: impl Into<String>, source: ParamSource, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            source,
            ty,
            required: true,
            default: None,
        }
    }

    /// A parameter bound from the template variable of the same name.
    pub fn path(name: impl Into<String>, ty: ParamType) -> Self {
        Self::new(name, ParamSource::Path, ty)
    }

    /// A required query parameter.
    pub fn query(name: impl Into<String>, ty: ParamType) -> Self {
        Self::new(name, ParamSource::Query, ty)
    }

    /// The request body, decoded into `T`.
    pub fn body<T: DeserializeOwned + Send + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, ParamSource::Body, ParamType::entity::<T>())
    }

    /// Allow the value to be absent.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Use `value` when the query parameter is absent. Implies [`optional`](Self::optional).
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.required = false;
        self.default = Some(value.into());
        self
    }
}

/// Check a parameter list against the route template it is registered with.
pub(crate) fn validate(specs: &[ParamSpec], template: &PathTemplate) -> Result<(), String> {
    let mut names = HashSet::new();
    let mut bodies = 0;

    for spec in specs {
        if !names.insert(spec.name.as_str()) {
            return Err(format!("parameter '{}' is declared twice", spec.name));
        }

        match spec.source {
            ParamSource::Body => {
                bodies += 1;
                if bodies > 1 {
                    return Err("at most one body parameter is allowed".to_string());
                }
                if !spec.ty.is_entity() {
                    return Err(format!("body parameter '{}' must be an entity", spec.name));
                }
            }
            ParamSource::Path | ParamSource::Query if spec.ty.is_entity() => {
                return Err(format!(
                    "{} parameter '{}' cannot be an entity",
                    spec.source, spec.name
                ));
            }
            ParamSource::Path if !template.has_variable(&spec.name) => {
                return Err(format!(
                    "path parameter '{}' is not a variable of {}",
                    spec.name,
                    template.pattern()
                ));
            }
            ParamSource::Path | ParamSource::Query => {}
        }
    }

    Ok(())
}

/// A coerced parameter value.
pub enum BoundValue {
    Integer(i64),
    Text(String),
    Entity(Box<dyn Any + Send>),
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            BoundValue::Text(value) => f.debug_tuple("Text").field(value).finish(),
            BoundValue::Entity(_) => f.write_str("Entity(..)"),
        }
    }
}

/// The values bound for one request, handed to the handler by value.
#[derive(Debug, Default)]
pub struct BoundParameters {
    values: HashMap<String, BoundValue>,
}

impl BoundParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: BoundValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The integer bound to `name`.
    pub fn integer(&self, name: &str) -> Result<i64, HandlerError> {
        self.optional_integer(name)?
            .ok_or_else(|| HandlerError::parameter(name, "not bound"))
    }

    /// The integer bound to `name`, or `None` for an absent optional parameter.
    pub fn optional_integer(&self, name: &str) -> Result<Option<i64>, HandlerError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(BoundValue::Integer(value)) => Ok(Some(*value)),
            Some(other) => Err(HandlerError::parameter(name, format!("{other:?} is not an integer"))),
        }
    }

    /// The text bound to `name`.
    pub fn text(&self, name: &str) -> Result<&str, HandlerError> {
        self.optional_text(name)?
            .ok_or_else(|| HandlerError::parameter(name, "not bound"))
    }

    /// The text bound to `name`, or `None` for an absent optional parameter.
    pub fn optional_text(&self, name: &str) -> Result<Option<&str>, HandlerError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(BoundValue::Text(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(HandlerError::parameter(name, format!("{other:?} is not text"))),
        }
    }

    /// Move the decoded body entity out.
    ///
    /// `T` must be the type the body parameter was declared with.
    pub fn take_entity<T: Any>(&mut self, name: &str) -> Result<T, HandlerError> {
        match self.values.remove(name) {
            Some(BoundValue::Entity(entity)) => match entity.downcast::<T>() {
                Ok(entity) => Ok(*entity),
                Err(entity) => {
                    self.values.insert(name.to_string(), BoundValue::Entity(entity));
                    Err(HandlerError::parameter(
                        name,
                        format!("entity is not a {}", type_name::<T>()),
                    ))
                }
            },
            Some(other) => {
                let reason = format!("{other:?} is not an entity");
                self.values.insert(name.to_string(), other);
                Err(HandlerError::parameter(name, reason))
            }
            None => Err(HandlerError::parameter(name, "not bound")),
        }
    }
}

//! Parameter declarations and the typed values bound to them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Which parser handles a parameter's token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Base-10 whole number.
    Integer,
    /// Any token, unchanged.
    Text,
    /// One of a closed set registered under this key.
    Choice(String),
    /// A host entity looked up by the resolver registered under this key.
    Entity(String),
}

impl ParamType {
    pub fn choice(key: impl Into<String>) -> Self {
        ParamType::Choice(key.into())
    }

    pub fn entity(key: impl Into<String>) -> Self {
        ParamType::Entity(key.into())
    }
}

/// One declared parameter of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    name: String,
    param_type: ParamType,
    optional: bool,
    greedy: bool,
}

impl ParameterSpec {
    /// A parameter that must be supplied.
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            optional: false,
            greedy: false,
        }
    }

    /// A trailing parameter that may be omitted.
    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            optional: true,
            ..Self::required(name, param_type)
        }
    }

    /// Absorb every remaining token, joined by single spaces.
    ///
    /// Only valid on the last parameter of a command.
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_type(&self) -> &ParamType {
        &self.param_type
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    /// `<name>` for required parameters, `[name]` for optional ones.
    pub fn usage(&self) -> String {
        if self.optional {
            format!("[{}]", self.name)
        } else {
            format!("<{}>", self.name)
        }
    }
}

/// A parsed argument.
#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Text(String),
    /// Position of the matched literal in its closed set, and the literal.
    Choice { index: usize, name: String },
    /// Opaque handle produced by an entity resolver.
    Entity(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap a host value as an entity handle.
    pub fn entity<T: Any + Send + Sync>(value: T) -> Self {
        Value::Entity(Arc::new(value))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Choice { index, name } => f
                .debug_struct("Choice")
                .field("index", index)
                .field("name", name)
                .finish(),
            Value::Entity(_) => f.write_str("Entity(..)"),
        }
    }
}

//! Parameter type registry: turns tokens into typed values.

use std::collections::HashMap;

use hark_types::PermissionLevel;

use crate::param::{ParamType, ParameterSpec, Value};

/// Key of the closed set registered by [`TypeRegistry::with_permission_levels`].
pub const PERMISSION_LEVEL: &str = "permission level";

/// Looks up a host entity by token. `Err` carries the user-facing message.
pub type EntityResolver<C> = Box<dyn Fn(&C, &str) -> Result<Value, String> + Send + Sync>;

/// Why a token could not be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// Malformed token. Reported with the `Invalid syntax!` framing and the
    /// command's usage.
    Syntax(String),
    /// Well-formed token naming nothing valid. Reported verbatim.
    Rejected(String),
}

/// An ordered set of valid literals.
#[derive(Debug, Clone)]
pub struct ClosedSet {
    friendly_name: String,
    values: Vec<String>,
}

impl ClosedSet {
    fn parse(&self, token: &str) -> Result<Value, ParseFailure> {
        match self.values.iter().position(|v| v == token) {
            Some(index) => Ok(Value::Choice {
                index,
                name: self.values[index].clone(),
            }),
            None => Err(ParseFailure::Rejected(format!(
                "{token} is not a {}. Valid values: {}",
                self.friendly_name,
                self.values.join(", ")
            ))),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Maps parameter types to parsers.
///
/// Closed sets and entity resolvers are registered by key and referenced from
/// [`ParamType::Choice`] and [`ParamType::Entity`]. Registering a key twice
/// replaces the earlier entry.
pub struct TypeRegistry<C> {
    choices: HashMap<String, ClosedSet>,
    entities: HashMap<String, EntityResolver<C>>,
}

impl<C> TypeRegistry<C> {
    pub fn new() -> Self {
        Self {
            choices: HashMap::new(),
            entities: HashMap::new(),
        }
    }

    /// Register a closed set under `key`, described to users as `friendly_name`.
    pub fn closed_set<I, S>(mut self, key: &str, friendly_name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices.insert(
            key.to_string(),
            ClosedSet {
                friendly_name: friendly_name.to_string(),
                values: values.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Register the permission levels as the closed set [`PERMISSION_LEVEL`].
    pub fn with_permission_levels(self) -> Self {
        self.closed_set(
            PERMISSION_LEVEL,
            PERMISSION_LEVEL,
            PermissionLevel::ALL.iter().map(|level| level.name()),
        )
    }

    /// Register an entity resolver under `key`.
    pub fn entity<F>(mut self, key: &str, resolver: F) -> Self
    where
        F: Fn(&C, &str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.entities.insert(key.to_string(), Box::new(resolver));
        self
    }

    pub fn closed_set_for(&self, key: &str) -> Option<&ClosedSet> {
        self.choices.get(key)
    }

    /// Whether a parser exists for `param_type`.
    pub fn knows(&self, param_type: &ParamType) -> bool {
        match param_type {
            ParamType::Integer | ParamType::Text => true,
            ParamType::Choice(key) => self.choices.contains_key(key),
            ParamType::Entity(key) => self.entities.contains_key(key),
        }
    }

    /// Parse one token for `spec`.
    pub fn parse(&self, spec: &ParameterSpec, token: &str, context: &C) -> Result<Value, ParseFailure> {
        match spec.param_type() {
            ParamType::Integer => token
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| ParseFailure::Syntax(format!("{} must be a whole number!", spec.name()))),
            ParamType::Text => Ok(Value::Text(token.to_string())),
            ParamType::Choice(key) => match self.choices.get(key) {
                Some(set) => set.parse(token),
                None => Err(unregistered(key)),
            },
            ParamType::Entity(key) => match self.entities.get(key) {
                Some(resolve) => resolve(context, token).map_err(ParseFailure::Rejected),
                None => Err(unregistered(key)),
            },
        }
    }
}

// Unreachable through a built tree: registration rejects unknown types.
fn unregistered(key: &str) -> ParseFailure {
    ParseFailure::Rejected(format!("No parser is registered for {key}."))
}

impl<C> Default for TypeRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

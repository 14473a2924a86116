//! Entity identity and normalization.
//!
//! The API keys some resources by a numeric `id` and others by a
//! document `_id`. Every entity entering a store is normalized so that
//! both fields are present and equal.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of a stored entity. The API uses both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Str(String),
}

impl EntityId {
    /// Read an identity out of a JSON value. Empty strings are not identities.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(EntityId::Int),
            Value::String(s) if !s.is_empty() => Some(EntityId::Str(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            EntityId::Int(i) => Value::from(*i),
            EntityId::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(i) => write!(f, "{}", i),
            EntityId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Int(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Str(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::Str(value)
    }
}

/// Integers parse as [`EntityId::Int`], anything else is kept as a string.
impl FromStr for EntityId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(i) => EntityId::Int(i),
            Err(_) => EntityId::Str(s.to_string()),
        })
    }
}

/// A record the store can key by identity.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Canonical identity (`id`).
    fn id(&self) -> Option<EntityId>;

    /// Alternate identity (`_id`).
    fn alt_id(&self) -> Option<EntityId>;

    /// Write `id` into both identity fields.
    fn assign_id(&mut self, id: &EntityId);
}

/// Normalize identity in place and return it.
///
/// `_id` wins when present, otherwise `id` is used; the chosen value is
/// then written back to both fields. Returns `None` for records that
/// carry neither.
pub fn normalize_identity<T: Entity>(entity: &mut T) -> Option<EntityId> {
    let id = entity.alt_id().or_else(|| entity.id())?;
    entity.assign_id(&id);
    Some(id)
}

/// Schemaless entity backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Wrap a JSON value; non-objects are rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Record(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl Entity for Record {
    fn id(&self) -> Option<EntityId> {
        self.0.get("id").and_then(EntityId::from_value)
    }

    fn alt_id(&self) -> Option<EntityId> {
        self.0.get("_id").and_then(EntityId::from_value)
    }

    fn assign_id(&mut self, id: &EntityId) {
        self.0.insert("id".to_string(), id.to_value());
        self.0.insert("_id".to_string(), id.to_value());
    }
}

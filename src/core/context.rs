//! Ordered structured context attached to activities
//!
//! This module provides:
//! - `ContextValue`: a single structured value (primitive, sequence, map or masked)
//! - `Context`: an insertion-ordered, string-keyed map of values

use super::masking::{Masked, MaskedValue, MASKED_TOKEN};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Value type for context entries
#[derive(Debug, Clone)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Only used for unsigned values that do not fit in an `i64`
    UInt(u64),
    Float(f64),
    String(String),
    Sequence(Vec<ContextValue>),
    Map(Context),
    /// Mask text standing in for a sensitive value
    Masked(String),
}

impl ContextValue {
    /// Mask a sensitive value. Only the mask text is kept.
    pub fn masked<T: MaskedValue + ?Sized>(value: &T) -> Self {
        ContextValue::Masked(value.masked_value())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ContextValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::String(s) | ContextValue::Masked(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ContextValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Context> {
        match self {
            ContextValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ContextValue]> {
        match self {
            ContextValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Convert to serde_json::Value for JSON rendering
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            ContextValue::Null => serde_json::Value::Null,
            ContextValue::Bool(b) => serde_json::Value::Bool(*b),
            ContextValue::Int(i) => serde_json::Value::Number((*i).into()),
            ContextValue::UInt(u) => serde_json::Value::Number((*u).into()),
            ContextValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ContextValue::String(s) | ContextValue::Masked(s) => {
                serde_json::Value::String(s.clone())
            }
            ContextValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(ContextValue::to_json_value).collect())
            }
            ContextValue::Map(map) => serde_json::Value::Object(map.to_json_map()),
        }
    }
}

// Floats compare by bit pattern so that equality stays reflexive and agrees with `Hash`.
impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        use ContextValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (String(a), String(b)) => a == b,
            (Sequence(a), Sequence(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Masked(a), Masked(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ContextValue {}

impl Hash for ContextValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ContextValue::Null => {}
            ContextValue::Bool(b) => b.hash(state),
            ContextValue::Int(i) => i.hash(state),
            ContextValue::UInt(u) => u.hash(state),
            ContextValue::Float(f) => f.to_bits().hash(state),
            ContextValue::String(s) | ContextValue::Masked(s) => s.hash(state),
            ContextValue::Sequence(items) => items.hash(state),
            ContextValue::Map(map) => map.hash(state),
        }
    }
}

impl Serialize for ContextValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContextValue::Null => serializer.serialize_unit(),
            ContextValue::Bool(b) => serializer.serialize_bool(*b),
            ContextValue::Int(i) => serializer.serialize_i64(*i),
            ContextValue::UInt(u) => serializer.serialize_u64(*u),
            ContextValue::Float(f) => serializer.serialize_f64(*f),
            ContextValue::String(s) => serializer.serialize_str(s),
            ContextValue::Masked(mask) => serializer.serialize_newtype_struct(MASKED_TOKEN, mask),
            ContextValue::Sequence(items) => serializer.collect_seq(items),
            ContextValue::Map(map) => map.serialize(serializer),
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::String(s) | ContextValue::Masked(s) => write!(f, "{}", s),
            ContextValue::Null => write!(f, "null"),
            ContextValue::Bool(b) => write!(f, "{}", b),
            ContextValue::Int(i) => write!(f, "{}", i),
            ContextValue::UInt(u) => write!(f, "{}", u),
            ContextValue::Float(fl) => write!(f, "{}", fl),
            ContextValue::Sequence(_) | ContextValue::Map(_) => {
                write!(f, "{}", self.to_json_value())
            }
        }
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::String(s)
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::String(s.to_string())
    }
}

impl From<&String> for ContextValue {
    fn from(s: &String) -> Self {
        ContextValue::String(s.clone())
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        ContextValue::Int(i)
    }
}

impl From<i32> for ContextValue {
    fn from(i: i32) -> Self {
        ContextValue::Int(i as i64)
    }
}

impl From<u32> for ContextValue {
    fn from(u: u32) -> Self {
        ContextValue::Int(u as i64)
    }
}

impl From<u64> for ContextValue {
    fn from(u: u64) -> Self {
        i64::try_from(u)
            .map(ContextValue::Int)
            .unwrap_or(ContextValue::UInt(u))
    }
}

impl From<usize> for ContextValue {
    fn from(u: usize) -> Self {
        ContextValue::from(u as u64)
    }
}

impl From<f64> for ContextValue {
    fn from(f: f64) -> Self {
        ContextValue::Float(f)
    }
}

impl From<f32> for ContextValue {
    fn from(f: f32) -> Self {
        ContextValue::Float(f as f64)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

impl From<Context> for ContextValue {
    fn from(context: Context) -> Self {
        ContextValue::Map(context)
    }
}

impl<T> From<Masked<T>> for ContextValue {
    fn from(value: Masked<T>) -> Self {
        ContextValue::Masked(value.masked_value())
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ContextValue::Null)
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(items: Vec<T>) -> Self {
        ContextValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered context map
///
/// Re-inserting an existing key replaces its value but keeps its original
/// position. Equality and hashing take entry order into account.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: IndexMap<String, ContextValue>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add an entry to the context
    #[must_use]
    pub fn with_entry<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.insert(key, value);
        self
    }

    /// Add an entry, returning the value it replaced
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<ContextValue>
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.entries.insert(key.into(), value.into())
    }

    /// Append every entry of `other`, in its order
    pub fn extend(&mut self, other: Context) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, keeping the order of the remaining ones
    pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert to an ordered JSON object
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json_value()))
            .collect()
    }

    /// Format entries as key=value pairs
    pub fn format_fields(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.len().hash(state);
        for (key, value) in &self.entries {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<ContextValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Context {
    type Item = (String, ContextValue);
    type IntoIter = indexmap::map::IntoIter<String, ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

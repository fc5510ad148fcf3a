//! Conversion of arbitrary values into ordered contexts
//!
//! Types can describe themselves explicitly through [`Serializable`]. Anything
//! else that implements `serde::Serialize` goes through [`ContextSerializer`],
//! which walks the value structurally: struct fields keep their declaration
//! order, nested structs become nested maps and collections become sequences.
//! Values serialized through [`crate::masking`] come out as masked entries.
//!
//! Owned Rust data cannot form cycles, but shared pointers can
//! (`Rc<RefCell<_>>`). Every field, element and wrapped value being encoded is
//! tracked by address and type; meeting one of them again further down is a
//! reference cycle and fails with
//! [`SerializationFailure`](ActivityError::SerializationFailure). Structs,
//! maps and sequences nested deeper than [`SerializerConfig::max_depth`] fail
//! the same way instead of overflowing the stack.

use super::context::{Context, ContextValue};
use super::error::{ActivityError, Result};
use super::masking::MASKED_TOKEN;
use serde::ser::{self, Serialize};
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt;

/// Struct, map and sequence nesting allowed unless configured otherwise
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Configuration of the structural serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Deepest struct, map or sequence nesting accepted
    pub max_depth: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Capability of a type that writes its own context entries
///
/// ```
/// use activity_feed::{Context, Serializable};
///
/// struct Order {
///     id: u64,
///     total_cents: i64,
/// }
///
/// impl Serializable for Order {
///     fn write_context(&self, context: &mut Context) {
///         context.insert("id", self.id);
///         context.insert("totalCents", self.total_cents);
///     }
/// }
///
/// let context = Order { id: 7, total_cents: 1250 }.to_context();
/// assert_eq!(context.keys().collect::<Vec<_>>(), vec!["id", "totalCents"]);
/// ```
pub trait Serializable {
    fn write_context(&self, context: &mut Context);

    fn to_context(&self) -> Context {
        let mut context = Context::new();
        self.write_context(&mut context);
        context
    }
}

impl Serializable for Context {
    fn write_context(&self, context: &mut Context) {
        for (key, value) in self.iter() {
            context.insert(key, value.clone());
        }
    }
}

/// Converts values into ordered context maps
#[derive(Debug, Clone, Default)]
pub struct ContextSerializer {
    config: SerializerConfig,
}

impl ContextSerializer {
    /// Create a serializer with the default configuration
    pub fn new() -> Self {
        Self {
            config: SerializerConfig::default(),
        }
    }

    /// Create a serializer with a custom configuration
    ///
    /// Fails with `InvalidArgument` when `max_depth` is zero, since such a
    /// serializer could not convert any structured value.
    pub fn with_config(config: SerializerConfig) -> Result<Self> {
        if config.max_depth == 0 {
            return Err(ActivityError::invalid_argument(
                "Serializer max depth must be greater than zero",
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Convert a value with named fields into an ordered context
    ///
    /// Values without fields (unit structs, `()`, `None`) produce an empty
    /// context. Scalars and sequences at the top level are rejected, as are
    /// graphs nested deeper than the configured limit.
    pub fn to_context_map<T: Serialize + ?Sized>(&self, value: &T) -> Result<Context> {
        let type_name = std::any::type_name::<T>();
        match self.to_context_value(value)? {
            ContextValue::Map(context) => Ok(context),
            ContextValue::Null => Ok(Context::new()),
            other => Err(ActivityError::serialization(
                type_name,
                format!("expected a value with named fields, found {}", kind_of(&other)),
            )),
        }
    }

    /// Convert any value into a single context value
    pub fn to_context_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<ContextValue> {
        let ancestors = RefCell::new(Vec::new());
        value
            .serialize(ValueEncoder::root(self.config.max_depth, &ancestors))
            .map_err(|cause| ActivityError::serialization(std::any::type_name::<T>(), cause.0))
    }

    /// Context of a type that describes itself
    pub fn context_of<T: Serializable + ?Sized>(&self, value: &T) -> Context {
        value.to_context()
    }
}

fn kind_of(value: &ContextValue) -> &'static str {
    match value {
        ContextValue::Null => "null",
        ContextValue::Bool(_) => "a boolean",
        ContextValue::Int(_) | ContextValue::UInt(_) | ContextValue::Float(_) => "a number",
        ContextValue::String(_) => "a string",
        ContextValue::Masked(_) => "a masked value",
        ContextValue::Sequence(_) => "a sequence",
        ContextValue::Map(_) => "a map",
    }
}

#[derive(Debug)]
struct EncodeError(String);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for EncodeError {}

impl ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError(msg.to_string())
    }
}

type Encoded = std::result::Result<ContextValue, EncodeError>;

/// Address and type name of every value currently being encoded
type Ancestors = RefCell<Vec<(usize, &'static str)>>;

#[derive(Debug, Clone, Copy)]
struct ValueEncoder<'a> {
    depth: usize,
    max_depth: usize,
    ancestors: &'a Ancestors,
}

impl<'a> ValueEncoder<'a> {
    fn root(max_depth: usize, ancestors: &'a Ancestors) -> Self {
        Self {
            depth: 0,
            max_depth,
            ancestors,
        }
    }

    /// Encoder one struct, map or sequence level further down
    fn nested(self) -> std::result::Result<Self, EncodeError> {
        if self.depth >= self.max_depth {
            return Err(EncodeError(format!("nesting exceeds {} levels", self.max_depth)));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }

    /// Encode a field, element or wrapped value, failing when the same value
    /// is already being encoded higher up
    ///
    /// A value is identified by its address together with its type, since a
    /// struct and its first field share an address. Zero-sized values hold
    /// no data and are never tracked.
    fn child<T: ?Sized + Serialize>(self, value: &T) -> Encoded {
        if std::mem::size_of_val(value) == 0 {
            return value.serialize(self);
        }
        let key = (
            value as *const T as *const () as usize,
            std::any::type_name::<T>(),
        );
        if self.ancestors.borrow().contains(&key) {
            return Err(EncodeError(format!(
                "the value contains a reference cycle through {}",
                key.1
            )));
        }
        self.ancestors.borrow_mut().push(key);
        let encoded = value.serialize(self);
        self.ancestors.borrow_mut().pop();
        encoded
    }
}

impl<'a> ser::Serializer for ValueEncoder<'a> {
    type Ok = ContextValue;
    type Error = EncodeError;

    type SerializeSeq = SeqEncoder<'a>;
    type SerializeTuple = SeqEncoder<'a>;
    type SerializeTupleStruct = SeqEncoder<'a>;
    type SerializeTupleVariant = VariantSeqEncoder<'a>;
    type SerializeMap = MapEncoder<'a>;
    type SerializeStruct = MapEncoder<'a>;
    type SerializeStructVariant = VariantMapEncoder<'a>;

    fn serialize_bool(self, v: bool) -> Encoded {
        Ok(ContextValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Encoded {
        Ok(ContextValue::Int(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Encoded {
        Ok(ContextValue::Int(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Encoded {
        Ok(ContextValue::Int(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Encoded {
        Ok(ContextValue::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Encoded {
        if let Ok(i) = i64::try_from(v) {
            Ok(ContextValue::Int(i))
        } else if let Ok(u) = u64::try_from(v) {
            Ok(ContextValue::UInt(u))
        } else {
            Err(EncodeError(format!("number {} does not fit in 64 bits", v)))
        }
    }

    fn serialize_u8(self, v: u8) -> Encoded {
        Ok(ContextValue::Int(v as i64))
    }

    fn serialize_u16(self, v: u16) -> Encoded {
        Ok(ContextValue::Int(v as i64))
    }

    fn serialize_u32(self, v: u32) -> Encoded {
        Ok(ContextValue::Int(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Encoded {
        Ok(ContextValue::from(v))
    }

    fn serialize_u128(self, v: u128) -> Encoded {
        u64::try_from(v)
            .map(ContextValue::from)
            .map_err(|_| EncodeError(format!("number {} does not fit in 64 bits", v)))
    }

    fn serialize_f32(self, v: f32) -> Encoded {
        Ok(ContextValue::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Encoded {
        Ok(ContextValue::Float(v))
    }

    fn serialize_char(self, v: char) -> Encoded {
        Ok(ContextValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Encoded {
        Ok(ContextValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Encoded {
        Ok(ContextValue::Sequence(
            v.iter().map(|b| ContextValue::Int(*b as i64)).collect(),
        ))
    }

    fn serialize_none(self) -> Encoded {
        Ok(ContextValue::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Encoded {
        self.child(value)
    }

    fn serialize_unit(self) -> Encoded {
        Ok(ContextValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Encoded {
        Ok(ContextValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Encoded {
        Ok(ContextValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Encoded {
        let inner = self.child(value)?;
        if name != MASKED_TOKEN {
            return Ok(inner);
        }
        match inner {
            ContextValue::String(mask) => Ok(ContextValue::Masked(mask)),
            other => Err(EncodeError(format!(
                "masked values must serialize to text, found {}",
                kind_of(&other)
            ))),
        }
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Encoded {
        let inner = self.nested()?.child(value)?;
        Ok(ContextValue::Map(Context::new().with_entry(variant, inner)))
    }

    fn serialize_seq(self, len: Option<usize>) -> std::result::Result<Self::SerializeSeq, EncodeError> {
        Ok(SeqEncoder {
            encoder: self.nested()?,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> std::result::Result<Self::SerializeTuple, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> std::result::Result<Self::SerializeTupleStruct, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> std::result::Result<Self::SerializeTupleVariant, EncodeError> {
        Ok(VariantSeqEncoder {
            variant,
            seq: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> std::result::Result<Self::SerializeMap, EncodeError> {
        Ok(MapEncoder {
            encoder: self.nested()?,
            map: Context::new(),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> std::result::Result<Self::SerializeStruct, EncodeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> std::result::Result<Self::SerializeStructVariant, EncodeError> {
        Ok(VariantMapEncoder {
            variant,
            map: self.serialize_map(Some(len))?,
        })
    }
}

struct SeqEncoder<'a> {
    encoder: ValueEncoder<'a>,
    items: Vec<ContextValue>,
}

impl ser::SerializeSeq for SeqEncoder<'_> {
    type Ok = ContextValue;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> std::result::Result<(), EncodeError> {
        self.items.push(self.encoder.child(value)?);
        Ok(())
    }

    fn end(self) -> Encoded {
        Ok(ContextValue::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SeqEncoder<'_> {
    type Ok = ContextValue;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> std::result::Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Encoded {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqEncoder<'_> {
    type Ok = ContextValue;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> std::result::Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Encoded {
        ser::SerializeSeq::end(self)
    }
}

struct VariantSeqEncoder<'a> {
    variant: &'static str,
    seq: SeqEncoder<'a>,
}

impl ser::SerializeTupleVariant for VariantSeqEncoder<'_> {
    type Ok = ContextValue;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> std::result::Result<(), EncodeError> {
        ser::SerializeSeq::serialize_element(&mut self.seq, value)
    }

    fn end(self) -> Encoded {
        let items = ser::SerializeSeq::end(self.seq)?;
        Ok(ContextValue::Map(Context::new().with_entry(self.variant, items)))
    }
}

struct MapEncoder<'a> {
    encoder: ValueEncoder<'a>,
    map: Context,
    next_key: Option<String>,
}

impl MapEncoder<'_> {
    fn key_from(value: ContextValue) -> std::result::Result<String, EncodeError> {
        match value {
            ContextValue::String(key) => Ok(key),
            ContextValue::Int(i) => Ok(i.to_string()),
            ContextValue::UInt(u) => Ok(u.to_string()),
            ContextValue::Bool(b) => Ok(b.to_string()),
            other => Err(EncodeError(format!(
                "context keys must be strings or integers, found {}",
                kind_of(&other)
            ))),
        }
    }
}

impl ser::SerializeMap for MapEncoder<'_> {
    type Ok = ContextValue;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(
        &mut self,
        key: &T,
    ) -> std::result::Result<(), EncodeError> {
        self.next_key = Some(Self::key_from(key.serialize(self.encoder)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> std::result::Result<(), EncodeError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| EncodeError("map value serialized before its key".to_string()))?;
        self.map.insert(key, self.encoder.child(value)?);
        Ok(())
    }

    fn end(self) -> Encoded {
        Ok(ContextValue::Map(self.map))
    }
}

impl ser::SerializeStruct for MapEncoder<'_> {
    type Ok = ContextValue;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> std::result::Result<(), EncodeError> {
        self.map.insert(key, self.encoder.child(value)?);
        Ok(())
    }

    fn end(self) -> Encoded {
        Ok(ContextValue::Map(self.map))
    }
}

struct VariantMapEncoder<'a> {
    variant: &'static str,
    map: MapEncoder<'a>,
}

impl ser::SerializeStructVariant for VariantMapEncoder<'_> {
    type Ok = ContextValue;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> std::result::Result<(), EncodeError> {
        ser::SerializeStruct::serialize_field(&mut self.map, key, value)
    }

    fn end(self) -> Encoded {
        let fields = ser::SerializeStruct::end(self.map)?;
        Ok(ContextValue::Map(Context::new().with_entry(self.variant, fields)))
    }
}

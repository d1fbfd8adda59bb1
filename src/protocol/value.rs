//! Procedure parameter values.
//!
//! Every shape the marshaller accepts is a variant here; arrays and typed
//! nulls are validated when they are built, so an encoder never sees a value
//! it cannot write.

use chrono::{DateTime, Utc};

use super::types::WireType;
use crate::error::{WireError, WireResult};

/// A single procedure call parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Written under the Bool tag; see [`WireType`].
    TinyInt(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f64),
    String(String),
    Varbinary(Vec<u8>),
    /// Microseconds since the Unix epoch
    Timestamp(i64),
    Array(ValueArray),
    Null(NullValue),
}

/// Homogeneous array parameter, at most `i16::MAX` elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueArray(Vec<Value>);

/// SQL NULL of a concrete column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullValue(WireType);

impl NullValue {
    /// Types that have a null sentinel on the wire.
    pub const NULLABLE: [WireType; 8] = [
        WireType::Bool,
        WireType::Short,
        WireType::Int,
        WireType::Long,
        WireType::Float,
        WireType::String,
        WireType::Varbinary,
        WireType::Timestamp,
    ];

    pub fn new(wire_type: WireType) -> WireResult<Self> {
        if Self::NULLABLE.contains(&wire_type) {
            Ok(Self(wire_type))
        } else {
            Err(WireError::UnsupportedNullType(wire_type))
        }
    }

    pub fn wire_type(self) -> WireType {
        self.0
    }
}

impl ValueArray {
    pub fn elements(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl Value {
    /// Build an array parameter. All elements must be of one kind; typed
    /// nulls count as their column type.
    pub fn array(items: Vec<Value>) -> WireResult<Self> {
        if items.len() > i16::MAX as usize {
            return Err(WireError::InvalidValue(format!(
                "array of {} elements exceeds the 16-bit element count",
                items.len()
            )));
        }

        let first_concrete = items.iter().find(|v| !v.is_null());
        let expected_type = match (first_concrete, items.first()) {
            (Some(v), _) | (None, Some(v)) => Some(v.wire_type()),
            (None, None) => None,
        };

        for item in &items {
            let same = match (item, first_concrete) {
                (Value::Null(n), _) => Some(n.wire_type()) == expected_type,
                (v, Some(first)) => v.kind_name() == first.kind_name(),
                (_, None) => true,
            };
            if !same {
                return Err(WireError::InvalidValue(format!(
                    "array elements must share one type, found {} among {}",
                    item.kind_name(),
                    first_concrete.map(Value::kind_name).unwrap_or("nulls")
                )));
            }
        }

        Ok(Value::Array(ValueArray(items)))
    }

    pub fn null(wire_type: WireType) -> WireResult<Self> {
        NullValue::new(wire_type).map(Value::Null)
    }

    pub fn timestamp_micros(micros: i64) -> Self {
        Value::Timestamp(micros)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    /// Tag this value is written with.
    pub fn wire_type(&self) -> WireType {
        match self {
            Value::Bool(_) | Value::TinyInt(_) => WireType::Bool,
            Value::Short(_) => WireType::Short,
            Value::Int(_) => WireType::Int,
            Value::Long(_) => WireType::Long,
            Value::Float(_) => WireType::Float,
            Value::String(_) => WireType::String,
            Value::Varbinary(_) => WireType::Varbinary,
            Value::Timestamp(_) => WireType::Timestamp,
            Value::Array(_) => WireType::Array,
            Value::Null(n) => n.wire_type(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Value::TinyInt(_) => "tinyint",
            Value::Null(_) => "null",
            other => other.wire_type().name(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::TinyInt(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Varbinary(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Varbinary(v.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    /// Rounded to the nearest microsecond.
    fn from(v: DateTime<Utc>) -> Self {
        let micros = v.timestamp() * 1_000_000 + (v.timestamp_subsec_nanos() as i64 + 500) / 1_000;
        Value::Timestamp(micros)
    }
}

impl From<NullValue> for Value {
    fn from(v: NullValue) -> Self {
        Value::Null(v)
    }
}

impl TryFrom<Vec<Value>> for Value {
    type Error = WireError;

    fn try_from(items: Vec<Value>) -> WireResult<Self> {
        Value::array(items)
    }
}

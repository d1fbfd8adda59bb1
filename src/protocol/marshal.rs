//! Value marshalling: tag byte followed by the type's payload.

use std::io::Write;

use super::primitive::{WireWrite, NULL_LENGTH};
use super::types::{WireType, NULL_FLOAT, NULL_TIMESTAMP};
use super::value::Value;
use crate::error::{WireError, WireResult};

/// Append the tagged encoding of `value` to `w`.
pub fn marshal_value<W: Write + ?Sized>(w: &mut W, value: &Value) -> WireResult<()> {
    match value {
        Value::Bool(v) => {
            w.write_byte(WireType::Bool.tag())?;
            w.write_boolean(*v)
        }
        Value::TinyInt(v) => {
            w.write_byte(WireType::Bool.tag())?;
            w.write_byte(*v)
        }
        Value::Short(v) => {
            w.write_byte(WireType::Short.tag())?;
            w.write_short(*v)
        }
        Value::Int(v) => {
            w.write_byte(WireType::Int.tag())?;
            w.write_int(*v)
        }
        Value::Long(v) => {
            w.write_byte(WireType::Long.tag())?;
            w.write_long(*v)
        }
        Value::Float(v) => {
            w.write_byte(WireType::Float.tag())?;
            w.write_float(*v)
        }
        Value::String(v) => {
            w.write_byte(WireType::String.tag())?;
            w.write_string(v)
        }
        Value::Varbinary(v) => {
            w.write_byte(WireType::Varbinary.tag())?;
            w.write_varbinary(v)
        }
        Value::Timestamp(micros) => {
            w.write_byte(WireType::Timestamp.tag())?;
            w.write_timestamp(*micros)
        }
        Value::Array(items) => {
            w.write_byte(WireType::Array.tag())?;
            // Length is bounded by ValueArray construction.
            w.write_short(items.len() as i16)?;
            for item in items.elements() {
                marshal_value(w, item)?;
            }
            Ok(())
        }
        Value::Null(null) => encode_null(w, null.wire_type()),
    }
}

/// Write the tag and NULL sentinel for `wire_type`.
pub fn encode_null<W: Write + ?Sized>(w: &mut W, wire_type: WireType) -> WireResult<()> {
    match wire_type {
        WireType::Bool => {
            w.write_byte(WireType::Bool.tag())?;
            w.write_byte(i8::MIN)
        }
        WireType::Short => {
            w.write_byte(WireType::Short.tag())?;
            w.write_short(i16::MIN)
        }
        WireType::Int => {
            w.write_byte(WireType::Int.tag())?;
            w.write_int(i32::MIN)
        }
        WireType::Long => {
            w.write_byte(WireType::Long.tag())?;
            w.write_long(i64::MIN)
        }
        WireType::Float => {
            w.write_byte(WireType::Float.tag())?;
            w.write_float(NULL_FLOAT)
        }
        WireType::String => {
            w.write_byte(WireType::String.tag())?;
            w.write_int(NULL_LENGTH)
        }
        WireType::Varbinary => {
            w.write_byte(WireType::Varbinary.tag())?;
            w.write_int(NULL_LENGTH)
        }
        WireType::Timestamp => {
            w.write_byte(WireType::Timestamp.tag())?;
            w.write_raw(&NULL_TIMESTAMP)
        }
        WireType::Null | WireType::Decimal | WireType::Array => {
            Err(WireError::UnsupportedNullType(wire_type))
        }
    }
}

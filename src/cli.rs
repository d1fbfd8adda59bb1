//! Parameter parsing for the `voltwire` command-line tool.
//!
//! Parameters are written `KIND:VALUE`, e.g. `int:7`, `string:hello`,
//! `bytes:deadbeef`, `timestamp:2024-01-01T00:00:00Z` or `null:int`.
//! Arrays are `array:KIND:V1,V2,...`.

use chrono::{DateTime, Utc};

use crate::error::{WireError, WireResult};
use crate::protocol::{Value, WireType};

pub fn parse_param(input: &str) -> WireResult<Value> {
    let (kind, raw) = input
        .split_once(':')
        .ok_or_else(|| invalid(input, "expected KIND:VALUE"))?;

    match kind {
        "null" => Value::null(parse_wire_type(raw)?),
        "array" => {
            let (elem_kind, items) = raw
                .split_once(':')
                .ok_or_else(|| invalid(input, "expected array:KIND:V1,V2,..."))?;
            let values = if items.is_empty() {
                Vec::new()
            } else {
                items
                    .split(',')
                    .map(|item| parse_scalar(elem_kind, item))
                    .collect::<WireResult<Vec<_>>>()?
            };
            Value::array(values)
        }
        _ => parse_scalar(kind, raw),
    }
}

fn parse_scalar(kind: &str, raw: &str) -> WireResult<Value> {
    let value = match kind {
        "bool" => Value::Bool(raw.parse().map_err(|_| invalid(raw, "not a bool"))?),
        "tinyint" => Value::TinyInt(raw.parse().map_err(|_| invalid(raw, "not an 8-bit integer"))?),
        "short" => Value::Short(raw.parse().map_err(|_| invalid(raw, "not a 16-bit integer"))?),
        "int" => Value::Int(raw.parse().map_err(|_| invalid(raw, "not a 32-bit integer"))?),
        "long" => Value::Long(raw.parse().map_err(|_| invalid(raw, "not a 64-bit integer"))?),
        "float" => Value::Float(raw.parse().map_err(|_| invalid(raw, "not a float"))?),
        "string" => Value::String(raw.to_string()),
        "bytes" => Value::Varbinary(hex::decode(raw).map_err(|_| invalid(raw, "not hex"))?),
        "timestamp" => parse_timestamp(raw)?,
        other => return Err(invalid(other, "unknown parameter kind")),
    };
    Ok(value)
}

fn parse_timestamp(raw: &str) -> WireResult<Value> {
    if let Ok(micros) = raw.parse::<i64>() {
        return Ok(Value::Timestamp(micros));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Value::from(dt.with_timezone(&Utc)))
        .map_err(|_| invalid(raw, "not RFC 3339 or integer microseconds"))
}

pub fn parse_wire_type(name: &str) -> WireResult<WireType> {
    match name {
        "tinyint" => Ok(WireType::Bool),
        "bytes" => Ok(WireType::Varbinary),
        _ => WireType::ALL
            .into_iter()
            .find(|ty| ty.name() == name)
            .ok_or_else(|| invalid(name, "unknown type")),
    }
}

fn invalid(input: &str, reason: &str) -> WireError {
    WireError::InvalidValue(format!("{:?}: {}", input, reason))
}

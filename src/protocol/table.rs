//! Result tables as carried in a call response.
//!
//! Only the table metadata is decoded. Each row stays an opaque,
//! length-framed byte block for the result iterator to pick apart.

use serde::{Serialize, Serializer};
use std::io::Read;

use super::codec::ProtocolLimits;
use super::primitive::WireRead;
use super::types::WireType;
use crate::error::{WireError, WireResult};

/// Upper bound on up-front allocation for counts read off the wire.
const PREALLOC_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    status_code: i8,
    column_types: Vec<i8>,
    column_names: Vec<String>,
    #[serde(serialize_with = "rows_as_hex")]
    rows: Vec<Vec<u8>>,
}

fn rows_as_hex<S: Serializer>(rows: &[Vec<u8>], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(rows.iter().map(hex::encode))
}

impl Table {
    pub fn new(
        status_code: i8,
        column_types: Vec<i8>,
        column_names: Vec<String>,
        rows: Vec<Vec<u8>>,
    ) -> WireResult<Self> {
        if column_types.len() != column_names.len() {
            return Err(WireError::Protocol(format!(
                "{} column types but {} column names",
                column_types.len(),
                column_names.len()
            )));
        }
        Ok(Self {
            status_code,
            column_types,
            column_names,
            rows,
        })
    }

    pub fn status_code(&self) -> i8 {
        self.status_code
    }

    pub fn column_count(&self) -> usize {
        self.column_types.len()
    }

    /// Raw type tags, one per column
    pub fn column_types(&self) -> &[i8] {
        &self.column_types
    }

    /// Type of column `idx`, `None` if out of range or an unknown tag.
    pub fn column_type(&self, idx: usize) -> Option<WireType> {
        self.column_types.get(idx).copied().and_then(WireType::from_tag)
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|n| n == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[u8]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn into_rows(self) -> Vec<Vec<u8>> {
        self.rows
    }
}

/// Decode one table from `r`.
pub fn decode_table<R: Read>(r: &mut R, limits: &ProtocolLimits) -> WireResult<Table> {
    // total length and metadata length; the fields below are self-describing
    let _total_len = r.read_int()?;
    let _meta_len = r.read_int()?;

    let status_code = r.read_byte()?;
    let column_count = r.read_short()?;
    if column_count < 0 {
        return Err(WireError::Protocol(format!(
            "negative column count {}",
            column_count
        )));
    }
    let column_count = column_count as usize;

    // Types and names are plain runs of column_count items, not prefixed arrays.
    let mut column_types = Vec::with_capacity(column_count);
    for _ in 0..column_count {
        column_types.push(r.read_byte()?);
    }
    let mut column_names = Vec::with_capacity(column_count);
    for _ in 0..column_count {
        column_names.push(r.read_string(limits.max_field_len)?);
    }

    let row_count = r.read_int()?;
    if row_count < 0 {
        tracing::warn!("Rejecting table with negative row count {}", row_count);
        return Err(WireError::Protocol(format!(
            "negative row count {}",
            row_count
        )));
    }
    let row_count = row_count as usize;

    let mut rows = Vec::with_capacity(row_count.min(PREALLOC_LIMIT));
    for _ in 0..row_count {
        rows.push(read_row(r, limits)?);
    }

    tracing::trace!(
        "Decoded table: status={} columns={} rows={}",
        status_code,
        column_count,
        rows.len()
    );

    Table::new(status_code, column_types, column_names, rows)
}

fn read_row<R: Read>(r: &mut R, limits: &ProtocolLimits) -> WireResult<Vec<u8>> {
    let len = r.read_int()?;
    if len < 0 {
        return Err(WireError::Protocol(format!("negative row length {}", len)));
    }
    let len = len as usize;
    if len > limits.max_field_len {
        return Err(WireError::LimitExceeded {
            field: "row",
            len,
            max: limits.max_field_len,
        });
    }

    let mut row = Vec::with_capacity(len);
    Read::take(&mut *r, len as u64).read_to_end(&mut row)?;
    if row.len() != len {
        return Err(WireError::Framing {
            expected: len,
            actual: row.len(),
        });
    }
    Ok(row)
}

//! Common test utilities for protocol tests
//!
//! Provides:
//! - A reference decoder for marshalled parameter values
//! - Builders that write server responses byte by byte

#![allow(dead_code)]

use std::io::Read;
use voltwire::protocol::{WireRead, WireType, WireWrite};

/// Decoded form of a marshalled parameter: tag plus payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f64),
    String(Option<String>),
    Varbinary(Option<Vec<u8>>),
    Timestamp(i64),
    Array(Vec<(WireType, Decoded)>),
}

/// Read one tagged value the way the server would.
pub fn unmarshal<R: Read>(r: &mut R) -> (WireType, Decoded) {
    let tag = r.read_byte().unwrap();
    let ty = WireType::from_tag(tag).unwrap_or_else(|| panic!("unknown tag {}", tag));
    let decoded = match ty {
        WireType::Bool => Decoded::Byte(r.read_byte().unwrap()),
        WireType::Short => Decoded::Short(r.read_short().unwrap()),
        WireType::Int => Decoded::Int(r.read_int().unwrap()),
        WireType::Long => Decoded::Long(r.read_long().unwrap()),
        WireType::Float => Decoded::Float(r.read_float().unwrap()),
        WireType::String => Decoded::String(r.read_nullable_string(usize::MAX).unwrap()),
        WireType::Varbinary => Decoded::Varbinary(r.read_varbinary(usize::MAX).unwrap()),
        WireType::Timestamp => Decoded::Timestamp(r.read_long().unwrap()),
        WireType::Array => {
            let count = r.read_short().unwrap();
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(unmarshal(r));
            }
            Decoded::Array(items)
        }
        other => panic!("type {} is never marshalled", other),
    };
    (ty, decoded)
}

pub struct TableBuilder {
    status: i8,
    columns: Vec<(WireType, String)>,
    rows: Vec<Vec<u8>>,
}

impl TableBuilder {
    pub fn new(status: i8) -> Self {
        Self {
            status,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn column(mut self, ty: WireType, name: &str) -> Self {
        self.columns.push((ty, name.to_string()));
        self
    }

    pub fn row(mut self, bytes: &[u8]) -> Self {
        self.rows.push(bytes.to_vec());
        self
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        let mut body = Vec::new();
        body.write_byte(self.status).unwrap();
        body.write_short(self.columns.len() as i16).unwrap();
        for (ty, _) in &self.columns {
            body.write_byte(ty.tag()).unwrap();
        }
        for (_, name) in &self.columns {
            body.write_string(name).unwrap();
        }
        let meta_len = body.len() as i32;

        body.write_int(self.rows.len() as i32).unwrap();
        for row in &self.rows {
            body.write_varbinary(row).unwrap();
        }

        buf.write_int(body.len() as i32 + 4).unwrap();
        buf.write_int(meta_len).unwrap();
        buf.extend_from_slice(&body);
    }
}

pub struct CallResponseBuilder {
    pub handle: i64,
    pub fields_present: u8,
    pub status: i8,
    pub status_string: Option<String>,
    pub app_status: i8,
    pub app_status_string: Option<String>,
    pub round_trip: i32,
    pub table_count: Option<i16>,
    pub tables: Vec<TableBuilder>,
}

impl CallResponseBuilder {
    pub fn new(handle: i64) -> Self {
        Self {
            handle,
            fields_present: 0,
            status: 1,
            status_string: None,
            app_status: -128,
            app_status_string: None,
            round_trip: 0,
            table_count: None,
            tables: Vec::new(),
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_long(self.handle).unwrap();
        buf.write_byte(self.fields_present as i8).unwrap();
        buf.write_byte(self.status).unwrap();
        if let Some(s) = &self.status_string {
            buf.write_string(s).unwrap();
        }
        buf.write_byte(self.app_status).unwrap();
        if let Some(s) = &self.app_status_string {
            buf.write_string(s).unwrap();
        }
        buf.write_int(self.round_trip).unwrap();
        let count = self.table_count.unwrap_or(self.tables.len() as i16);
        buf.write_short(count).unwrap();
        for table in &self.tables {
            table.write_to(&mut buf);
        }
        buf
    }
}

pub fn login_response(host_id: i32, conn_id: i64, leader: i32, build: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_byte(0).unwrap();
    buf.write_int(host_id).unwrap();
    buf.write_long(conn_id).unwrap();
    buf.write_long(1_700_000_000_000).unwrap();
    buf.write_int(leader).unwrap();
    buf.write_string(build).unwrap();
    buf
}

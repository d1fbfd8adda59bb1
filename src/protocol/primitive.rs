//! Fixed-width and length-prefixed primitives over `std::io` streams.
//!
//! All multi-byte integers are big-endian. Strings and byte arrays carry an
//! `i32` length prefix; a length of `-1` stands for NULL.

use std::io::{Read, Write};

use crate::error::{WireError, WireResult};

/// Length prefix the server uses for a NULL string or byte array.
pub const NULL_LENGTH: i32 = -1;

fn length_prefix(field: &'static str, len: usize) -> WireResult<i32> {
    i32::try_from(len).map_err(|_| {
        WireError::InvalidValue(format!(
            "{} of {} bytes does not fit a 32-bit length prefix",
            field, len
        ))
    })
}

/// Writers for the protocol's primitive encodings.
pub trait WireWrite: Write {
    fn write_byte(&mut self, v: i8) -> WireResult<()> {
        self.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    fn write_short(&mut self, v: i16) -> WireResult<()> {
        self.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    fn write_int(&mut self, v: i32) -> WireResult<()> {
        self.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    fn write_long(&mut self, v: i64) -> WireResult<()> {
        self.write_all(&v.to_be_bytes())?;
        Ok(())
    }

    fn write_float(&mut self, v: f64) -> WireResult<()> {
        self.write_all(&v.to_bits().to_be_bytes())?;
        Ok(())
    }

    fn write_boolean(&mut self, v: bool) -> WireResult<()> {
        self.write_byte(v as i8)
    }

    fn write_string(&mut self, v: &str) -> WireResult<()> {
        let len = length_prefix("string", v.len())?;
        self.write_int(len)?;
        self.write_all(v.as_bytes())?;
        Ok(())
    }

    fn write_varbinary(&mut self, v: &[u8]) -> WireResult<()> {
        let len = length_prefix("varbinary", v.len())?;
        self.write_int(len)?;
        self.write_all(v)?;
        Ok(())
    }

    /// Timestamps travel as microseconds since the Unix epoch.
    fn write_timestamp(&mut self, micros: i64) -> WireResult<()> {
        self.write_long(micros)
    }

    /// Bytes with no length prefix; the reader must know the size.
    fn write_raw(&mut self, v: &[u8]) -> WireResult<()> {
        self.write_all(v)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WireWrite for W {}

/// Readers for the protocol's primitive encodings.
///
/// A stream that ends early yields `WireError::Io` with kind
/// `UnexpectedEof`.
pub trait WireRead: Read {
    fn read_byte(&mut self) -> WireResult<i8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(i8::from_be_bytes(buf))
    }

    fn read_short(&mut self) -> WireResult<i16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    fn read_int(&mut self) -> WireResult<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    fn read_long(&mut self) -> WireResult<i64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    fn read_float(&mut self) -> WireResult<f64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(f64::from_bits(u64::from_be_bytes(buf)))
    }

    fn read_raw(&mut self, len: usize) -> WireResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads an `i32` length prefix. `None` is the NULL marker.
    fn read_length(&mut self, field: &'static str, max_len: usize) -> WireResult<Option<usize>> {
        let len = self.read_int()?;
        if len == NULL_LENGTH {
            return Ok(None);
        }
        if len < 0 {
            return Err(WireError::Protocol(format!(
                "negative {} length {}",
                field, len
            )));
        }
        let len = len as usize;
        if len > max_len {
            return Err(WireError::LimitExceeded {
                field,
                len,
                max: max_len,
            });
        }
        Ok(Some(len))
    }

    fn read_nullable_string(&mut self, max_len: usize) -> WireResult<Option<String>> {
        let Some(len) = self.read_length("string", max_len)? else {
            return Ok(None);
        };
        let bytes = self.read_raw(len)?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| WireError::Protocol(format!("invalid UTF-8 in string: {}", e)))
    }

    /// NULL strings decode as empty, the way the server's own clients do.
    fn read_string(&mut self, max_len: usize) -> WireResult<String> {
        Ok(self.read_nullable_string(max_len)?.unwrap_or_default())
    }

    fn read_varbinary(&mut self, max_len: usize) -> WireResult<Option<Vec<u8>>> {
        match self.read_length("varbinary", max_len)? {
            Some(len) => self.read_raw(len).map(Some),
            None => Ok(None),
        }
    }
}

impl<R: Read + ?Sized> WireRead for R {}

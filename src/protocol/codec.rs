use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use super::command::{CallRequest, LoginRequest};
use super::response::{read_call_response, read_login_response, CallResponse, LoginResponse};
use super::value::Value;
use crate::error::{WireError, WireResult};

/// Largest message the server accepts (50 MB)
pub const MAX_MESSAGE_SIZE: usize = 50 * 1024 * 1024;

/// Size bounds applied while encoding and decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolLimits {
    /// Largest encoded request this client will produce
    #[serde(default = "default_limit")]
    pub max_message_size: usize,
    /// Largest declared length accepted for a string, byte array or row
    #[serde(default = "default_limit")]
    pub max_field_len: usize,
}

fn default_limit() -> usize {
    MAX_MESSAGE_SIZE
}

impl Default for ProtocolLimits {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE,
            max_field_len: MAX_MESSAGE_SIZE,
        }
    }
}

fn check_size(buf: Vec<u8>, limits: &ProtocolLimits) -> WireResult<Vec<u8>> {
    if buf.len() > limits.max_message_size {
        return Err(WireError::MessageTooLarge);
    }
    Ok(buf)
}

/// Build the login request for `username`/`password`.
pub fn encode_login(username: &str, password: &str) -> WireResult<Vec<u8>> {
    let req = LoginRequest::new(username, password);
    encode_login_request(&req, &ProtocolLimits::default())
}

pub fn encode_login_request(req: &LoginRequest, limits: &ProtocolLimits) -> WireResult<Vec<u8>> {
    let mut buf = Vec::new();
    req.write_to(&mut buf)?;
    check_size(buf, limits)
}

/// Build a procedure call request.
///
/// The whole message is assembled in memory; on error nothing is returned.
pub fn encode_call(procedure: &str, client_handle: i64, params: &[Value]) -> WireResult<Vec<u8>> {
    let req = CallRequest::new(procedure, client_handle, params.to_vec());
    encode_call_request(&req, &ProtocolLimits::default())
}

pub fn encode_call_request(req: &CallRequest, limits: &ProtocolLimits) -> WireResult<Vec<u8>> {
    let mut buf = Vec::new();
    req.write_to(&mut buf)?;
    check_size(buf, limits)
}

/// Encode and write a complete login request to `w`.
pub fn write_login<W: Write>(
    w: &mut W,
    req: &LoginRequest,
    limits: &ProtocolLimits,
) -> WireResult<()> {
    let buf = encode_login_request(req, limits)?;
    w.write_all(&buf)?;
    Ok(())
}

/// Encode and write a complete call request to `w`.
///
/// Nothing reaches `w` unless every parameter marshalled.
pub fn write_call<W: Write>(
    w: &mut W,
    req: &CallRequest,
    limits: &ProtocolLimits,
) -> WireResult<()> {
    let buf = encode_call_request(req, limits)?;
    w.write_all(&buf)?;
    Ok(())
}

pub fn decode_login_response<R: Read>(r: &mut R) -> WireResult<LoginResponse> {
    read_login_response(r, &ProtocolLimits::default())
}

pub fn decode_login_response_with<R: Read>(
    r: &mut R,
    limits: &ProtocolLimits,
) -> WireResult<LoginResponse> {
    read_login_response(r, limits)
}

pub fn decode_call_response<R: Read>(r: &mut R) -> WireResult<CallResponse> {
    read_call_response(r, &ProtocolLimits::default())
}

pub fn decode_call_response_with<R: Read>(
    r: &mut R,
    limits: &ProtocolLimits,
) -> WireResult<CallResponse> {
    read_call_response(r, limits)
}

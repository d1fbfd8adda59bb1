use sha2::{Digest, Sha256};
use std::io::Write;

use super::marshal::marshal_value;
use super::primitive::WireWrite;
use super::value::Value;
use crate::error::{WireError, WireResult};

/// Service name sent at the start of every login request
pub const LOGIN_SERVICE: &str = "database";

/// Size of the password digest block in a login request
pub const PASSWORD_DIGEST_LEN: usize = 32;

/// Login handshake request
///
/// Only the SHA-256 digest of the password is kept; the plaintext is
/// dropped as soon as the request is built.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    password_digest: [u8; PASSWORD_DIGEST_LEN],
}

impl LoginRequest {
    pub fn new(username: &str, password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        Self {
            username: username.to_string(),
            password_digest: hasher.finalize().into(),
        }
    }

    pub fn password_digest(&self) -> &[u8; PASSWORD_DIGEST_LEN] {
        &self.password_digest
    }

    /// Serialize the request body into `w`.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> WireResult<()> {
        w.write_string(LOGIN_SERVICE)?;
        w.write_string(&self.username)?;
        // fixed size, no length prefix
        w.write_raw(&self.password_digest)
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password_digest", &"<redacted>")
            .finish()
    }
}

/// Stored procedure invocation request
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    pub procedure: String,
    /// Caller-assigned id echoed back in the response
    pub client_handle: i64,
    pub params: Vec<Value>,
}

impl CallRequest {
    pub fn new(procedure: &str, client_handle: i64, params: Vec<Value>) -> Self {
        Self {
            procedure: procedure.to_string(),
            client_handle,
            params,
        }
    }

    /// Serialize the request body into `w`.
    ///
    /// Stops at the first parameter that fails; callers that need an
    /// all-or-nothing write should go through
    /// [`encode_call`](super::codec::encode_call).
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> WireResult<()> {
        let param_count = i16::try_from(self.params.len()).map_err(|_| {
            WireError::InvalidValue(format!(
                "{} parameters exceed the 16-bit parameter count",
                self.params.len()
            ))
        })?;

        // batch timeout type; this client never sets a timeout
        w.write_byte(0)?;
        w.write_string(&self.procedure)?;
        w.write_long(self.client_handle)?;
        w.write_short(param_count)?;
        for param in &self.params {
            marshal_value(w, param)?;
        }
        Ok(())
    }
}

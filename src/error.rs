use thiserror::Error;

use crate::protocol::types::{ResponseStatus, WireType};

#[derive(Error, Debug)]
pub enum WireError {
    /// The underlying byte stream failed (short read, closed stream, ...)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed (result code {code})")]
    AuthenticationFailed { code: i8 },

    /// The server answered the call with a non-success status
    #[error("Server rejected call with status {status:?}: {message}")]
    Server {
        status: ResponseStatus,
        message: String,
    },

    #[error("Bad table count in procedure response: {0}")]
    NegativeTableCount(i16),

    #[error("Framing error: expected {expected} bytes, got {actual}")]
    Framing { expected: usize, actual: usize },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Length {len} of {field} exceeds limit {max}")]
    LimitExceeded {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unexpected null type {0:?}")]
    UnsupportedNullType(WireType),

    #[error("Message too large")]
    MessageTooLarge,
}

pub type WireResult<T> = Result<T, WireError>;

impl WireError {
    /// Could not reach or read from the server.
    pub fn is_io(&self) -> bool {
        matches!(self, WireError::Io(_))
    }

    /// The server understood the request and refused it.
    pub fn is_server_rejection(&self) -> bool {
        matches!(
            self,
            WireError::AuthenticationFailed { .. } | WireError::Server { .. }
        )
    }

    /// A message could not be built or read within the protocol's rules.
    ///
    /// Covers malformed responses as well as values the encoder refused;
    /// [`is_encode_failure`](Self::is_encode_failure) narrows to the latter.
    pub fn is_protocol_violation(&self) -> bool {
        self.is_encode_failure()
            || matches!(
                self,
                WireError::NegativeTableCount(_)
                    | WireError::Framing { .. }
                    | WireError::Protocol(_)
                    | WireError::LimitExceeded { .. }
            )
    }

    /// The request was rejected before any byte was written.
    pub fn is_encode_failure(&self) -> bool {
        matches!(
            self,
            WireError::InvalidValue(_)
                | WireError::UnsupportedNullType(_)
                | WireError::MessageTooLarge
        )
    }
}

//! voltwire
//!
//! Client-side binary wire protocol for a row-oriented database's stored
//! procedure interface: login handshakes, procedure call requests, and the
//! responses (status fields plus result tables) that come back.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use voltwire::protocol::{decode_login_response, encode_call, encode_login, Value};
//!
//! let login = encode_login("admin", "password")?;
//! assert!(!login.is_empty());
//!
//! let call = encode_call("Insert", 42, &[Value::Int(7), Value::from("hello")])?;
//! assert_eq!(call[0], 0);
//!
//! // A login that the server refused
//! let err = decode_login_response(&mut Cursor::new(vec![1u8])).unwrap_err();
//! assert!(err.is_server_rejection());
//! # Ok::<(), voltwire::WireError>(())
//! ```
//!
//! Transport (sockets, message framing, timeouts) is left to the caller:
//! every function here works on a `std::io::Read` or `std::io::Write`.

pub mod cli;
pub mod config;
pub mod error;
pub mod protocol;

pub use config::Config;
pub use error::{WireError, WireResult};
pub use protocol::{CallRequest, CallResponse, LoginRequest, LoginResponse, Table, Value, WireType};

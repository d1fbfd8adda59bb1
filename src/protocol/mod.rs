//! Wire protocol for the stored procedure interface
//!
//! Outbound: [`Value`]s are marshalled by [`marshal`] into login and call
//! requests built in [`command`]. Inbound: [`response`] and [`table`] decode
//! the server's answers. All integers are big-endian.

pub mod codec;
pub mod command;
pub mod marshal;
pub mod primitive;
pub mod response;
pub mod table;
pub mod types;
pub mod value;

pub use codec::{
    decode_call_response, decode_call_response_with, decode_login_response,
    decode_login_response_with, encode_call, encode_call_request, encode_login,
    encode_login_request, write_call, write_login, ProtocolLimits, MAX_MESSAGE_SIZE,
};
pub use command::{CallRequest, LoginRequest, LOGIN_SERVICE};
pub use marshal::{encode_null, marshal_value};
pub use primitive::{WireRead, WireWrite};
pub use response::{CallResponse, LoginResponse};
pub use table::Table;
pub use types::{ResponseStatus, WireType, NULL_TIMESTAMP};
pub use value::{NullValue, Value, ValueArray};

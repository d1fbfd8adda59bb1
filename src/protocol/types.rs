use serde::Serialize;

/// Tag byte written before every marshalled value.
///
/// The numbering is fixed by the server. `Bool` shares tag 3 with the
/// server's TINYINT column type, so single-byte integers go out under the
/// same tag. Changing that breaks compatibility with deployed servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Null,
    Bool,
    Short,
    Int,
    Long,
    Float,
    String,
    Timestamp,
    Decimal,
    Varbinary,
    Array,
}

impl WireType {
    pub const ALL: [WireType; 11] = [
        WireType::Null,
        WireType::Bool,
        WireType::Short,
        WireType::Int,
        WireType::Long,
        WireType::Float,
        WireType::String,
        WireType::Timestamp,
        WireType::Decimal,
        WireType::Varbinary,
        WireType::Array,
    ];

    pub const fn tag(self) -> i8 {
        match self {
            WireType::Null => 1,
            WireType::Bool => 3,
            WireType::Short => 4,
            WireType::Int => 5,
            WireType::Long => 6,
            WireType::Float => 8,
            WireType::String => 9,
            WireType::Timestamp => 11,
            WireType::Decimal => 22,
            WireType::Varbinary => 25,
            WireType::Array => -99,
        }
    }

    pub fn from_tag(tag: i8) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.tag() == tag)
    }

    /// Lower-case name, as accepted by the command-line tool.
    pub fn name(self) -> &'static str {
        match self {
            WireType::Null => "null",
            WireType::Bool => "bool",
            WireType::Short => "short",
            WireType::Int => "int",
            WireType::Long => "long",
            WireType::Float => "float",
            WireType::String => "string",
            WireType::Timestamp => "timestamp",
            WireType::Decimal => "decimal",
            WireType::Varbinary => "varbinary",
            WireType::Array => "array",
        }
    }
}

impl std::fmt::Display for WireType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 8-byte pattern the server reads as a NULL timestamp (i64::MIN).
pub const NULL_TIMESTAMP: [u8; 8] = [0x80, 0, 0, 0, 0, 0, 0, 0];

/// Null sentinel for FLOAT columns.
pub const NULL_FLOAT: f64 = -1.7e308;

/// App status the server reports when the procedure never set one.
pub const UNINITIALIZED_APP_STATUS: i8 = -128;

/// Bit in the fields-present byte announcing a status string.
pub const FIELD_STATUS_STRING: u8 = 1 << 5;

/// Bit in the fields-present byte announcing an app-status string.
pub const FIELD_APP_STATUS_STRING: u8 = 1 << 7;

/// Status byte of a procedure call response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    UserAbort,
    GracefulFailure,
    UnexpectedFailure,
    ConnectionLost,
    ServerUnavailable,
    ConnectionTimeout,
    ResponseUnknown,
    TxnRestart,
    OperationalFailure,
    Other(i8),
}

impl ResponseStatus {
    pub fn from_code(code: i8) -> Self {
        match code {
            1 => ResponseStatus::Success,
            -1 => ResponseStatus::UserAbort,
            -2 => ResponseStatus::GracefulFailure,
            -3 => ResponseStatus::UnexpectedFailure,
            -4 => ResponseStatus::ConnectionLost,
            -5 => ResponseStatus::ServerUnavailable,
            -6 => ResponseStatus::ConnectionTimeout,
            -7 => ResponseStatus::ResponseUnknown,
            -8 => ResponseStatus::TxnRestart,
            -9 => ResponseStatus::OperationalFailure,
            other => ResponseStatus::Other(other),
        }
    }

    pub fn code(self) -> i8 {
        match self {
            ResponseStatus::Success => 1,
            ResponseStatus::UserAbort => -1,
            ResponseStatus::GracefulFailure => -2,
            ResponseStatus::UnexpectedFailure => -3,
            ResponseStatus::ConnectionLost => -4,
            ResponseStatus::ServerUnavailable => -5,
            ResponseStatus::ConnectionTimeout => -6,
            ResponseStatus::ResponseUnknown => -7,
            ResponseStatus::TxnRestart => -8,
            ResponseStatus::OperationalFailure => -9,
            ResponseStatus::Other(code) => code,
        }
    }

    pub fn is_success(self) -> bool {
        self == ResponseStatus::Success
    }
}

use serde::{Serialize, Serializer};
use std::io::Read;
use std::net::Ipv4Addr;

use super::codec::ProtocolLimits;
use super::primitive::WireRead;
use super::table::{decode_table, Table};
use super::types::{
    ResponseStatus, FIELD_APP_STATUS_STRING, FIELD_STATUS_STRING, UNINITIALIZED_APP_STATUS,
};
use crate::error::{WireError, WireResult};

/// Server advertisement returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub host_id: i32,
    pub connection_id: i64,
    /// Leader IPv4 address packed into an integer
    pub leader_address: i32,
    pub build_string: String,
}

impl LoginResponse {
    pub fn leader_ipv4(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.leader_address as u32)
    }
}

/// Response to a stored procedure call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResponse {
    pub client_handle: i64,
    pub fields_present: u8,
    #[serde(serialize_with = "status_by_name")]
    pub status: i8,
    pub status_string: Option<String>,
    pub app_status: i8,
    pub app_status_string: Option<String>,
    pub cluster_round_trip_time: i32,
    pub tables: Vec<Table>,
}

fn status_by_name<S: Serializer>(code: &i8, s: S) -> Result<S::Ok, S::Error> {
    ResponseStatus::from_code(*code).serialize(s)
}

impl CallResponse {
    pub fn status(&self) -> ResponseStatus {
        ResponseStatus::from_code(self.status)
    }

    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    /// Application status set by the procedure, if it set one.
    pub fn app_status(&self) -> Option<i8> {
        (self.app_status != UNINITIALIZED_APP_STATUS).then_some(self.app_status)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Tables on success, `WireError::Server` otherwise.
    pub fn into_result(self) -> WireResult<Vec<Table>> {
        let status = self.status();
        if status.is_success() {
            Ok(self.tables)
        } else {
            Err(WireError::Server {
                status,
                message: self.status_string.unwrap_or_default(),
            })
        }
    }
}

/// Decode the login handshake response.
pub fn read_login_response<R: Read>(
    r: &mut R,
    limits: &ProtocolLimits,
) -> WireResult<LoginResponse> {
    let auth_result = r.read_byte()?;
    if auth_result != 0 {
        tracing::warn!("Login rejected by server (result code {})", auth_result);
        return Err(WireError::AuthenticationFailed { code: auth_result });
    }

    let host_id = r.read_int()?;
    let connection_id = r.read_long()?;
    let _cluster_start = r.read_long()?;
    let leader_address = r.read_int()?;
    let build_string = r.read_string(limits.max_field_len)?;

    tracing::debug!(
        "Login accepted: host_id={} connection_id={} build={}",
        host_id,
        connection_id,
        build_string
    );

    Ok(LoginResponse {
        host_id,
        connection_id,
        leader_address,
        build_string,
    })
}

/// Decode a procedure call response, tables included.
pub fn read_call_response<R: Read>(
    r: &mut R,
    limits: &ProtocolLimits,
) -> WireResult<CallResponse> {
    let client_handle = r.read_long()?;
    let fields_present = r.read_byte()? as u8;
    let status = r.read_byte()?;
    let status_string = if fields_present & FIELD_STATUS_STRING != 0 {
        Some(r.read_string(limits.max_field_len)?)
    } else {
        None
    };
    let app_status = r.read_byte()?;
    let app_status_string = if fields_present & FIELD_APP_STATUS_STRING != 0 {
        Some(r.read_string(limits.max_field_len)?)
    } else {
        None
    };
    let cluster_round_trip_time = r.read_int()?;

    let table_count = r.read_short()?;
    if table_count < 0 {
        tracing::warn!(
            "Bad table count {} in response to handle {}",
            table_count,
            client_handle
        );
        return Err(WireError::NegativeTableCount(table_count));
    }

    let mut tables = Vec::with_capacity(table_count as usize);
    for _ in 0..table_count {
        tables.push(decode_table(r, limits)?);
    }

    tracing::debug!(
        "Call response: handle={} status={} tables={}",
        client_handle,
        status,
        tables.len()
    );

    Ok(CallResponse {
        client_handle,
        fields_present,
        status,
        status_string,
        app_status,
        app_status_string,
        cluster_round_trip_time,
        tables,
    })
}

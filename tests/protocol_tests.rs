//! Wire Protocol Tests
//!
//! Byte-level checks for:
//! - Login and call request encoding
//! - Parameter marshalling and null sentinels
//! - Login, call response and table decoding

mod common;

use common::{login_response, unmarshal, CallResponseBuilder, Decoded, TableBuilder};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use voltwire::protocol::{
    decode_call_response, decode_login_response, encode_call, encode_login, encode_null,
    marshal_value, ResponseStatus, Value, WireType, WireWrite,
};
use voltwire::WireError;

fn len_prefixed(s: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_string(s).unwrap();
    buf
}

fn marshal(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    marshal_value(&mut buf, value).unwrap();
    buf
}

// ============================================================================
// Request Encoding Tests
// ============================================================================

#[test]
fn test_call_insert_bytes() {
    let bytes = encode_call("Insert", 42, &[Value::Int(7), Value::from("hello")]).unwrap();

    let mut expected = vec![0x00];
    expected.extend(len_prefixed("Insert"));
    expected.extend(42i64.to_be_bytes());
    expected.extend([0x00, 0x02]);
    expected.push(WireType::Int.tag() as u8);
    expected.extend(7i32.to_be_bytes());
    expected.push(WireType::String.tag() as u8);
    expected.extend(len_prefixed("hello"));

    assert_eq!(bytes, expected);
    assert_eq!(WireType::String.tag(), 0x09);
}

#[test]
fn test_login_contains_digest_not_password() {
    let bytes = encode_login("user", "pw").unwrap();

    let mut expected = len_prefixed("database");
    expected.extend(len_prefixed("user"));
    expected.extend_from_slice(&Sha256::digest(b"pw"));
    assert_eq!(bytes, expected);

    // digest is the final 32 bytes, right after the username field
    let digest_start = bytes.len() - 32;
    let fields = &bytes[..digest_start];
    assert_eq!(fields, [len_prefixed("database"), len_prefixed("user")].concat());
    assert!(!fields.windows(2).any(|w| w == b"pw"));
}

#[test]
fn test_call_with_bad_param_produces_nothing() {
    let params = vec![Value::Int(0); i16::MAX as usize + 1];
    let err = encode_call("Many", 1, &params).unwrap_err();
    assert!(matches!(err, WireError::InvalidValue(_)));
}

// ============================================================================
// Marshalling Tests
// ============================================================================

#[test]
fn test_marshal_round_trip_all_kinds() {
    let cases = vec![
        (Value::Bool(true), WireType::Bool, Decoded::Byte(1)),
        (Value::TinyInt(-5), WireType::Bool, Decoded::Byte(-5)),
        (Value::Short(-300), WireType::Short, Decoded::Short(-300)),
        (Value::Int(123_456), WireType::Int, Decoded::Int(123_456)),
        (Value::Long(-1), WireType::Long, Decoded::Long(-1)),
        (Value::Float(2.25), WireType::Float, Decoded::Float(2.25)),
        (
            Value::from("héllo"),
            WireType::String,
            Decoded::String(Some("héllo".to_string())),
        ),
        (
            Value::from(vec![1u8, 2, 3]),
            WireType::Varbinary,
            Decoded::Varbinary(Some(vec![1, 2, 3])),
        ),
        (
            Value::Timestamp(1_700_000_000_000_000),
            WireType::Timestamp,
            Decoded::Timestamp(1_700_000_000_000_000),
        ),
    ];

    for (value, ty, decoded) in cases {
        let bytes = marshal(&value);
        let mut cursor = Cursor::new(bytes.clone());
        assert_eq!(unmarshal(&mut cursor), (ty, decoded), "value {:?}", value);
        assert_eq!(cursor.position() as usize, bytes.len());
    }
}

#[test]
fn test_marshal_array_vs_varbinary() {
    let bytes = marshal(&Value::from(vec![9u8, 8]));
    assert_eq!(bytes[0], WireType::Varbinary.tag() as u8);
    assert_eq!(&bytes[1..5], &2i32.to_be_bytes());

    let arr = Value::array(vec![Value::TinyInt(9), Value::TinyInt(8)]).unwrap();
    let bytes = marshal(&arr);
    assert_eq!(bytes[0], WireType::Array.tag() as u8);
    assert_eq!(&bytes[1..3], &2i16.to_be_bytes());

    let (ty, decoded) = unmarshal(&mut Cursor::new(bytes));
    assert_eq!(ty, WireType::Array);
    assert_eq!(
        decoded,
        Decoded::Array(vec![
            (WireType::Bool, Decoded::Byte(9)),
            (WireType::Bool, Decoded::Byte(8)),
        ])
    );
}

#[test]
fn test_marshal_nested_string_array() {
    let arr = Value::array(vec![Value::from("a"), Value::null(WireType::String).unwrap()]).unwrap();
    let (_, decoded) = unmarshal(&mut Cursor::new(marshal(&arr)));
    assert_eq!(
        decoded,
        Decoded::Array(vec![
            (WireType::String, Decoded::String(Some("a".to_string()))),
            (WireType::String, Decoded::String(None)),
        ])
    );
}

#[test]
fn test_null_sentinels_match_table() {
    let expect = |ty: WireType, payload: Vec<u8>| {
        let mut buf = Vec::new();
        encode_null(&mut buf, ty).unwrap();
        assert_eq!(buf[0], ty.tag() as u8);
        assert_eq!(buf[1..].to_vec(), payload, "null {}", ty);
    };

    expect(WireType::Bool, i8::MIN.to_be_bytes().to_vec());
    expect(WireType::Short, i16::MIN.to_be_bytes().to_vec());
    expect(WireType::Int, i32::MIN.to_be_bytes().to_vec());
    expect(WireType::Long, i64::MIN.to_be_bytes().to_vec());
    expect(WireType::Float, (-1.7e308f64).to_bits().to_be_bytes().to_vec());
    expect(WireType::String, (-1i32).to_be_bytes().to_vec());
    expect(WireType::Varbinary, (-1i32).to_be_bytes().to_vec());
    expect(WireType::Timestamp, vec![0x80, 0, 0, 0, 0, 0, 0, 0]);
}

// ============================================================================
// Response Decoding Tests
// ============================================================================

#[test]
fn test_decode_login_response() {
    let bytes = login_response(3, 77, i32::from_be_bytes([127, 0, 0, 1]), "v9.2");
    let resp = decode_login_response(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(resp.host_id, 3);
    assert_eq!(resp.connection_id, 77);
    assert_eq!(resp.leader_ipv4().to_string(), "127.0.0.1");
    assert_eq!(resp.build_string, "v9.2");
}

#[test]
fn test_decode_login_truncated() {
    let mut bytes = login_response(3, 77, 0, "v9.2");
    bytes.truncate(10);
    let err = decode_login_response(&mut Cursor::new(bytes)).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_negative_table_count_is_protocol_error() {
    let mut builder = CallResponseBuilder::new(5);
    builder.table_count = Some(-1);
    let err = decode_call_response(&mut Cursor::new(builder.build())).unwrap_err();
    assert!(matches!(err, WireError::NegativeTableCount(-1)));
    assert!(err.is_protocol_violation());
}

#[test]
fn test_fields_present_zero_reads_no_strings() {
    let builder = CallResponseBuilder::new(5);
    let bytes = builder.build();
    let mut cursor = Cursor::new(bytes.clone());
    let resp = decode_call_response(&mut cursor).unwrap();
    assert_eq!(resp.client_handle, 5);
    assert_eq!(resp.status_string, None);
    assert_eq!(resp.app_status_string, None);
    assert_eq!(resp.table_count(), 0);
    assert_eq!(cursor.position() as usize, bytes.len());
}

#[test]
fn test_fields_present_bits_five_and_seven() {
    let mut builder = CallResponseBuilder::new(6);
    builder.fields_present = 0b1010_0000;
    builder.status = -1;
    builder.status_string = Some("aborted".to_string());
    builder.app_status = 4;
    builder.app_status_string = Some("custom".to_string());
    builder.round_trip = 12;

    let resp = decode_call_response(&mut Cursor::new(builder.build())).unwrap();
    assert_eq!(resp.status(), ResponseStatus::UserAbort);
    assert_eq!(resp.status_string.as_deref(), Some("aborted"));
    assert_eq!(resp.app_status(), Some(4));
    assert_eq!(resp.app_status_string.as_deref(), Some("custom"));
    assert_eq!(resp.cluster_round_trip_time, 12);

    // the same bitmask without the strings on the wire cannot decode
    builder.status_string = None;
    builder.app_status_string = None;
    assert!(decode_call_response(&mut Cursor::new(builder.build())).is_err());
}

#[test]
fn test_fields_present_status_string_only() {
    let mut builder = CallResponseBuilder::new(7);
    builder.fields_present = 0b0010_0000;
    builder.status = -2;
    builder.status_string = Some("too bad".to_string());
    builder.app_status = 9;
    let bytes = builder.build();

    let mut cursor = Cursor::new(bytes.clone());
    let resp = decode_call_response(&mut cursor).unwrap();
    assert_eq!(resp.status(), ResponseStatus::GracefulFailure);
    assert_eq!(resp.status_string.as_deref(), Some("too bad"));
    assert_eq!(resp.app_status(), Some(9));
    assert_eq!(resp.app_status_string, None);
    assert_eq!(cursor.position() as usize, bytes.len());
}

#[test]
fn test_fields_present_app_status_string_only() {
    let mut builder = CallResponseBuilder::new(8);
    builder.fields_present = 0b1000_0000;
    builder.app_status = 2;
    builder.app_status_string = Some("retry later".to_string());
    let bytes = builder.build();

    let mut cursor = Cursor::new(bytes.clone());
    let resp = decode_call_response(&mut cursor).unwrap();
    assert!(resp.is_success());
    assert_eq!(resp.status_string, None);
    assert_eq!(resp.app_status(), Some(2));
    assert_eq!(resp.app_status_string.as_deref(), Some("retry later"));
    assert_eq!(cursor.position() as usize, bytes.len());
}

#[test]
fn test_invalid_utf8_status_string_is_protocol_error() {
    let mut bytes = Vec::new();
    bytes.write_long(3).unwrap();
    bytes.write_byte(0b0010_0000).unwrap();
    bytes.write_byte(-1).unwrap();
    bytes.write_int(2).unwrap();
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    bytes.write_byte(-128).unwrap();
    bytes.write_int(0).unwrap();
    bytes.write_short(0).unwrap();

    let err = decode_call_response(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, WireError::Protocol(_)));
    assert!(err.is_protocol_violation());
}

#[test]
fn test_decode_table_scenario() {
    let row = [0u8, 0, 0, 1, 0, 0, 0, 3, b'b', b'o', b'b'];
    let mut builder = CallResponseBuilder::new(42);
    builder.tables.push(
        TableBuilder::new(0)
            .column(WireType::Int, "id")
            .column(WireType::String, "name")
            .row(&row),
    );

    let resp = decode_call_response(&mut Cursor::new(builder.build())).unwrap();
    let tables = resp.into_result().unwrap();
    assert_eq!(tables.len(), 1);

    let table = &tables[0];
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.column_type(0), Some(WireType::Int));
    assert_eq!(table.column_type(1), Some(WireType::String));
    assert_eq!(table.column_names(), &["id".to_string(), "name".to_string()]);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.row(0), Some(&row[..]));
}

#[test]
fn test_decode_multiple_tables_in_order() {
    let mut builder = CallResponseBuilder::new(1);
    builder.tables.push(TableBuilder::new(0).column(WireType::Long, "a").row(&[1]));
    builder
        .tables
        .push(TableBuilder::new(0).column(WireType::Float, "b").row(&[2]).row(&[3, 4]));

    let resp = decode_call_response(&mut Cursor::new(builder.build())).unwrap();
    assert_eq!(resp.tables[0].column_names(), &["a".to_string()]);
    assert_eq!(resp.tables[1].row_count(), 2);
    assert_eq!(resp.tables[1].row(1), Some(&[3u8, 4][..]));
}

#[test]
fn test_truncated_row_is_framing_error() {
    let mut builder = CallResponseBuilder::new(1);
    builder
        .tables
        .push(TableBuilder::new(0).column(WireType::Int, "id").row(&[0, 0, 0, 1, 2, 3]));
    let mut bytes = builder.build();
    bytes.truncate(bytes.len() - 2);

    let err = decode_call_response(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(
        err,
        WireError::Framing {
            expected: 6,
            actual: 4
        }
    ));
}

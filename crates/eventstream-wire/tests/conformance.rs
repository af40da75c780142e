//! Literal byte-exact scenarios the wire codec must accept: known-good and
//! known-bad frames from the `application/vnd.amazon.eventstream` format.

use bytes::Bytes;
use eventstream_wire::{Frame, HeaderValue, Headers, WireError};

#[test]
fn empty_frame() {
    let bytes: [u8; 16] =
        [0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x05, 0xC2, 0x48, 0xEB, 0x7D, 0x98, 0xC8, 0xFF];

    let frame = Frame::decode(&bytes).expect("should decode");
    assert!(frame.headers.is_empty());
    assert!(frame.payload.is_empty());
    assert_eq!(frame.encode().unwrap(), bytes);
}

#[test]
fn single_string_header_round_trips() {
    let mut headers = Headers::new();
    headers.insert("string", HeaderValue::string("string").unwrap()).unwrap();
    let frame = Frame::new(headers, Bytes::new());

    let encoded = frame.encode().unwrap();
    let decoded = Frame::decode(&encoded).unwrap();
    assert_eq!(decoded.headers.get_str("string"), Some("string"));
    assert!(decoded.payload.is_empty());
    assert_eq!(decoded.encode().unwrap(), encoded);
}

#[test]
fn payload_with_content_type() {
    let mut headers = Headers::new();
    headers.insert("content-type", HeaderValue::string("application/json").unwrap()).unwrap();
    let frame = Frame::new(headers, Bytes::from_static(b"{'foo':'bar'}"));

    let encoded = frame.encode().unwrap();
    let decoded = Frame::decode(&encoded).unwrap();
    assert_eq!(decoded.headers.get_str("content-type"), Some("application/json"));
    assert_eq!(&decoded.payload[..], b"{'foo':'bar'}".as_slice());
}

#[test]
fn corrupted_payload_without_updated_crc_fails() {
    let mut headers = Headers::new();
    headers.insert("content-type", HeaderValue::string("application/json").unwrap()).unwrap();
    let frame = Frame::new(headers, Bytes::from_static(b"{'foo':'bar'}"));
    let mut encoded = frame.encode().unwrap();

    let payload_start = encoded.len() - 4 - frame.payload.len();
    encoded[payload_start] ^= 0x01;

    let err = Frame::decode(&encoded).unwrap_err();
    assert!(matches!(err, WireError::ChecksumMismatch { .. }));
}

#[test]
fn duplicate_header_name_fails_at_decode() {
    let mut body = Vec::new();
    eventstream_wire::encode_header("test", &HeaderValue::Bool(true), &mut body).unwrap();
    eventstream_wire::encode_header("test", &HeaderValue::Bool(false), &mut body).unwrap();
    let encoded = eventstream_wire::encode_frame(&body, &[]).unwrap();

    let err = Frame::decode(&encoded).unwrap_err();
    assert!(matches!(err, WireError::DuplicateHeader(name) if name == "test"));
}

#[test]
fn oversize_header_value_is_rejected_before_it_reaches_the_wire() {
    let err = HeaderValue::bytes(vec![0u8; 32_768]).unwrap_err();
    assert!(matches!(err, WireError::InvalidHeaderValueLength(32_768)));
}

#[test]
fn flipping_a_bit_in_a_valid_frame_never_silently_succeeds() {
    let mut headers = Headers::new();
    headers.insert("k", HeaderValue::I32(42)).unwrap();
    let frame = Frame::new(headers, Bytes::from_static(b"payload"));
    let encoded = frame.encode().unwrap();

    for byte_index in 0..encoded.len() {
        let mut mutated = encoded.clone();
        mutated[byte_index] ^= 0x01;
        match Frame::decode(&mutated) {
            Ok(decoded) => assert_eq!(decoded, frame, "a bit flip must not silently change the frame"),
            Err(_) => {},
        }
    }
}

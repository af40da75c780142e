//! Property-based tests for the public frame/header API.
//!
//! These exercise every header value type and the reader's streaming
//! contract from outside the crate, complementing the narrower unit tests
//! colocated with `frame.rs`/`header.rs`.

use bytes::Bytes;
use eventstream_wire::{Frame, FrameReader, HeaderValue, Headers};
use proptest::prelude::*;
use uuid::Uuid;

fn arbitrary_value() -> impl Strategy<Value = HeaderValue> {
    prop_oneof![
        any::<bool>().prop_map(HeaderValue::Bool),
        any::<i8>().prop_map(HeaderValue::I8),
        any::<i16>().prop_map(HeaderValue::I16),
        any::<i32>().prop_map(HeaderValue::I32),
        any::<i64>().prop_map(HeaderValue::I64),
        prop::collection::vec(any::<u8>(), 0..128).prop_map(|b| HeaderValue::bytes(b).unwrap()),
        "[[:alnum:] ]{0,128}".prop_map(|s| HeaderValue::string(s).unwrap()),
        any::<i64>().prop_map(HeaderValue::Timestamp),
        any::<u128>().prop_map(|v| HeaderValue::Uuid(Uuid::from_u128(v))),
    ]
}

fn arbitrary_headers() -> impl Strategy<Value = Headers> {
    prop::collection::vec(("[a-zA-Z][a-zA-Z0-9_-]{0,20}", arbitrary_value()), 0..10).prop_map(|pairs| {
        let mut headers = Headers::new();
        let mut seen = std::collections::HashSet::new();
        for (name, value) in pairs {
            if seen.insert(name.clone()) {
                headers.insert(name, value).expect("unique name should insert cleanly");
            }
        }
        headers
    })
}

proptest! {
    #[test]
    fn frame_round_trip_across_all_header_types(
        headers in arbitrary_headers(),
        payload in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let frame = Frame::new(headers, Bytes::from(payload));
        let encoded = frame.encode().expect("encode should succeed");
        let decoded = Frame::decode(&encoded).expect("decode should succeed");
        prop_assert_eq!(decoded, frame);
    }

    #[test]
    fn reader_yields_exactly_the_frames_written(frame_payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..6)) {
        let mut wire = Vec::new();
        let mut expected = Vec::new();
        for (i, payload) in frame_payloads.into_iter().enumerate() {
            let mut headers = Headers::new();
            headers.insert("seq", HeaderValue::I32(i as i32)).unwrap();
            let frame = Frame::new(headers, Bytes::from(payload));
            wire.extend_from_slice(&frame.encode().unwrap());
            expected.push(frame);
        }

        let mut reader = FrameReader::new(wire.as_slice());
        for frame in &expected {
            let got = reader.read_one().unwrap().expect("frame should be present");
            prop_assert_eq!(&got, frame);
        }
        prop_assert_eq!(reader.read_one().unwrap(), None);
    }
}

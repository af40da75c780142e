//! The complete wire frame: prelude, headers block, payload, message CRC.
//!
//! ```text
//! [total_length: u32][headers_length: u32][prelude_crc: u32]
//! [headers: headers_length bytes][payload: variable][message_crc: u32]
//! ```
//!
//! `message_crc` is not an independent CRC32 of `headers || payload`; it is
//! the same running CRC32 state seeded with `prelude_crc`, continued over
//! `prelude_crc_be || headers || payload`. See [`crate::crc`] for the shared
//! continuation helper.

use bytes::{Buf, BufMut, Bytes};

use crate::{
    crc,
    error::{Result, WireError},
    header::{Headers, decode_headers, encode_headers},
};

/// Prelude + trailing CRC overhead that surrounds every headers/payload body.
pub(crate) const FRAME_OVERHEAD: usize = 16;

/// Headers block length MUST NOT exceed 128 KiB.
pub const MAX_HEADERS_LENGTH: usize = 128 * 1024;

/// Payload length MUST NOT exceed 16 MiB.
pub const MAX_PAYLOAD_LENGTH: usize = 16 * 1024 * 1024;

/// A complete, checksum-verified event-stream frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The frame's typed headers, in wire order.
    pub headers: Headers,
    /// The frame's payload bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Builds a frame from an already-decoded header map and payload.
    #[must_use]
    pub fn new(headers: Headers, payload: impl Into<Bytes>) -> Self {
        Self { headers, payload: payload.into() }
    }

    /// Encodes this frame to the wire format described in [`crate::frame`].
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidHeadersLength`]/[`WireError::InvalidPayloadLength`]
    /// if either bound is exceeded.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let headers_bytes = encode_headers(&self.headers)?;
        encode_frame(&headers_bytes, &self.payload)
    }

    /// Decodes one frame from the front of `bytes`. Any bytes past the end of
    /// the frame are ignored; use [`crate::reader`] to pull frames
    /// one-at-a-time from a stream without over-reading.
    ///
    /// # Errors
    ///
    /// See [`decode_frame`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_frame(bytes)
    }
}

/// Encodes a `(headers_bytes, payload_bytes)` pair into a complete frame.
///
/// # Errors
///
/// Returns [`WireError::InvalidHeadersLength`] if `headers_bytes` exceeds
/// [`MAX_HEADERS_LENGTH`], or [`WireError::InvalidPayloadLength`] if
/// `payload_bytes` exceeds [`MAX_PAYLOAD_LENGTH`].
pub fn encode_frame(headers_bytes: &[u8], payload_bytes: &[u8]) -> Result<Vec<u8>> {
    let span = tracing::trace_span!(
        "encode_frame",
        headers_length = headers_bytes.len(),
        payload_length = payload_bytes.len()
    );
    let _entered = span.enter();

    if headers_bytes.len() > MAX_HEADERS_LENGTH {
        tracing::trace!(headers_length = headers_bytes.len(), "headers block exceeds the frame limit");
        return Err(WireError::InvalidHeadersLength(headers_bytes.len() as u32));
    }
    if payload_bytes.len() > MAX_PAYLOAD_LENGTH {
        tracing::trace!(payload_length = payload_bytes.len(), "payload exceeds the frame limit");
        return Err(WireError::InvalidPayloadLength(payload_bytes.len() as u32));
    }

    #[allow(clippy::cast_possible_truncation)]
    let headers_length = headers_bytes.len() as u32;
    #[allow(clippy::cast_possible_truncation)]
    let total_length = (FRAME_OVERHEAD + headers_bytes.len() + payload_bytes.len()) as u32;

    let mut prelude = Vec::with_capacity(8);
    prelude.put_u32(total_length);
    prelude.put_u32(headers_length);
    let prelude_crc = crc::checksum(&prelude);

    let mut out = Vec::with_capacity(total_length as usize);
    out.extend_from_slice(&prelude);
    out.put_u32(prelude_crc);
    out.extend_from_slice(headers_bytes);
    out.extend_from_slice(payload_bytes);

    let message_crc = crc::checksum_seeded(prelude_crc, &out[8..]);
    out.put_u32(message_crc);

    Ok(out)
}

/// Decodes a complete frame from an exact byte slice.
///
/// Trailing bytes after the frame are ignored, matching the "exact size"
/// policy used by [`crate::reader`] (a reader that has already sliced off
/// the precise frame length before calling this function). Use
/// [`crate::reader::FrameReader`] to pull frames directly from a stream.
///
/// # Errors
///
/// - [`WireError::InvalidEventBytes`] if `bytes` is shorter than the 12-byte
///   prelude.
/// - [`WireError::ChecksumMismatch`] if the prelude or message CRC does not
///   verify.
/// - [`WireError::InvalidHeadersLength`]/[`WireError::InvalidPayloadLength`]
///   if the declared lengths are out of bounds.
/// - Any [`WireError`] from decoding an individual header record.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame> {
    let span = tracing::trace_span!("decode_frame", input_length = bytes.len());
    let _entered = span.enter();

    let mut cursor = bytes;
    if cursor.remaining() < 8 {
        tracing::trace!("input shorter than the prelude's length fields");
        return Err(WireError::InvalidEventBytes);
    }
    let prelude_bytes = &bytes[0..8];
    let mut total_length_cursor = &bytes[0..4];
    let total_length = total_length_cursor.get_u32();
    let mut headers_length_cursor = &bytes[4..8];
    let headers_length = headers_length_cursor.get_u32();
    cursor.advance(8);
    tracing::trace!(total_length, headers_length, "parsed prelude length fields");

    if cursor.remaining() < 4 {
        tracing::trace!(total_length, headers_length, "input shorter than the prelude CRC");
        return Err(WireError::InvalidEventBytes);
    }
    let prelude_crc = cursor.get_u32();
    let expected_prelude_crc = crc::checksum(prelude_bytes);
    if prelude_crc != expected_prelude_crc {
        tracing::trace!(total_length, headers_length, "prelude checksum mismatch");
        return Err(WireError::ChecksumMismatch { expected: expected_prelude_crc, actual: prelude_crc });
    }

    if headers_length as usize > MAX_HEADERS_LENGTH {
        tracing::trace!(total_length, headers_length, "headers length exceeds the frame limit");
        return Err(WireError::InvalidHeadersLength(headers_length));
    }
    let body_len = (total_length as usize).checked_sub(FRAME_OVERHEAD).ok_or_else(|| {
        tracing::trace!(total_length, headers_length, "total length shorter than the frame overhead");
        WireError::InvalidEventBytes
    })?;
    let payload_len = body_len.checked_sub(headers_length as usize).ok_or_else(|| {
        tracing::trace!(total_length, headers_length, "headers length exceeds the declared body length");
        WireError::InvalidEventBytes
    })?;
    if payload_len > MAX_PAYLOAD_LENGTH {
        tracing::trace!(total_length, headers_length, payload_len, "payload length exceeds the frame limit");
        #[allow(clippy::cast_possible_truncation)]
        return Err(WireError::InvalidPayloadLength(payload_len as u32));
    }

    if cursor.remaining() < body_len + 4 {
        tracing::trace!(total_length, headers_length, "input shorter than the declared total length");
        return Err(WireError::InvalidEventBytes);
    }
    let body = cursor.copy_to_bytes(body_len);
    let message_crc = cursor.get_u32();

    let expected_message_crc = crc::checksum_seeded_parts(prelude_crc, &prelude_crc.to_be_bytes(), &body);
    if message_crc != expected_message_crc {
        tracing::trace!(total_length, headers_length, "message checksum mismatch");
        return Err(WireError::ChecksumMismatch { expected: expected_message_crc, actual: message_crc });
    }

    let headers_bytes = &body[0..headers_length as usize];
    let payload = body.slice(headers_length as usize..);
    let headers = decode_headers(headers_bytes).inspect_err(|_| {
        tracing::trace!(total_length, headers_length, "failed to decode the headers block");
    })?;

    Ok(Frame { headers, payload })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::header::HeaderValue;

    fn arbitrary_headers() -> impl Strategy<Value = Headers> {
        prop::collection::vec(("[a-z]{1,16}", any::<i32>()), 0..8).prop_map(|pairs| {
            let mut headers = Headers::new();
            for (i, (name, value)) in pairs.into_iter().enumerate() {
                let unique_name = format!("{name}-{i}");
                let _ = headers.insert(unique_name, HeaderValue::I32(value));
            }
            headers
        })
    }

    proptest! {
        #[test]
        fn frame_round_trip(
            headers in arbitrary_headers(),
            payload in prop::collection::vec(any::<u8>(), 0..256),
        ) {
            let frame = Frame::new(headers, payload);
            let encoded = frame.encode().expect("encode should succeed");
            let decoded = Frame::decode(&encoded).expect("decode should succeed");
            prop_assert_eq!(decoded.headers, frame.headers);
            prop_assert_eq!(decoded.payload, frame.payload);
        }

        #[test]
        fn truncating_any_prefix_never_silently_succeeds(
            headers in arbitrary_headers(),
            payload in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let frame = Frame::new(headers, payload);
            let encoded = frame.encode().expect("encode should succeed");
            for cut in 1..encoded.len() {
                let truncated = &encoded[..encoded.len() - cut];
                prop_assert!(Frame::decode(truncated).is_err());
            }
        }
    }

    #[test]
    fn empty_frame_is_valid() {
        let frame = Frame::new(Headers::new(), Bytes::new());
        let encoded = frame.encode().unwrap();
        assert_eq!(encoded.len(), FRAME_OVERHEAD);
        let decoded = Frame::decode(&encoded).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn empty_frame_matches_conformance_bytes() {
        let expected: [u8; 16] =
            [0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x05, 0xC2, 0x48, 0xEB, 0x7D, 0x98, 0xC8, 0xFF];
        let frame = Frame::new(Headers::new(), Bytes::new());
        assert_eq!(frame.encode().unwrap(), expected);
        let decoded = Frame::decode(&expected).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let mut headers = Headers::new();
        headers.insert("content-type", HeaderValue::string("application/json").unwrap()).unwrap();
        let frame = Frame::new(headers, Bytes::from_static(b"{'foo':'bar'}"));
        let mut encoded = frame.encode().unwrap();
        let last = encoded.len() - 5; // last payload byte, before the message CRC.
        encoded[last] ^= 0xFF;
        let err = Frame::decode(&encoded).unwrap_err();
        assert!(matches!(err, WireError::ChecksumMismatch { .. }));
    }

    #[test]
    fn oversize_headers_block_is_rejected() {
        let err = encode_frame(&vec![0u8; MAX_HEADERS_LENGTH + 1], &[]).unwrap_err();
        assert!(matches!(err, WireError::InvalidHeadersLength(_)));
    }

    #[test]
    fn oversize_payload_is_rejected() {
        let err = encode_frame(&[], &vec![0u8; MAX_PAYLOAD_LENGTH + 1]).unwrap_err();
        assert!(matches!(err, WireError::InvalidPayloadLength(_)));
    }
}

//! Pulling whole frames off a byte source, sync or async.
//!
//! Both shapes below read exactly the 12-byte prelude, verify its CRC and
//! bound `total_length` *before* allocating anything sized by it, then read
//! exactly the remaining `total_length - 12` bytes and hand the assembled
//! buffer to [`crate::frame::decode_frame`] — the same parsing logic in both
//! cases, as required: there is no separate streaming parser to drift out of
//! sync with the one-shot decoder.
//!
//! Validating the prelude up front, before the body read, keeps an attacker
//! who controls only the first 12 bytes from forcing an allocation and a
//! blocking read sized by an arbitrary, unverified `total_length`.

use std::io::Read;

use bytes::Buf;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{
    crc,
    error::{Result, WireError},
    frame::{self, Frame, MAX_HEADERS_LENGTH, MAX_PAYLOAD_LENGTH},
};

/// The largest `total_length` a well-formed frame can declare: the 16-byte
/// prelude+CRC overhead plus the maximum possible headers block and payload.
const MAX_TOTAL_LENGTH: usize = frame::FRAME_OVERHEAD + MAX_HEADERS_LENGTH + MAX_PAYLOAD_LENGTH;

/// Verifies the prelude CRC and returns `total_length`, rejecting any value
/// that would make the subsequent body read unbounded.
///
/// # Errors
///
/// Returns [`WireError::ChecksumMismatch`] if the prelude CRC does not
/// verify, or [`WireError::InvalidEventBytes`] if `total_length` is smaller
/// than the frame overhead or larger than [`MAX_TOTAL_LENGTH`].
fn validate_prelude(prelude: &[u8; 12]) -> Result<u32> {
    let expected_prelude_crc = crc::checksum(&prelude[0..8]);
    let mut prelude_crc_cursor = &prelude[8..12];
    let prelude_crc = prelude_crc_cursor.get_u32();
    if prelude_crc != expected_prelude_crc {
        return Err(WireError::ChecksumMismatch { expected: expected_prelude_crc, actual: prelude_crc });
    }

    let mut total_length_cursor = &prelude[0..4];
    let total_length = total_length_cursor.get_u32();
    if (total_length as usize) < frame::FRAME_OVERHEAD || total_length as usize > MAX_TOTAL_LENGTH {
        return Err(WireError::InvalidEventBytes);
    }

    Ok(total_length)
}

/// Reads `buf.len()` bytes, treating a zero-byte read before any bytes have
/// been filled as clean EOF (`Ok(false)`) and any zero-byte read after some
/// bytes were filled as truncation (`Err`).
fn fill_sync(source: &mut impl Read, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(WireError::InvalidEventBytes);
        }
        filled += n;
    }
    Ok(true)
}

async fn fill_async<R: AsyncRead + Unpin>(source: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source.read(&mut buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(WireError::InvalidEventBytes);
        }
        filled += n;
    }
    Ok(true)
}

/// Pulls whole, checksum-verified frames from a blocking [`std::io::Read`]
/// source. Not internally buffered beyond the frame currently in flight.
#[derive(Debug)]
pub struct FrameReader<R> {
    source: R,
}

impl<R: Read> FrameReader<R> {
    /// Wraps a byte source.
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns the next frame, or `None` at a clean end-of-stream boundary.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::ChecksumMismatch`] if the prelude CRC does not
    /// verify, [`WireError::InvalidEventBytes`] if the declared
    /// `total_length` is out of bounds or the source is truncated mid-frame,
    /// or any [`WireError`] from [`frame::decode_frame`].
    pub fn read_one(&mut self) -> Result<Option<Frame>> {
        let mut prelude = [0u8; 12];
        if !fill_sync(&mut self.source, &mut prelude)? {
            return Ok(None);
        }
        let total_length = validate_prelude(&prelude)?;
        let rest_len = total_length as usize - prelude.len();
        let mut rest = vec![0u8; rest_len];
        if !fill_sync(&mut self.source, &mut rest)? {
            return Err(WireError::InvalidEventBytes);
        }

        let mut whole = Vec::with_capacity(prelude.len() + rest_len);
        whole.extend_from_slice(&prelude);
        whole.extend_from_slice(&rest);
        frame::decode_frame(&whole).map(Some)
    }

    /// Returns the wrapped source, consuming this reader.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// The async analogue of [`FrameReader`], over [`tokio::io::AsyncRead`].
#[derive(Debug)]
pub struct AsyncFrameReader<R> {
    source: R,
}

impl<R: AsyncRead + Unpin> AsyncFrameReader<R> {
    /// Wraps a byte source.
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns the next frame, or `None` at a clean end-of-stream boundary.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::ChecksumMismatch`] if the prelude CRC does not
    /// verify, [`WireError::InvalidEventBytes`] if the declared
    /// `total_length` is out of bounds or the source is truncated mid-frame,
    /// or any [`WireError`] from [`frame::decode_frame`].
    pub async fn read_one(&mut self) -> Result<Option<Frame>> {
        let mut prelude = [0u8; 12];
        if !fill_async(&mut self.source, &mut prelude).await? {
            return Ok(None);
        }
        let total_length = validate_prelude(&prelude)?;
        let rest_len = total_length as usize - prelude.len();
        let mut rest = vec![0u8; rest_len];
        if !fill_async(&mut self.source, &mut rest).await? {
            return Err(WireError::InvalidEventBytes);
        }

        let mut whole = Vec::with_capacity(prelude.len() + rest_len);
        whole.extend_from_slice(&prelude);
        whole.extend_from_slice(&rest);
        frame::decode_frame(&whole).map(Some)
    }

    /// Returns the wrapped source, consuming this reader.
    pub fn into_inner(self) -> R {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::header::{HeaderValue, Headers};

    fn sample_frame(tag: &str) -> Frame {
        let mut headers = Headers::new();
        headers.insert("tag", HeaderValue::string(tag).unwrap()).unwrap();
        Frame::new(headers, Bytes::from_static(b"payload"))
    }

    #[test]
    fn empty_source_yields_none() {
        let mut reader = FrameReader::new(std::io::Cursor::new(Vec::<u8>::new()));
        assert_eq!(reader.read_one().unwrap(), None);
    }

    #[test]
    fn reads_concatenated_frames_then_none() {
        let frames = [sample_frame("a"), sample_frame("b"), sample_frame("c")];
        let mut bytes = Vec::new();
        for frame in &frames {
            bytes.extend_from_slice(&frame.encode().unwrap());
        }

        let mut reader = FrameReader::new(std::io::Cursor::new(bytes));
        for expected in &frames {
            let got = reader.read_one().unwrap().expect("frame should be present");
            assert_eq!(&got, expected);
        }
        assert_eq!(reader.read_one().unwrap(), None);
    }

    #[test]
    fn truncated_mid_frame_is_an_error() {
        let frame = sample_frame("a");
        let encoded = frame.encode().unwrap();
        let truncated = &encoded[..encoded.len() - 1];

        let mut reader = FrameReader::new(std::io::Cursor::new(truncated.to_vec()));
        assert!(reader.read_one().is_err());
    }

    #[tokio::test]
    async fn async_reader_matches_sync_reader() {
        let frame = sample_frame("async");
        let encoded = frame.encode().unwrap();

        let mut reader = AsyncFrameReader::new(std::io::Cursor::new(encoded));
        let got = reader.read_one().await.unwrap().expect("frame should be present");
        assert_eq!(got, frame);
        assert_eq!(reader.read_one().await.unwrap(), None);
    }

    #[test]
    fn oversize_total_length_is_rejected_before_reading_the_body() {
        // A well-formed prelude claiming a total_length far past what any
        // valid frame could declare. The source has no bytes beyond the
        // prelude, so this only passes if the reader rejects the length
        // before attempting to read (and allocate) the body.
        let mut prelude = [0u8; 12];
        prelude[0..4].copy_from_slice(&u32::MAX.to_be_bytes());
        let prelude_crc = crc::checksum(&prelude[0..8]);
        prelude[8..12].copy_from_slice(&prelude_crc.to_be_bytes());

        let mut reader = FrameReader::new(std::io::Cursor::new(prelude.to_vec()));
        let err = reader.read_one().unwrap_err();
        assert!(matches!(err, WireError::InvalidEventBytes));
    }

    #[test]
    fn bad_prelude_crc_is_rejected_before_reading_the_body() {
        let mut prelude = [0u8; 12];
        prelude[0..4].copy_from_slice(&16u32.to_be_bytes());
        prelude[8..12].copy_from_slice(&0xDEAD_BEEFu32.to_be_bytes());

        let mut reader = FrameReader::new(std::io::Cursor::new(prelude.to_vec()));
        let err = reader.read_one().unwrap_err();
        assert!(matches!(err, WireError::ChecksumMismatch { .. }));
    }
}

//! Typed header records: the ten-variant value union and the ordered,
//! duplicate-free header map that makes up a frame's headers block.
//!
//! Layout of one header record on the wire:
//!
//! ```text
//! [name_len: u8][name: name_len bytes, utf-8][type_tag: u8][value: variable]
//! ```
//!
//! `type_tag` selects one of the ten encodings in the table below; see
//! [`HeaderValue`] for the Rust-side representation.

use bytes::{Buf, BufMut, Bytes};
use uuid::Uuid;

use crate::error::{Result, WireError};

/// Byte-array and string header values may not exceed this length.
pub const MAX_HEADER_VALUE_LEN: usize = 32_767;

/// Header names are 1..=255 UTF-8 bytes.
pub const MAX_HEADER_NAME_LEN: usize = 255;

const TAG_BOOL_TRUE: u8 = 0;
const TAG_BOOL_FALSE: u8 = 1;
const TAG_I8: u8 = 2;
const TAG_I16: u8 = 3;
const TAG_I32: u8 = 4;
const TAG_I64: u8 = 5;
const TAG_BYTES: u8 = 6;
const TAG_STRING: u8 = 7;
const TAG_TIMESTAMP: u8 = 8;
const TAG_UUID: u8 = 9;

/// A single typed header value.
///
/// Booleans carry no value bytes (the tag alone distinguishes true/false).
/// Integers are tagged by width rather than by a separate width field;
/// callers that would otherwise pass an untagged integer should use
/// [`HeaderValue::from`]`(i32)`, which lands on [`HeaderValue::I32`] per the
/// declared default width.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Boolean, encoded as tag 0 (true) or tag 1 (false) with no value bytes.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer. The default width for untagged integers.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Arbitrary bytes, at most [`MAX_HEADER_VALUE_LEN`] long.
    Bytes(Bytes),
    /// UTF-8 text, at most [`MAX_HEADER_VALUE_LEN`] bytes long.
    String(String),
    /// Milliseconds since the Unix epoch, UTC. Always ms-epoch int64 inside
    /// headers regardless of any payload-level timestamp format.
    Timestamp(i64),
    /// 16 raw bytes.
    Uuid(Uuid),
}

impl HeaderValue {
    fn tag(&self) -> u8 {
        match self {
            Self::Bool(true) => TAG_BOOL_TRUE,
            Self::Bool(false) => TAG_BOOL_FALSE,
            Self::I8(_) => TAG_I8,
            Self::I16(_) => TAG_I16,
            Self::I32(_) => TAG_I32,
            Self::I64(_) => TAG_I64,
            Self::Bytes(_) => TAG_BYTES,
            Self::String(_) => TAG_STRING,
            Self::Timestamp(_) => TAG_TIMESTAMP,
            Self::Uuid(_) => TAG_UUID,
        }
    }

    /// Build an `i8` value, failing if `value` does not fit.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidIntegerValue`] if `value` does not fit in
    /// an `i8`.
    pub fn try_i8(value: i64) -> Result<Self> {
        i8::try_from(value).map(Self::I8).map_err(|_| WireError::InvalidIntegerValue { width: "i8" })
    }

    /// Build an `i16` value, failing if `value` does not fit.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidIntegerValue`] if `value` does not fit in
    /// an `i16`.
    pub fn try_i16(value: i64) -> Result<Self> {
        i16::try_from(value)
            .map(Self::I16)
            .map_err(|_| WireError::InvalidIntegerValue { width: "i16" })
    }

    /// Build an `i32` value, failing if `value` does not fit.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidIntegerValue`] if `value` does not fit in
    /// an `i32`.
    pub fn try_i32(value: i64) -> Result<Self> {
        i32::try_from(value)
            .map(Self::I32)
            .map_err(|_| WireError::InvalidIntegerValue { width: "i32" })
    }

    /// Build a byte-array value, failing if it exceeds
    /// [`MAX_HEADER_VALUE_LEN`].
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidHeaderValueLength`] if `bytes` is too long.
    pub fn bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() > MAX_HEADER_VALUE_LEN {
            return Err(WireError::InvalidHeaderValueLength(bytes.len()));
        }
        Ok(Self::Bytes(bytes))
    }

    /// Build a string value, failing if its UTF-8 length exceeds
    /// [`MAX_HEADER_VALUE_LEN`].
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidHeaderValueLength`] if `value` is too long.
    pub fn string(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > MAX_HEADER_VALUE_LEN {
            return Err(WireError::InvalidHeaderValueLength(value.len()));
        }
        Ok(Self::String(value))
    }

    /// Returns the string payload, if this is a [`HeaderValue::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn write_to(&self, dst: &mut impl BufMut) -> Result<()> {
        dst.put_u8(self.tag());
        match self {
            Self::Bool(_) => {},
            Self::I8(v) => dst.put_i8(*v),
            Self::I16(v) => dst.put_i16(*v),
            Self::I32(v) => dst.put_i32(*v),
            Self::I64(v) => dst.put_i64(*v),
            Self::Bytes(b) => {
                if b.len() > MAX_HEADER_VALUE_LEN {
                    return Err(WireError::InvalidHeaderValueLength(b.len()));
                }
                #[allow(clippy::cast_possible_truncation)]
                dst.put_u16(b.len() as u16);
                dst.put_slice(b);
            },
            Self::String(s) => {
                if s.len() > MAX_HEADER_VALUE_LEN {
                    return Err(WireError::InvalidHeaderValueLength(s.len()));
                }
                #[allow(clippy::cast_possible_truncation)]
                dst.put_u16(s.len() as u16);
                dst.put_slice(s.as_bytes());
            },
            Self::Timestamp(ms) => dst.put_i64(*ms),
            Self::Uuid(u) => dst.put_slice(u.as_bytes()),
        }
        Ok(())
    }

    fn read_from(tag: u8, src: &mut impl Buf) -> Result<Self> {
        match tag {
            TAG_BOOL_TRUE => Ok(Self::Bool(true)),
            TAG_BOOL_FALSE => Ok(Self::Bool(false)),
            TAG_I8 => {
                need(src, 1)?;
                Ok(Self::I8(src.get_i8()))
            },
            TAG_I16 => {
                need(src, 2)?;
                Ok(Self::I16(src.get_i16()))
            },
            TAG_I32 => {
                need(src, 4)?;
                Ok(Self::I32(src.get_i32()))
            },
            TAG_I64 => {
                need(src, 8)?;
                Ok(Self::I64(src.get_i64()))
            },
            TAG_BYTES => {
                need(src, 2)?;
                let len = src.get_u16() as usize;
                need(src, len)?;
                Ok(Self::Bytes(src.copy_to_bytes(len)))
            },
            TAG_STRING => {
                need(src, 2)?;
                let len = src.get_u16() as usize;
                need(src, len)?;
                let bytes = src.copy_to_bytes(len);
                let s = std::str::from_utf8(&bytes)?;
                Ok(Self::String(s.to_owned()))
            },
            TAG_TIMESTAMP => {
                need(src, 8)?;
                Ok(Self::Timestamp(src.get_i64()))
            },
            TAG_UUID => {
                need(src, 16)?;
                let mut raw = [0u8; 16];
                src.copy_to_slice(&mut raw);
                Ok(Self::Uuid(Uuid::from_bytes(raw)))
            },
            _ => Err(WireError::InvalidHeaderValue { tag }),
        }
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for HeaderValue {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<Uuid> for HeaderValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

fn need(src: &impl Buf, n: usize) -> Result<()> {
    if src.remaining() < n {
        return Err(WireError::InvalidEventBytes);
    }
    Ok(())
}

/// An ordered, name-unique collection of headers.
///
/// Iteration order is insertion order, matching `encode_headers`'s
/// requirement to "iterate insertion order, concatenate".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers(Vec<(String, HeaderValue)>);

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts a header, failing if the name is already present.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidHeaderName`] if `name` is empty or longer
    /// than [`MAX_HEADER_NAME_LEN`] bytes, and [`WireError::DuplicateHeader`]
    /// if `name` is already present in this map.
    pub fn insert(&mut self, name: impl Into<String>, value: HeaderValue) -> Result<()> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_HEADER_NAME_LEN {
            return Err(WireError::InvalidHeaderName);
        }
        if self.0.iter().any(|(existing, _)| existing == &name) {
            return Err(WireError::DuplicateHeader(name));
        }
        self.0.push((name, value));
        Ok(())
    }

    /// Looks up a header by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.0.iter().find(|(existing, _)| existing == name).map(|(_, value)| value)
    }

    /// Looks up a string-valued header by name.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(HeaderValue::as_str)
    }

    /// Iterates headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a HeaderValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a HeaderValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Encodes one header record.
///
/// # Errors
///
/// Returns [`WireError::InvalidHeaderName`] if `name` is empty or too long,
/// or [`WireError::InvalidHeaderValueLength`] if a byte-array/string value
/// exceeds [`MAX_HEADER_VALUE_LEN`].
pub fn encode_header(name: &str, value: &HeaderValue, dst: &mut impl BufMut) -> Result<()> {
    if name.is_empty() || name.len() > MAX_HEADER_NAME_LEN {
        return Err(WireError::InvalidHeaderName);
    }
    #[allow(clippy::cast_possible_truncation)]
    dst.put_u8(name.len() as u8);
    dst.put_slice(name.as_bytes());
    value.write_to(dst)
}

/// Decodes one header record, returning the `(name, value)` pair.
///
/// # Errors
///
/// Returns [`WireError::InvalidEventBytes`] on truncation,
/// [`WireError::InvalidHeaderValue`] on an unknown type tag, or
/// [`WireError::InvalidUtf8`] if the name is not valid UTF-8.
pub fn decode_header(src: &mut impl Buf) -> Result<(String, HeaderValue)> {
    need(src, 1)?;
    let name_len = src.get_u8() as usize;
    if name_len == 0 {
        return Err(WireError::InvalidHeaderName);
    }
    need(src, name_len)?;
    let name_bytes = src.copy_to_bytes(name_len);
    let name = std::str::from_utf8(&name_bytes)?.to_owned();

    need(src, 1)?;
    let tag = src.get_u8();
    let value = HeaderValue::read_from(tag, src)?;
    Ok((name, value))
}

/// Encodes a full header map, in insertion order.
///
/// # Errors
///
/// Propagates any error from [`encode_header`].
pub fn encode_headers(headers: &Headers) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (name, value) in headers.iter() {
        encode_header(name, value, &mut out)?;
    }
    Ok(out)
}

/// Decodes a full header map from a byte slice, failing on any duplicate
/// name.
///
/// # Errors
///
/// Returns [`WireError::DuplicateHeader`] on a repeated name, and propagates
/// any error from [`decode_header`].
pub fn decode_headers(bytes: &[u8]) -> Result<Headers> {
    let mut cursor = bytes;
    let mut headers = Headers::new();
    while cursor.has_remaining() {
        let (name, value) = decode_header(&mut cursor)?;
        headers.insert(name, value)?;
    }
    Ok(headers)
}

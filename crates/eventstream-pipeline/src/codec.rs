//! The payload codec capability: encodes/decodes the bytes a frame carries
//! as its payload, isolated from the frame's prelude, headers, and CRCs.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{PipelineError, Result};

/// A payload codec invoked once per frame over an isolated byte buffer.
///
/// Implementations never see the frame prelude, headers, or CRCs — only the
/// payload bytes a [`crate::event::SerializeEvent`]/[`crate::event::DeserializeEvent`]
/// implementation hands it.
pub trait PayloadCodec: Send + Sync {
    /// Serializes `value` to this codec's wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Codec`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserializes `bytes` from this codec's wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Codec`] if deserialization fails.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;

    /// The MIME type this codec produces, e.g. `"application/json"`.
    fn media_type(&self) -> &'static str;
}

/// The default payload codec, backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadCodec;

impl PayloadCodec for JsonPayloadCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|err| PipelineError::Codec(err.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|err| PipelineError::Codec(err.to_string()))
    }

    fn media_type(&self) -> &'static str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn round_trips_through_json() {
        let codec = JsonPayloadCodec;
        let value = Sample { name: "widget".to_string(), count: 3 };
        let bytes = codec.encode(&value).unwrap();
        let decoded: Sample = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn media_type_is_json() {
        assert_eq!(JsonPayloadCodec.media_type(), "application/json");
    }

    #[test]
    fn decode_failure_is_a_codec_error() {
        let err = JsonPayloadCodec.decode::<Sample>(b"not json").unwrap_err();
        assert!(matches!(err, PipelineError::Codec(_)));
    }
}

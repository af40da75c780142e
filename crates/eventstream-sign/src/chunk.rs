//! Chunked SigV4 "event signing": a running HMAC chain over a stream of
//! frames, bit-exact to the AWS event-stream chunk-signing scheme.

use eventstream_wire::{HeaderValue, Headers, encode_headers};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::{
    clock::{Clock, SystemClock},
    error::{Result, SignError},
};

type HmacSha256 = Hmac<Sha256>;

const ISO8601_TIMESTAMP_FMT: &str = "%Y%m%dT%H%M%SZ";

/// The caller-supplied signing identity and starting point for the chain.
///
/// Mirrors `Credentials`/`EventSigner`'s constructor arguments: there is no
/// environment or config-file lookup here, only what the caller passes in.
#[derive(Debug, Clone)]
pub struct SigningConfig {
    /// SigV4 region, e.g. `"us-east-1"`.
    pub region: String,
    /// SigV4 service signing name, e.g. `"transcribe"`.
    pub service: String,
    /// The secret access key used to derive the signing key chain.
    pub secret_access_key: String,
    /// The signature of the already-signed initial HTTP request, which seeds
    /// the chain's first `prior_signature`.
    pub initial_signature: Vec<u8>,
}

fn hmac(key: &[u8], msg: &[u8]) -> Vec<u8> {
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

fn derive_signing_key(secret: &str, date8: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date8.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

/// Signs successive frame payloads with a running SigV4 chunk-signature
/// chain, producing the `{":date", ":chunk-signature"}` header pair each
/// outer frame in the chain carries.
#[derive(Debug)]
pub struct ChunkSigner<C: Clock = SystemClock> {
    config: SigningConfig,
    prior_signature: Vec<u8>,
    clock: C,
}

impl ChunkSigner<SystemClock> {
    /// Builds a signer seeded with `config.initial_signature`, using the
    /// system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::EmptyConfigField`] if `region` or `service` is empty.
    pub fn new(config: SigningConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ChunkSigner<C> {
    /// Builds a signer with an injectable clock, for deterministic tests.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::EmptyConfigField`] if `region` or `service` is empty.
    pub fn with_clock(config: SigningConfig, clock: C) -> Result<Self> {
        if config.region.is_empty() {
            return Err(SignError::EmptyConfigField { field: "region" });
        }
        if config.service.is_empty() {
            return Err(SignError::EmptyConfigField { field: "service" });
        }
        let prior_signature = config.initial_signature.clone();
        Ok(Self { config, prior_signature, clock })
    }

    /// Signs `payload` (the encoded bytes of the inner event frame) and
    /// advances the chain, returning the `:date`/`:chunk-signature` header
    /// pair for the outer frame that wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::HeaderEncoding`] if the `:date` header cannot be
    /// encoded (only possible if the system clock produces an out-of-range
    /// timestamp).
    pub fn sign_chunk(&mut self, payload: &[u8]) -> Result<Headers> {
        let now = self.clock.now();
        let timestamp = now.format(ISO8601_TIMESTAMP_FMT).to_string();
        let date8 = &timestamp[..8];

        let mut date_header = Headers::new();
        date_header.insert(":date", HeaderValue::Timestamp(now.timestamp_millis()))?;
        let encoded_date_header = encode_headers(&date_header)?;

        let keypath = format!("{date8}/{}/{}/aws4_request", self.config.region, self.config.service);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256-PAYLOAD\n{timestamp}\n{keypath}\n{}\n{}\n{}",
            hex::encode(&self.prior_signature),
            hex::encode(Sha256::digest(&encoded_date_header)),
            hex::encode(Sha256::digest(payload)),
        );

        let signing_key =
            derive_signing_key(&self.config.secret_access_key, date8, &self.config.region, &self.config.service);
        let signature = hmac(&signing_key, string_to_sign.as_bytes());

        let mut headers = Headers::new();
        headers.insert(":date", HeaderValue::Timestamp(now.timestamp_millis()))?;
        headers.insert(":chunk-signature", HeaderValue::bytes(signature.clone())?)?;

        self.prior_signature = signature;
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;

    fn fixed_signer() -> ChunkSigner<FixedClock> {
        let config = SigningConfig {
            region: "us-east-1".to_string(),
            service: "transcribe".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY".to_string(),
            initial_signature: vec![0xAB; 32],
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        ChunkSigner::with_clock(config, FixedClock(now)).unwrap()
    }

    #[test]
    fn rejects_empty_region() {
        let config = SigningConfig {
            region: String::new(),
            service: "transcribe".to_string(),
            secret_access_key: "secret".to_string(),
            initial_signature: vec![],
        };
        let err = ChunkSigner::new(config).unwrap_err();
        assert!(matches!(err, SignError::EmptyConfigField { field: "region" }));
    }

    #[test]
    fn chain_advances_prior_signature_each_call() {
        let mut signer = fixed_signer();
        let first = signer.sign_chunk(b"payload-one").unwrap();
        let second = signer.sign_chunk(b"payload-two").unwrap();

        let HeaderValue::Bytes(first_sig) = first.get(":chunk-signature").unwrap() else {
            unreachable!("chunk-signature is always a byte-array header");
        };
        let HeaderValue::Bytes(second_sig) = second.get(":chunk-signature").unwrap() else {
            unreachable!("chunk-signature is always a byte-array header");
        };
        assert_ne!(first_sig, second_sig, "each chunk in the chain gets a distinct signature");
    }

    #[test]
    fn same_inputs_produce_deterministic_signature() {
        let mut a = fixed_signer();
        let mut b = fixed_signer();
        let sig_a = a.sign_chunk(b"same payload").unwrap();
        let sig_b = b.sign_chunk(b"same payload").unwrap();
        assert_eq!(sig_a.get(":chunk-signature"), sig_b.get(":chunk-signature"));
    }

    #[test]
    fn terminal_chunk_signs_an_empty_payload() {
        let mut signer = fixed_signer();
        let headers = signer.sign_chunk(&[]).unwrap();
        assert!(headers.get(":chunk-signature").is_some());
        assert!(headers.get(":date").is_some());
    }
}

//! Validation token codec.
//!
//! The token carries everything the server needs to check a submission:
//! the expected anti-spam answer and the identifiers of the required fields.
//! It is derived on every render, embedded in a hidden field, and read back
//! from the submission. Nothing is stored server-side.
//!
//! Wire format: the JSON array `[answer, [id, ...]]`, base64 encoded with the
//! URL-safe alphabet and no padding, so the value can sit in an HTML
//! attribute or a query string unchanged.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::json;
use thiserror::Error;

/// URL-safe engine that writes no padding and accepts either form on decode.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a submitted token could not be used.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no validation token submitted")]
    Missing,

    #[error("validation token is not valid base64")]
    Encoding(#[from] base64::DecodeError),

    #[error("validation token payload is malformed")]
    Payload(#[from] serde_json::Error),
}

/// Validation payload shared between render and submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationToken {
    /// Expected anti-spam answer; empty when the form has no challenge.
    pub expected_answer: String,

    /// Unprefixed identifiers of required fields, in form order.
    pub required_field_ids: Vec<String>,
}

impl ValidationToken {
    pub fn new(expected_answer: impl Into<String>, required_field_ids: Vec<String>) -> Self {
        Self {
            expected_answer: expected_answer.into(),
            required_field_ids,
        }
    }

    /// Whether the server has to check an anti-spam answer.
    pub fn has_challenge(&self) -> bool {
        !self.expected_answer.is_empty()
    }

    /// Well-formed but demands nothing: no challenge and no required fields.
    pub fn is_empty(&self) -> bool {
        !self.has_challenge() && self.required_field_ids.is_empty()
    }

    /// Encode for transport.
    pub fn encode(&self) -> String {
        let payload = json!([self.expected_answer, self.required_field_ids]);
        TOKEN_ENGINE.encode(payload.to_string())
    }

    /// Decode a submitted token value.
    ///
    /// A blank value counts as missing.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DecodeError::Missing);
        }

        let bytes = TOKEN_ENGINE.decode(raw)?;
        let (expected_answer, required_field_ids): (String, Vec<String>) =
            serde_json::from_slice(&bytes)?;

        Ok(Self {
            expected_answer,
            required_field_ids,
        })
    }

    /// Decode the token field of a submission, which may be absent.
    pub fn decode_field(raw: Option<&str>) -> Result<Self, DecodeError> {
        raw.map_or(Err(DecodeError::Missing), Self::decode)
    }
}

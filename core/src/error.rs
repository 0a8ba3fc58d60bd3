//! Error types for the SMS client core.
//!
//! # Design
//! Only two places return errors. `CodecError` comes from decoding request
//! bytes, which are expected to be produced by our own encoder. `ApiError`
//! comes from interpreting a gateway response. Response decoding and the
//! transport never fail; they report problems as status-500 responses.

use std::num::ParseIntError;
use std::str::Utf8Error;

use thiserror::Error;
use serde_json::Value;

/// Failures while decoding an HTTP message from bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{0}")]
    Utf8(#[from] Utf8Error),

    /// The start line did not have exactly three space-separated tokens.
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("invalid status code: {0}")]
    StatusCode(#[from] ParseIntError),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by `SmsClient::parse_send_sms`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The gateway answered with anything other than 200.
    #[error("HTTP {status}: {}", display_body(.body))]
    HttpError { status: u16, body: Option<Value> },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

fn display_body(body: &Option<Value>) -> String {
    body.as_ref().map(Value::to_string).unwrap_or_default()
}

//! Minimal HTTP/1.1 client core for an SMS gateway.
//!
//! # Overview
//! Composes, sends and parses HTTP messages directly over a TCP socket:
//! `Url::parse` resolves the target, `HttpRequest::to_bytes` writes the
//! request, `send_request` carries it, and `HttpResponse::from_bytes` turns
//! whatever comes back into a response.
//!
//! # Design
//! - Everything is synchronous; one request owns one connection.
//! - Callers always get an `HttpResponse`. Transport and decode failures are
//!   reported as status 500 with an `{"error": ...}` body, never as `Err`.
//! - Headers keep insertion order so the wire format is deterministic.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod url;

pub use client::{SendSms, SmsClient};
pub use config::ClientConfig;
pub use error::{ApiError, CodecError};
pub use http::{Headers, HttpRequest, HttpResponse};
pub use transport::{send_request, Transport, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use url::Url;

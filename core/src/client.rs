//! SMS gateway client built on the raw HTTP core.
//!
//! # Design
//! Mirrors the build/parse split used elsewhere: `build_send_sms` produces
//! an `HttpRequest` without touching the network, `parse_send_sms`
//! interprets an `HttpResponse`. `send` joins the two ends through the
//! transport for callers that do not need to intercept the request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::send_request;
use crate::url::Url;

/// Payload of `POST /send_sms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSms {
    pub sender: String,
    pub recipient: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SmsClient {
    config: ClientConfig,
}

impl SmsClient {
    pub fn new(mut config: ClientConfig) -> Self {
        config.server = config.server.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_send_sms(&self, input: &SendSms) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_value(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut request = HttpRequest::new("POST", format!("{}/send_sms", self.config.server));
        if let Some(credentials) = self.basic_auth() {
            request = request.header("Authorization", format!("Basic {credentials}"));
        }
        Ok(request
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body))
    }

    /// Build, send and log one message.
    ///
    /// Transport failures come back as status-500 responses, not `Err`.
    pub fn send(&self, input: &SendSms) -> Result<HttpResponse, ApiError> {
        let request = self.build_send_sms(input)?;
        let target = Url::parse(&self.config.server);
        let response = send_request(&request, &target.host, target.port, self.config.timeout());

        if matches!(response.status, 400 | 401 | 500) {
            warn!("Response: status={}, body={:?}", response.status, response.body);
        } else {
            info!("Response: status={}, body={:?}", response.status, response.body);
        }
        Ok(response)
    }

    /// Accept only 200; return its body, or `null` if it had none.
    pub fn parse_send_sms(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if response.status != 200 {
            return Err(ApiError::HttpError {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response.body.unwrap_or(Value::Null))
    }

    fn basic_auth(&self) -> Option<String> {
        let username = self.config.username.as_deref()?;
        let password = self.config.password.as_deref().unwrap_or("");
        Some(STANDARD.encode(format!("{username}:{password}")))
    }
}

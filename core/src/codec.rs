//! HTTP/1.1 wire codec for requests and responses.
//!
//! # Design
//! Both directions follow the same grammar: a start line, `Key: Value`
//! header lines, an empty line, then a UTF-8 JSON body. Lines are split on
//! CRLF only.
//!
//! The two decoders deliberately differ. `HttpRequest::from_bytes` expects
//! input produced by `HttpRequest::to_bytes` and returns a `CodecError` on
//! anything malformed, including a bad JSON body. `HttpResponse::from_bytes`
//! reads untrusted network input and is total: every byte sequence yields a
//! response, with failures mapped to status 500.

use serde_json::{json, Value};

use crate::error::CodecError;
use crate::http::{Headers, HttpRequest, HttpResponse};
use crate::url::Url;

const CRLF: &str = "\r\n";
const HEADER_SEPARATOR: &str = ": ";

impl HttpRequest {
    /// Serialize to wire bytes.
    ///
    /// `Host`, `Content-Length` and `Connection: close` are always set and
    /// override caller-supplied values under the same keys.
    pub fn to_bytes(&self) -> Vec<u8> {
        let target = Url::parse(&self.path);
        let body = encode_body(self.body.as_ref());

        let mut headers = self.headers.clone();
        headers.insert("Host", target.host);
        headers.insert("Content-Length", body.len().to_string());
        headers.insert("Connection", "close");

        let mut out = format!("{} {} HTTP/1.1{CRLF}", self.method, target.path);
        for (key, value) in headers.iter() {
            out.push_str(&format!("{key}{HEADER_SEPARATOR}{value}{CRLF}"));
        }
        out.push_str(CRLF);
        out.push_str(&body);
        out.into_bytes()
    }

    /// Parse wire bytes produced by `to_bytes`.
    ///
    /// The protocol version token is read but discarded.
    pub fn from_bytes(bytes: &[u8]) -> Result<HttpRequest, CodecError> {
        let data = std::str::from_utf8(bytes)?;
        let lines: Vec<&str> = data.split(CRLF).collect();

        let start: Vec<&str> = lines[0].split(' ').collect();
        let [method, path, _version] = start.as_slice() else {
            return Err(CodecError::MalformedRequestLine(lines[0].to_string()));
        };

        let (headers, body_text) = split_sections(&lines);
        let body = match body_text {
            Some(text) if !text.is_empty() => Some(serde_json::from_str::<Value>(&text)?),
            _ => None,
        };

        Ok(HttpRequest {
            method: method.to_string(),
            path: path.to_string(),
            headers,
            body,
        })
    }
}

impl HttpResponse {
    pub fn to_bytes(&self) -> Vec<u8> {
        let body = encode_body(self.body.as_ref());
        let headers = self
            .headers
            .iter()
            .map(|(key, value)| format!("{key}{HEADER_SEPARATOR}{value}"))
            .collect::<Vec<_>>()
            .join(CRLF);
        format!("HTTP/1.1 {}{CRLF}{headers}{CRLF}{CRLF}{body}", self.status).into_bytes()
    }

    /// Parse a response received from the network. Never fails.
    ///
    /// A body that is not valid JSON is kept as `{"raw_response": text}`.
    /// Undecodable input becomes status 500 with an `error` body.
    pub fn from_bytes(bytes: &[u8]) -> HttpResponse {
        decode_response(bytes).unwrap_or_else(|e| {
            HttpResponse::error(format!("Response parsing error: {e}"))
        })
    }
}

fn decode_response(bytes: &[u8]) -> Result<HttpResponse, CodecError> {
    if bytes.is_empty() {
        return Ok(HttpResponse::error("Empty response"));
    }
    let data = std::str::from_utf8(bytes)?;
    let lines: Vec<&str> = data.split(CRLF).collect();

    let status_line: Vec<&str> = lines[0].split(' ').collect();
    if status_line.len() < 2 {
        return Ok(HttpResponse::error("Invalid status line"));
    }
    let status = status_line[1].parse::<u16>()?;

    let (headers, body_text) = split_sections(&lines);
    let body = match body_text {
        Some(text) if !text.is_empty() => Some(
            serde_json::from_str::<Value>(&text).unwrap_or_else(|_| json!({ "raw_response": text })),
        ),
        _ => None,
    };

    Ok(HttpResponse::new(status, headers, body))
}

/// Split the lines after the start line into headers and the raw body.
///
/// Headers end at the first empty line, or at the end of input if there is
/// none. Header lines without `": "` are skipped. The body is `None` when no
/// line follows the empty one.
fn split_sections(lines: &[&str]) -> (Headers, Option<String>) {
    let blank = lines
        .iter()
        .position(|line| line.is_empty())
        .unwrap_or(lines.len());

    let headers = lines[blank.min(1)..blank]
        .iter()
        .filter_map(|line| line.split_once(HEADER_SEPARATOR))
        .collect();

    let body = (blank + 1 < lines.len()).then(|| lines[blank + 1..].join(CRLF));
    (headers, body)
}

fn encode_body(body: Option<&Value>) -> String {
    // `Value` serialization cannot fail; non-ASCII text is written as-is.
    body.map(Value::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn request_wire_format_is_exact() {
        let req = HttpRequest::new("POST", "http://sms.local:4010/send_sms")
            .header("Content-Type", "application/json")
            .body(json!({"message": "hi"}));
        assert_eq!(
            text(req.to_bytes()),
            "POST /send_sms HTTP/1.1\r\n\
             Content-Type: application/json\r\n\
             Host: sms.local\r\n\
             Content-Length: 16\r\n\
             Connection: close\r\n\
             \r\n\
             {\"message\":\"hi\"}"
        );
    }

    #[test]
    fn request_without_body_has_zero_length() {
        let req = HttpRequest::new("GET", "example.com");
        assert_eq!(
            text(req.to_bytes()),
            "GET / HTTP/1.1\r\nHost: example.com\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn injected_headers_override_in_place() {
        let req = HttpRequest::new("GET", "http://real.host/x")
            .header("Connection", "keep-alive")
            .header("Accept", "*/*")
            .header("Host", "fake.host");
        let wire = text(req.to_bytes());
        assert_eq!(
            wire,
            "GET /x HTTP/1.1\r\nConnection: close\r\nAccept: */*\r\nHost: real.host\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn content_length_counts_utf8_bytes() {
        let req = HttpRequest::new("POST", "/send_sms").body(json!("привет"));
        let wire = text(req.to_bytes());
        // Six Cyrillic letters at two bytes each, plus two quotes.
        assert!(wire.contains("Content-Length: 14\r\n"));
        assert!(wire.ends_with("\"привет\""));
    }

    #[test]
    fn request_round_trip() {
        let req = HttpRequest::new("POST", "/send_sms")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .header("Host", "ignored")
            .body(json!({"sender": "+79990000000", "message": "line1\r\nline2"}));
        let back = HttpRequest::from_bytes(&req.to_bytes()).unwrap();
        assert_eq!(back.method, "POST");
        assert_eq!(back.path, "/send_sms");
        assert_eq!(back.body, req.body);
        assert_eq!(back.headers.get("Authorization"), Some("Basic dXNlcjpwYXNz"));
        assert_eq!(back.headers.get("Host"), Some(""));
        assert_eq!(back.headers.get("Connection"), Some("close"));
    }

    #[test]
    fn request_line_needs_three_tokens() {
        let err = HttpRequest::from_bytes(b"GET /\r\n\r\n").unwrap_err();
        assert!(matches!(err, CodecError::MalformedRequestLine(_)));
        let err = HttpRequest::from_bytes(b"GET / HTTP/1.1 extra\r\n\r\n").unwrap_err();
        assert!(matches!(err, CodecError::MalformedRequestLine(_)));
        let err = HttpRequest::from_bytes(b"").unwrap_err();
        assert!(matches!(err, CodecError::MalformedRequestLine(_)));
    }

    #[test]
    fn request_bad_json_body_is_an_error() {
        let err = HttpRequest::from_bytes(b"POST / HTTP/1.1\r\n\r\nnot json").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn request_malformed_header_lines_are_skipped() {
        let req = HttpRequest::from_bytes(b"GET /x HTTP/1.1\r\nGood: yes\r\nBad:no\r\n\r\n").unwrap();
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.headers.get("Good"), Some("yes"));
        assert!(req.body.is_none());
    }

    #[test]
    fn request_without_blank_line_has_no_body() {
        let req = HttpRequest::from_bytes(b"DELETE /x HTTP/1.1\r\nA: 1").unwrap();
        assert_eq!(req.method, "DELETE");
        assert_eq!(req.headers.get("A"), Some("1"));
        assert!(req.body.is_none());
    }

    #[test]
    fn response_with_headers_and_json() {
        let resp = HttpResponse::from_bytes(b"HTTP/1.1 200\r\nX: 1\r\n\r\n{\"a\":1}");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.headers, [("X", "1")].into_iter().collect());
        assert_eq!(resp.body, Some(json!({"a": 1})));
    }

    #[test]
    fn response_reason_phrase_is_ignored() {
        let resp = HttpResponse::from_bytes(b"HTTP/1.1 404 Not Found\r\n\r\n");
        assert_eq!(resp.status, 404);
        assert!(resp.body.is_none());
    }

    #[test]
    fn response_garbage_is_invalid_status_line() {
        let resp = HttpResponse::from_bytes(b"garbage");
        assert_eq!(resp.status, 500);
        assert_eq!(resp.error_message(), Some("Invalid status line"));
    }

    #[test]
    fn response_empty_input() {
        let resp = HttpResponse::from_bytes(b"");
        assert_eq!(resp.status, 500);
        assert_eq!(resp.error_message(), Some("Empty response"));
    }

    #[test]
    fn response_single_newline() {
        let resp = HttpResponse::from_bytes(b"\n");
        assert_eq!(resp.status, 500);
        assert_eq!(resp.error_message(), Some("Invalid status line"));
    }

    #[test]
    fn response_non_utf8() {
        let resp = HttpResponse::from_bytes(&[0xff, 0xfe, 0x00, 0x80]);
        assert_eq!(resp.status, 500);
        let message = resp.error_message().unwrap();
        assert!(message.starts_with("Response parsing error: "), "{message}");
    }

    #[test]
    fn response_non_numeric_status() {
        let resp = HttpResponse::from_bytes(b"HTTP/1.1 OK\r\n\r\n");
        assert_eq!(resp.status, 500);
        assert!(resp
            .error_message()
            .unwrap()
            .starts_with("Response parsing error: invalid status code"));
    }

    #[test]
    fn response_invalid_json_is_kept_raw() {
        let resp = HttpResponse::from_bytes(b"HTTP/1.1 502\r\n\r\n<html>bad gateway</html>");
        assert_eq!(resp.status, 502);
        assert_eq!(resp.body, Some(json!({"raw_response": "<html>bad gateway</html>"})));
    }

    #[test]
    fn response_empty_body_is_unset() {
        let resp = HttpResponse::from_bytes(b"HTTP/1.1 204\r\nA: b\r\n\r\n");
        assert_eq!(resp.status, 204);
        assert!(resp.body.is_none());
        let resp = HttpResponse::from_bytes(b"HTTP/1.1 204\r\nA: b");
        assert!(resp.body.is_none());
    }

    #[test]
    fn response_round_trip() {
        let resp = HttpResponse::new(
            201,
            [("Content-Type", "application/json")].into_iter().collect(),
            Some(json!({"status": "sent"})),
        );
        let wire = resp.to_bytes();
        assert_eq!(
            text(wire.clone()),
            "HTTP/1.1 201\r\nContent-Type: application/json\r\n\r\n{\"status\":\"sent\"}"
        );
        assert_eq!(HttpResponse::from_bytes(&wire), resp);
    }

    #[test]
    fn response_without_headers_still_decodes_body() {
        let resp = HttpResponse::new(200, Headers::new(), Some(json!([1, 2])));
        let back = HttpResponse::from_bytes(&resp.to_bytes());
        assert_eq!(back.status, 200);
        assert_eq!(back.body, Some(json!([1, 2])));
    }
}

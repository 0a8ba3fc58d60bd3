//! Blocking, single-shot HTTP exchange over a raw TCP socket.
//!
//! # Design
//! One call opens one connection, writes the whole request, reads until the
//! peer closes, and drops the socket. The request codec always sends
//! `Connection: close`, so end-of-stream is the only framing honoured;
//! `Content-Length` and chunked encoding in the response are ignored.
//!
//! Nothing here returns an error. Timeouts, refusals and other socket
//! failures become status-500 responses, and there is no retry.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::debug;

use crate::http::{HttpRequest, HttpResponse};
use crate::url::Url;

/// Port used when the caller does not name one.
pub const DEFAULT_PORT: u16 = 4010;

/// Applied to connecting and to every read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Send `request` to `host:port` and return the decoded response.
///
/// Connect and read timeouts map to `{"error": "Connection timeout"}`, a
/// refused connection to `{"error": "Connection refused"}`, and any other
/// socket failure to `{"error": "Connection error: <message>"}`, all with
/// status 500.
pub fn send_request(request: &HttpRequest, host: &str, port: u16, timeout: Duration) -> HttpResponse {
    match exchange(request, host, port, timeout) {
        Ok(bytes) => HttpResponse::from_bytes(&bytes),
        Err(e) => connection_failure(&e),
    }
}

fn exchange(request: &HttpRequest, host: &str, port: u16, timeout: Duration) -> io::Result<Vec<u8>> {
    // Closed on drop, whichever way this function returns.
    let mut stream = connect(host, port, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let data = request.to_bytes();
    debug!(
        "Sending request to {host}:{port}\n{}",
        String::from_utf8_lossy(&data)
    );
    stream.write_all(&data)?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;
    debug!("Received response:\n{}", String::from_utf8_lossy(&response));
    Ok(response)
}

fn connect(host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{host}:{port} did not resolve to any address"),
        )
    }))
}

fn connection_failure(err: &io::Error) -> HttpResponse {
    match err.kind() {
        // A read timeout surfaces as WouldBlock on Unix and TimedOut on Windows.
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
            HttpResponse::error("Connection timeout")
        }
        io::ErrorKind::ConnectionRefused => HttpResponse::error("Connection refused"),
        _ => HttpResponse::error(format!("Connection error: {err}")),
    }
}

/// A target `host:port` plus timeout, reusable across requests.
///
/// Holds no socket; each `send` opens and closes its own connection.
#[derive(Debug, Clone)]
pub struct Transport {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Transport {
    /// Target `host` on `DEFAULT_PORT` with `DEFAULT_TIMEOUT`.
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Target the host and port of a parsed endpoint.
    pub fn for_url(url: &Url) -> Self {
        Self::new(&url.host).port(url.port)
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn send(&self, request: &HttpRequest) -> HttpResponse {
        send_request(request, &self.host, self.port, self.timeout)
    }
}

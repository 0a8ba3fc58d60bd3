//! Best-effort endpoint decomposition.
//!
//! # Design
//! `Url::parse` never fails. Malformed port numbers are logged and replaced
//! by the scheme default, so every `Url` carries a usable, non-zero port.
//!
//! IPv6 literals are not recognised: `[::1]:8080` is split on its first
//! `:` like any other host, which yields a bogus host and a default port.

use log::error;

/// Scheme that defaults to port 443.
pub const SECURE_SCHEME: &str = "https";

const SCHEME_DELIMITER: &str = "://";

/// A URL split into the parts the transport needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Url {
    /// Split `url` into protocol, host, port and path.
    ///
    /// A missing path becomes `/`. A missing or unparsable port becomes 443
    /// for `https` and 80 for everything else, including an empty protocol.
    pub fn parse(url: &str) -> Url {
        let (protocol, rest) = match url.split_once(SCHEME_DELIMITER) {
            Some((protocol, rest)) => (protocol, rest),
            None => ("", url),
        };

        let (host_port, path) = match rest.split_once('/') {
            Some((host_port, path)) => (host_port, format!("/{path}")),
            None => (rest, "/".to_string()),
        };

        let (host, port) = match host_port.split_once(':') {
            Some((host, port_text)) => (host, parse_port(port_text)),
            None => (host_port, None),
        };

        Url {
            protocol: protocol.to_string(),
            host: host.to_string(),
            port: port.unwrap_or_else(|| default_port(protocol)),
            path,
        }
    }

    pub fn is_secure(&self) -> bool {
        self.protocol == SECURE_SCHEME
    }
}

fn default_port(protocol: &str) -> u16 {
    if protocol == SECURE_SCHEME {
        443
    } else {
        80
    }
}

fn parse_port(text: &str) -> Option<u16> {
    match text.parse::<u16>() {
        Ok(0) => {
            error!("Invalid port number: 0");
            None
        }
        Ok(port) => Some(port),
        Err(e) => {
            error!("Invalid port number {text:?}: {e}");
            None
        }
    }
}

//! Backend descriptor.
//!
//! # Responsibilities
//! - Represent a single candidate backend server
//! - Parse `weight:protocol:host[:port]` tokens
//! - Form the base address used for probing and forwarding

use std::fmt;
use thiserror::Error;

/// Errors produced while parsing a backend token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Fewer than `weight:protocol:host`.
    #[error("too few fields, expected weight:protocol:host[:port]")]
    TooFewFields,

    /// More than `weight:protocol:host:port`.
    #[error("too many fields, expected weight:protocol:host[:port]")]
    TooManyFields,

    /// Protocol other than `http` or `https`.
    #[error("invalid protocol {0:?}, expected http or https")]
    InvalidProtocol(String),

    /// Weight is not a base-10 integer.
    #[error("weight {0:?} is not an integer")]
    InvalidWeight(String),

    /// Port is not an unsigned 16-bit integer.
    #[error("port {0:?} is not an unsigned 16-bit integer")]
    InvalidPort(String),
}

/// A single candidate backend server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    /// Use `https` instead of `http`.
    pub secure: bool,
    /// Host name or IP literal.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Relative selection weight.
    pub weight: i32,
}

impl Backend {
    /// Create a new backend.
    pub fn new(secure: bool, host: impl Into<String>, port: u16, weight: i32) -> Self {
        Self {
            secure,
            host: host.into(),
            port,
            weight,
        }
    }

    /// URL scheme for this backend.
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Base address, e.g. `http://10.0.0.1:8080`.
    ///
    /// Also serves as the backend's identity in the selection registry.
    pub fn address(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }

    /// Parse a `weight:protocol:host[:port]` token.
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = token.split(':').collect();

        if fields.len() < 3 {
            return Err(ParseError::TooFewFields);
        }
        if fields.len() > 4 {
            return Err(ParseError::TooManyFields);
        }

        let secure = match fields[1] {
            "http" => false,
            "https" => true,
            other => return Err(ParseError::InvalidProtocol(other.to_string())),
        };

        // `1:http://host:80` splits the scheme separator into the host field
        let host = fields[2].trim_start_matches("//");

        let weight = fields[0]
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidWeight(fields[0].to_string()))?;

        let port = match fields.get(3) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ParseError::InvalidPort(raw.to_string()))?,
            None if secure => 443,
            None => 80,
        };

        Ok(Self::new(secure, host, port, weight))
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse a batch of tokens, reporting malformed ones through `on_error`.
///
/// A malformed token never aborts the batch.
pub fn parse_many<I, S, F>(tokens: I, mut on_error: F) -> Vec<Backend>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str, ParseError),
{
    let mut backends = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        match Backend::parse(token) {
            Ok(backend) => backends.push(backend),
            Err(e) => on_error(token, e),
        }
    }
    backends
}

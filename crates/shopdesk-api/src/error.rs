use std::collections::BTreeMap;

use thiserror::Error;

/// Top-level error type for the `shopdesk-api` crate.
///
/// Covers transport failures and every rejection the back-office API can
/// report. `shopdesk-core` maps these into the store-level error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered, but flagged the request as failed.
    #[error("Server rejected request (HTTP {}): {}", .0.status, .0.message)]
    Server(ServerError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A multipart part could not be built (bad MIME type, etc.)
    #[error("Invalid multipart payload: {0}")]
    Multipart(String),
}

impl Error {
    /// The HTTP status reported by the server, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server(err) => Some(err.status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the server refused the bearer token.
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Structured failure payload: `{ error, message, data }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// HTTP status of the response carrying the error.
    pub status: u16,
    /// Human-readable message (server `message`, or the status reason).
    pub message: String,
    /// Textual `error` value when the server sends one (e.g. `"Unauthorized"`).
    pub error: Option<String>,
    /// What `data` contained.
    pub detail: ErrorDetail,
}

/// Shape of the `data` member of a failure envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Field name → validation message.
    Fields(BTreeMap<String, String>),
    /// A bare string.
    Message(String),
    #[default]
    None,
}

impl ServerError {
    /// Field-level messages, if the server sent a field map.
    pub fn fields(&self) -> Option<&BTreeMap<String, String>> {
        match &self.detail {
            ErrorDetail::Fields(map) => Some(map),
            _ => None,
        }
    }
}

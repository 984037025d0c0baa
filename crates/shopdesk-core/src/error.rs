// ── Core error types ──
//
// Failures the stores hand back to callers. Server rejections are split by
// shape (field map vs. bare message) so callers branch on the variant
// instead of sniffing payloads. The `From<shopdesk_api::Error>` impl is the
// only place transport-layer errors are interpreted.

use std::collections::BTreeMap;

use shopdesk_api::{ErrorDetail, ServerError};
use thiserror::Error;

/// Synthetic status reported for failures that never produced a response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 400;

/// Message shown for transport failures.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Something went wrong";

/// `error` text some endpoints use instead of a 403.
pub const UNAUTHENTICATED_SENTINEL: &str = "Unauthenticated";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Server rejections ────────────────────────────────────────────
    /// Validation failure with per-field messages.
    #[error("{message}")]
    FieldErrors {
        status: u16,
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// Any other failure the server reported.
    #[error("{message}")]
    GlobalError { status: u16, message: String },

    /// The bearer token was refused; the session has been cleared.
    #[error("Session expired: {message}")]
    Unauthenticated { message: String },

    // ── Client-side ──────────────────────────────────────────────────
    /// No response: connection refused, DNS, TLS, timeout.
    #[error("{message}")]
    Transport {
        message: String,
        reason: String,
        timed_out: bool,
    },

    /// A newer call of the same kind was issued; this result was dropped.
    #[error("Superseded by a newer request")]
    Superseded,

    /// Input rejected before any request was made.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// The token store could not be read or written.
    #[error("Token storage error: {message}")]
    Persistence { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The status code the error router sees.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::FieldErrors { status, .. } | Self::GlobalError { status, .. } => Some(*status),
            Self::Unauthenticated { .. } => Some(403),
            Self::Transport { .. } => Some(TRANSPORT_FAILURE_STATUS),
            _ => None,
        }
    }

    /// Per-field messages, when the server sent them.
    pub fn fields(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::FieldErrors { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Message for a single form field.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.fields()?.get(field).map(String::as_str)
    }

    /// Whether the session was invalidated by this failure.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shopdesk_api::Error> for CoreError {
    fn from(err: shopdesk_api::Error) -> Self {
        match err {
            shopdesk_api::Error::Server(server) => Self::from(server),
            shopdesk_api::Error::Transport(e) => CoreError::Transport {
                message: TRANSPORT_FAILURE_MESSAGE.into(),
                timed_out: e.is_timeout(),
                reason: e.to_string(),
            },
            shopdesk_api::Error::InvalidUrl(e) => CoreError::Transport {
                message: TRANSPORT_FAILURE_MESSAGE.into(),
                reason: format!("invalid URL: {e}"),
                timed_out: false,
            },
            shopdesk_api::Error::Tls(reason) => CoreError::Transport {
                message: TRANSPORT_FAILURE_MESSAGE.into(),
                reason,
                timed_out: false,
            },
            shopdesk_api::Error::Multipart(message) => CoreError::Validation { message },
            shopdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response: {message}"))
            }
        }
    }
}

impl From<ServerError> for CoreError {
    fn from(err: ServerError) -> Self {
        let sentinel = err.error.as_deref() == Some(UNAUTHENTICATED_SENTINEL)
            || err.message == UNAUTHENTICATED_SENTINEL;
        if err.status == 403 || sentinel {
            return CoreError::Unauthenticated {
                message: err.message,
            };
        }

        match err.detail {
            ErrorDetail::Fields(fields) if !fields.is_empty() => CoreError::FieldErrors {
                status: err.status,
                message: err.message,
                fields,
            },
            _ => CoreError::GlobalError {
                status: err.status,
                message: err.message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(status: u16, message: &str, detail: ErrorDetail) -> ServerError {
        ServerError {
            status,
            message: message.into(),
            error: None,
            detail,
        }
    }

    #[test]
    fn forbidden_is_unauthenticated() {
        let err = CoreError::from(server(403, "Forbidden", ErrorDetail::None));
        assert!(err.is_unauthenticated());
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn sentinel_text_is_unauthenticated() {
        let mut raw = server(401, "Token expired", ErrorDetail::None);
        raw.error = Some(UNAUTHENTICATED_SENTINEL.into());
        assert!(CoreError::from(raw).is_unauthenticated());
    }

    #[test]
    fn field_map_becomes_field_errors() {
        let fields = BTreeMap::from([("email".to_owned(), "taken".to_owned())]);
        let err = CoreError::from(server(422, "Invalid", ErrorDetail::Fields(fields)));
        assert_eq!(err.field_message("email"), Some("taken"));
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn bare_message_becomes_global_error() {
        let err = CoreError::from(server(
            500,
            "Server exploded",
            ErrorDetail::Message("trace".into()),
        ));
        assert!(matches!(err, CoreError::GlobalError { status: 500, .. }));
        assert_eq!(err.to_string(), "Server exploded");
    }

    #[test]
    fn transport_reports_synthetic_status() {
        let err = CoreError::from(shopdesk_api::Error::Tls("no roots".into()));
        assert_eq!(err.status(), Some(TRANSPORT_FAILURE_STATUS));
        assert_eq!(err.to_string(), TRANSPORT_FAILURE_MESSAGE);
    }
}

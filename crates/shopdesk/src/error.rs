//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use shopdesk_config::ConfigError;
use shopdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const REJECTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(shopdesk::connection_failed),
        help(
            "Could not reach the API: {reason}\n\
             Check the api_url of your profile or pass --api-url."
        )
    )]
    ConnectionFailed { message: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(shopdesk::timeout),
        help("Increase the timeout with --timeout or check the server.")
    )]
    Timeout,

    // ── Session ──────────────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(code(shopdesk::not_logged_in), help("Run: shopdesk login"))]
    NotLoggedIn,

    #[error("Session expired, run `shopdesk login`")]
    #[diagnostic(code(shopdesk::session_expired), help("Server said: {message}"))]
    SessionExpired { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(shopdesk::no_credentials),
        help(
            "Pass --email and --password, set SHOPDESK_EMAIL / SHOPDESK_PASSWORD,\n\
             or run: shopdesk config init"
        )
    )]
    NoCredentials { profile: String },

    // ── Server rejections ────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(shopdesk::invalid_fields), help("{details}"))]
    FieldErrors { message: String, details: String },

    #[error("{resource} '{identifier}' not found")]
    #[diagnostic(
        code(shopdesk::not_found),
        help("Run: shopdesk {resource}s list to see what exists")
    )]
    NotFound {
        resource: String,
        identifier: String,
    },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(shopdesk::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shopdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shopdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shopdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No API URL configured")]
    #[diagnostic(
        code(shopdesk::no_config),
        help(
            "Create a profile with: shopdesk config init\n\
             Expected at: {path}\n\
             Or pass --api-url / set SHOPDESK_API_URL."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(shopdesk::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(shopdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(shopdesk::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotLoggedIn | Self::SessionExpired { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::FieldErrors { .. } | Self::ApiError { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the resource being addressed, turning a 404 into `NotFound`.
    pub fn for_resource(self, resource: &str, identifier: &str) -> Self {
        match self {
            Self::ApiError { status: 404, .. } => Self::NotFound {
                resource: resource.into(),
                identifier: identifier.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport {
                timed_out: true, ..
            } => CliError::Timeout,

            CoreError::Transport {
                message, reason, ..
            } => CliError::ConnectionFailed { message, reason },

            CoreError::Unauthenticated { message } => CliError::SessionExpired { message },

            CoreError::FieldErrors {
                message, fields, ..
            } => CliError::FieldErrors {
                message,
                details: fields
                    .iter()
                    .map(|(field, reason)| format!("{field}: {reason}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            },

            CoreError::GlobalError { status, message } => CliError::ApiError { status, message },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Superseded => CliError::Internal("request superseded".into()),

            CoreError::Persistence { message } | CoreError::Internal(message) => {
                CliError::Internal(message)
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn forbidden_maps_to_session_expired() {
        let err = CliError::from(CoreError::Unauthenticated {
            message: "Forbidden".into(),
        });
        assert_eq!(err.to_string(), "Session expired, run `shopdesk login`");
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn field_errors_list_every_field() {
        let fields = BTreeMap::from([
            ("email".to_owned(), "taken".to_owned()),
            ("zip_code".to_owned(), "required".to_owned()),
        ]);
        let err = CliError::from(CoreError::FieldErrors {
            status: 422,
            message: "Invalid data".into(),
            fields,
        });
        let CliError::FieldErrors { details, .. } = &err else {
            panic!("expected field errors, got {err:?}");
        };
        assert_eq!(details, "email: taken\nzip_code: required");
        assert_eq!(err.exit_code(), exit_code::REJECTED);
    }

    #[test]
    fn transport_failures_keep_generic_message() {
        let err = CliError::from(CoreError::Transport {
            message: "Something went wrong".into(),
            reason: "connection refused".into(),
            timed_out: false,
        });
        assert_eq!(err.to_string(), "Something went wrong");
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn not_found_status_names_the_resource() {
        let err = CliError::from(CoreError::GlobalError {
            status: 404,
            message: "No query results".into(),
        })
        .for_resource("customer", "7");
        assert_eq!(err.to_string(), "customer '7' not found");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}

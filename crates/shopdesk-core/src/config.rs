// ── Runtime connection configuration ──
//
// Describes how to reach the back-office API. Carries no credentials and
// never touches disk; the CLI builds an `AppConfig` from its profile and
// hands it in.

use std::path::PathBuf;
use std::time::Duration;

use shopdesk_api::{TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API base, e.g. `http://localhost:8000/api`.
    pub api_url: Url,
    pub timeout: Duration,
    pub tls: TlsVerification,
}

impl AppConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: Duration::from_secs(30),
            tls: TlsVerification::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}

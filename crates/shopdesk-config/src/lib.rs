//! Configuration for the shopdesk CLI.
//!
//! TOML profiles, credential resolution (flag + env + keyring +
//! plaintext), durable token stores, and translation to
//! `shopdesk_core::AppConfig`.

mod token_store;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopdesk_core::{AppConfig, TlsVerification, TokenStore};

pub use token_store::{FileTokenStore, KeyringTokenStore};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SHOPDESK_CONFIG";
/// Overrides the directory file-backed tokens are kept in.
pub const DATA_DIR_ENV: &str = "SHOPDESK_DATA_DIR";
/// Password fallback when no flag or `password_env` is given.
pub const PASSWORD_ENV: &str = "SHOPDESK_PASSWORD";
/// Email fallback when neither flag nor profile names one.
pub const EMAIL_ENV: &str = "SHOPDESK_EMAIL";

const KEYRING_SERVICE: &str = "shopdesk";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where a profile keeps its bearer token between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    #[default]
    File,
    Keyring,
}

/// A named API profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g. "http://localhost:8000/api").
    pub api_url: String,

    /// Login email.
    pub email: Option<String>,

    /// Plaintext password. Keyring or `password_env` is preferred.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    #[serde(default)]
    pub token_store: TokenStoreKind,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            email: None,
            password: None,
            password_env: None,
            token_store: TokenStoreKind::default(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "shopdesk", "shopdesk")
}

fn home_fallback(leaf: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(leaf);
    p.push("shopdesk");
    p
}

/// Resolve the config file path: `SHOPDESK_CONFIG`, else platform dirs.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for file-backed tokens: `SHOPDESK_DATA_DIR`, else platform dirs.
pub fn data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file. Missing files fall back to defaults.
///
/// Environment keys use `__` as the nesting separator, e.g.
/// `SHOPDESK_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHOPDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if anything goes wrong.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the login password.
///
/// Order: explicit value → profile `password_env` → `SHOPDESK_PASSWORD`
/// → system keyring (`<profile>/password`) → plaintext in config.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    explicit: Option<&str>,
) -> Result<SecretString, ConfigError> {
    if let Some(pw) = explicit {
        return Ok(SecretString::from(pw.to_owned()));
    }

    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the login email: explicit value → profile → `SHOPDESK_EMAIL`.
pub fn resolve_email(
    profile: &Profile,
    profile_name: &str,
    explicit: Option<&str>,
) -> Result<String, ConfigError> {
    explicit
        .map(str::to_owned)
        .or_else(|| profile.email.clone())
        .or_else(|| std::env::var(EMAIL_ENV).ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Save a login password in the system keyring, where
/// [`resolve_password`] looks for it.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    let keyring_err = |e: keyring::Error| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    };
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(password.expose_secret()))
        .map_err(keyring_err)
}

// ── Translation to core types ───────────────────────────────────────

/// Build an `AppConfig` from a profile, with no CLI overrides.
pub fn profile_to_app_config(profile: &Profile) -> Result<AppConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(AppConfig {
        api_url,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
        tls,
    })
}

/// The durable token store a profile asks for.
pub fn token_store_for(profile: &Profile, profile_name: &str) -> Arc<dyn TokenStore> {
    match profile.token_store {
        TokenStoreKind::File => Arc::new(FileTokenStore::for_profile(profile_name)),
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new(profile_name)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "shop"

[defaults]
output = "json"

[profiles.shop]
api_url = "http://localhost:8000/api"
email = "a@b.com"
token_store = "keyring"
timeout = 5
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("shop"));
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.timeout, 30);

        let profile = &config.profiles["shop"];
        assert_eq!(profile.token_store, TokenStoreKind::Keyring);
        assert_eq!(profile.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config
            .profiles
            .insert("default".into(), Profile::new("https://shop.example.com/api"));

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["default"].api_url,
            "https://shop.example.com/api"
        );
    }

    #[test]
    fn app_config_from_profile() {
        let mut profile = Profile::new("http://localhost:8000/api");
        profile.timeout = Some(7);
        profile.insecure = Some(true);

        let app = profile_to_app_config(&profile).unwrap();
        assert_eq!(app.api_url.as_str(), "http://localhost:8000/api");
        assert_eq!(app.timeout, Duration::from_secs(7));
        assert_eq!(app.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let profile = Profile::new("not a url");
        assert!(matches!(
            profile_to_app_config(&profile),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn explicit_password_wins() {
        use secrecy::ExposeSecret;

        let mut profile = Profile::new("http://localhost/api");
        profile.password = Some("from-config".into());
        let pw = resolve_password(&profile, "default", Some("from-flag")).unwrap();
        assert_eq!(pw.expose_secret(), "from-flag");
    }

    #[test]
    fn explicit_email_wins() {
        let mut profile = Profile::new("http://localhost/api");
        profile.email = Some("profile@example.com".into());
        assert_eq!(
            resolve_email(&profile, "default", Some("flag@example.com")).unwrap(),
            "flag@example.com"
        );
        assert_eq!(
            resolve_email(&profile, "default", None).unwrap(),
            "profile@example.com"
        );
    }
}

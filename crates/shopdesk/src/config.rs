//! CLI configuration: a thin layer over `shopdesk_config`.
//!
//! Adds profile resolution that respects `GlobalOpts` flag overrides
//! (`--profile`, `--api-url`, `--timeout`).

use shopdesk_core::AppConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use shopdesk_config::{
    Config, Defaults, Profile, TokenStoreKind, config_path, load_config, load_config_or_default,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// A profile after CLI overrides, plus the runtime config derived from it.
#[derive(Debug)]
pub struct ResolvedProfile {
    pub name: String,
    pub profile: Profile,
    pub app: AppConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Load the config file and apply flag overrides to the active profile.
///
/// Without a stored profile, `--api-url` alone is enough to run.
pub fn resolve(global: &GlobalOpts) -> Result<ResolvedProfile, CliError> {
    let cfg = load_config()?;
    let name = active_profile_name(global, &cfg);

    let mut profile = match (cfg.profiles.get(&name), global.api_url.as_deref()) {
        (Some(stored), _) => stored.clone(),
        (None, Some(url)) => Profile::new(url),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(&cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(url) = &global.api_url {
        profile.api_url.clone_from(url);
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(cfg.defaults.timeout));

    let app = shopdesk_config::profile_to_app_config(&profile)?;
    Ok(ResolvedProfile { name, profile, app })
}

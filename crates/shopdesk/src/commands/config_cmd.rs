//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile, TokenStoreKind};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Mask plaintext secrets before the config is shown.
fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".into());
        }
    }
    cfg
}

fn to_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

/// Ask where the login password should live. Returns the plaintext value
/// to store in the config file, if the user chose that.
fn prompt_password_storage(profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
        "Don't store; ask at login",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    if selection == 2 {
        return Ok(None);
    }

    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    if selection == 0 {
        shopdesk_config::store_password(profile_name, &SecretString::from(password))?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = redact(config::load_config()?);
            let out = output::render_single(&global.output, &cfg, to_toml, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Set { key, value } => set(&key, value, global),

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: shopdesk config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("shopdesk configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("API URL")
        .default(
            global
                .api_url
                .clone()
                .unwrap_or_else(|| "http://localhost:8000/api".into()),
        )
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input)
                .map(|_| ())
                .map_err(|e| format!("invalid URL: {e}"))
        })
        .interact_text()
        .map_err(prompt_err)?;

    let email: String = Input::new()
        .with_prompt("Login email")
        .interact_text()
        .map_err(prompt_err)?;

    let password = prompt_password_storage(&profile_name)?;

    let token_choices = &["File in the data directory", "System keyring"];
    let token_store = match Select::new()
        .with_prompt("Where to keep the session token?")
        .items(token_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => TokenStoreKind::File,
        _ => TokenStoreKind::Keyring,
    };

    let mut cfg = config::load_config_or_default();
    let mut profile = Profile::new(api_url);
    profile.email = Some(email);
    profile.password = password;
    profile.token_store = token_store;
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());

    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Next: shopdesk login");
    Ok(())
}

// ── Set <key> <value> ───────────────────────────────────────────────

fn set(key: &str, value: String, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config()?;
    let profile_name = config::active_profile_name(global, &cfg);
    let profile = cfg
        .profiles
        .entry(profile_name.clone())
        .or_insert_with(|| Profile::new(String::new()));

    match key {
        "api_url" | "api-url" => {
            url::Url::parse(&value).map_err(|e| CliError::Validation {
                field: "api_url".into(),
                reason: e.to_string(),
            })?;
            profile.api_url = value;
        }
        "email" => profile.email = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "token_store" | "token-store" => {
            profile.token_store = match value.as_str() {
                "file" => TokenStoreKind::File,
                "keyring" => TokenStoreKind::Keyring,
                _ => {
                    return Err(CliError::Validation {
                        field: "token_store".into(),
                        reason: "must be 'file' or 'keyring'".into(),
                    });
                }
            };
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, email, \
                     password_env, token_store, ca_cert, insecure, timeout"
                ),
            });
        }
    }

    config::save_config(&cfg)?;
    eprintln!("✓ Set {key} on profile '{profile_name}'");
    Ok(())
}

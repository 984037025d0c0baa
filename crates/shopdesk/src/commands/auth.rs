//! Session commands: login, logout, status.

use std::io::IsTerminal;

use secrecy::SecretString;
use serde::Serialize;

use shopdesk_config::ConfigError;
use shopdesk_core::{AlertNotice, AppState};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{ResolvedProfile, TokenStoreKind};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Login ───────────────────────────────────────────────────────────

pub async fn login(
    state: &AppState,
    resolved: &ResolvedProfile,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email =
        shopdesk_config::resolve_email(&resolved.profile, &resolved.name, args.email.as_deref())?;
    let password = match shopdesk_config::resolve_password(
        &resolved.profile,
        &resolved.name,
        args.password.as_deref(),
    ) {
        Ok(password) => password,
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            let entered = rpassword::prompt_password("Password: ")?;
            SecretString::from(entered)
        }
        Err(e) => return Err(e.into()),
    };

    let spinner = output::spinner("Logging in...", global.quiet);
    let result = state.session().login(&email, &password).await;
    spinner.finish_and_clear();
    result?;

    output::print_notice(&AlertNotice::success(format!("Logged in as {email}")), global);
    Ok(())
}

// ── Logout ──────────────────────────────────────────────────────────

pub async fn logout(state: &AppState, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(state)?;
    let message = state.session().logout().await?;
    let notice = AlertNotice::success(message.unwrap_or_else(|| "Logged out".into()));
    output::print_notice(&notice, global);
    Ok(())
}

// ── Status ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StatusView {
    profile: String,
    api_url: String,
    email: Option<String>,
    token_store: TokenStoreKind,
    authenticated: bool,
}

fn detail(s: &StatusView) -> String {
    let store = match s.token_store {
        TokenStoreKind::File => "file",
        TokenStoreKind::Keyring => "keyring",
    };
    [
        format!("Profile:      {}", s.profile),
        format!("API URL:      {}", s.api_url),
        format!("Email:        {}", s.email.as_deref().unwrap_or("-")),
        format!("Token store:  {store}"),
        format!(
            "Session:      {}",
            if s.authenticated { "logged in" } else { "logged out" }
        ),
    ]
    .join("\n")
}

#[allow(clippy::unnecessary_wraps)]
pub fn status(
    state: &AppState,
    resolved: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let view = StatusView {
        profile: resolved.name.clone(),
        api_url: state.config().api_url.to_string(),
        email: resolved.profile.email.clone(),
        token_store: resolved.profile.token_store,
        authenticated: state.session().is_authenticated(),
    };
    let out = output::render_single(&global.output, &view, detail, |s| {
        let state = if s.authenticated { "logged-in" } else { "logged-out" };
        state.to_owned()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

//! Command dispatch: bridges CLI args -> stores -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod customers;
pub mod orders;
pub mod products;
pub mod util;

use shopdesk_core::AppState;

use crate::cli::{Command, GlobalOpts};
use crate::config::ResolvedProfile;
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    state: &AppState,
    resolved: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(state, resolved, args, global).await,
        Command::Logout => auth::logout(state, global).await,
        Command::Status => auth::status(state, resolved, global),
        Command::Customers(args) => {
            util::require_session(state)?;
            customers::handle(state, args, global).await
        }
        Command::Products(args) => {
            util::require_session(state)?;
            products::handle(state, args, global).await
        }
        Command::Orders(args) => {
            util::require_session(state)?;
            orders::handle(state, args, global).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

use tracing::{info, warn};

use crate::auth::AuthBackend;
use crate::browser::BrowserLauncher;
use crate::config::PollSettings;
use crate::error::AuthError;
use crate::poller::poll_for_token;
use crate::token_store::TokenStore;
use crate::ui;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LoginOutcome {
    AlreadyLoggedIn,
    LoggedIn,
}

/// Runs the browser login and stores the token it yields. Nothing is
/// written unless the backend hands out a token.
pub fn login(
    store: &TokenStore,
    backend: &dyn AuthBackend,
    browser: &dyn BrowserLauncher,
    settings: &PollSettings,
) -> Result<LoginOutcome, AuthError> {
    if store.is_authenticated() {
        return Ok(LoginOutcome::AlreadyLoggedIn);
    }

    println!("{}", ui::step("Starting authentication..."));
    let session = backend.start_session()?;

    let url = backend.login_url(&session);
    println!("{}", ui::step("Opening browser..."));
    println!("{}\n", ui::subtle(&url));
    if let Err(e) = browser.open(&url) {
        warn!("could not open browser: {}", e);
        println!("{}", ui::subtle("Could not open browser. Please visit the URL above."));
    }

    println!("{}", ui::step("Waiting for authentication..."));
    println!("{}\n", ui::subtle("Complete the login in your browser."));

    let token = poll_for_token(backend, &session, settings)?;
    store.persist_token(&token)?;
    info!(path = %store.path().display(), "logged in");

    Ok(LoginOutcome::LoggedIn)
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LogoutOutcome {
    NotLoggedIn,
    LoggedOut,
}

pub fn logout(store: &TokenStore) -> Result<LogoutOutcome, AuthError> {
    if !store.is_authenticated() {
        return Ok(LogoutOutcome::NotLoggedIn);
    }
    store.delete_token()?;
    Ok(LogoutOutcome::LoggedOut)
}

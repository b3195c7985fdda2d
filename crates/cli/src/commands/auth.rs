//! Session commands: login, register, logout, whoami.
//!
//! # Environment Variables
//!
//! - `JAANGKHON_PASSWORD` - Password used when `-p` is not given
//! - `JAANGKHON_SESSION_FILE` - Where the session is stored

use secrecy::SecretString;

use jaangkhon_core::Email;
use jaangkhon_storefront::services::auth::{LoginRequest, RegisterRequest};
use jaangkhon_storefront::state::AppState;
use jaangkhon_storefront::views::HeaderModel;

use super::CommandError;

/// Register form as collected from the command line.
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Log in and persist the session to the session file.
pub async fn login(
    state: &AppState,
    email: &str,
    password: SecretString,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = LoginRequest {
        email: Email::parse(email).map_err(CommandError::from)?,
        password,
    };

    let response = state.auth().login(&request).await?;
    let payload = match response.data {
        Some(payload) if response.success => payload,
        _ => return Err(CommandError::Rejected(response.message).into()),
    };

    #[allow(clippy::print_stdout)]
    {
        println!("Logged in as {} ({})", payload.user.username, payload.user.role);
    }
    Ok(())
}

/// Create an account. The user still has to log in afterwards.
pub async fn register(state: &AppState, form: RegisterForm) -> Result<(), Box<dyn std::error::Error>> {
    let request = RegisterRequest {
        username: form.username,
        email: Email::parse(&form.email).map_err(CommandError::from)?,
        password: form.password,
        first_name: form.first_name,
        last_name: form.last_name,
    };

    let response = state.auth().register(&request).await?;
    if !response.success {
        return Err(CommandError::Rejected(response.message).into());
    }

    #[allow(clippy::print_stdout)]
    {
        println!("Registered {}. Log in with `jk-cli login`.", request.username);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(state: &AppState) {
    state.auth().logout();
    println!("Logged out");
}

/// Print what the storefront header would show for the stored session.
#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) {
    match HeaderModel::from_auth(state.auth()) {
        HeaderModel::Guest { .. } => println!("Not logged in"),
        HeaderModel::Member { account_label, .. } => match state.auth().current_user() {
            Some(user) => {
                let email = user.email.as_ref().map_or("-", Email::as_str);
                println!("{account_label} <{email}> id={} role={}", user.id, user.role);
            }
            None => println!("{account_label}"),
        },
    }
}

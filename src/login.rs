//! Login form helpers: core page resolution, form label, redirect target and
//! programmatic sign-in.

use thiserror::Error;

use crate::mask::is_valid_email;
use crate::models::User;
use crate::platform::{OptionStore, PageRegistry, SessionManager, UserDirectory};
use crate::settings::{self, keys, LoginMethod};

/// Pages the extension needs to locate inside the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorePage {
    Login,
    Register,
    Password,
    Account,
    Profile,
    RegistrationConfirmation,
    LoginRedirect,
    LogoutRedirect,
}

impl CorePage {
    fn option_key(self) -> &'static str {
        match self {
            CorePage::Login => keys::LOGIN_PAGE,
            CorePage::Register => keys::REGISTRATION_PAGE,
            CorePage::Password => keys::PASSWORD_RECOVERY_PAGE,
            CorePage::Account => keys::ACCOUNT_PAGE,
            CorePage::Profile => keys::PROFILE_PAGE,
            CorePage::RegistrationConfirmation => keys::REGISTRATION_REDIRECT,
            CorePage::LoginRedirect => keys::LOGIN_REDIRECT,
            CorePage::LogoutRedirect => keys::LOGOUT_REDIRECT,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("no account matches {0}")]
    UnknownUser(String),
}

/// The configured page id for one of the extension's core pages. Options
/// store page selections as lists; only the first entry counts.
pub fn core_page_id(options: &dyn OptionStore, page: CorePage) -> Option<u64> {
    settings::option_page_ids(options, page.option_key()).into_iter().next()
}

/// The label the login form shows for its identifier field.
pub fn login_label(options: &dyn OptionStore) -> &'static str {
    match settings::login_method(options) {
        LoginMethod::Username => "Username",
        LoginMethod::Email => "Email",
        LoginMethod::UsernameEmail => "Username or email",
    }
}

/// Where to send the user after a successful login: the configured redirect
/// page when one resolves, the site home otherwise.
pub fn login_redirect_url(options: &dyn OptionStore, pages: &dyn PageRegistry) -> String {
    core_page_id(options, CorePage::LoginRedirect)
        .and_then(|id| pages.permalink(id))
        .unwrap_or_else(|| pages.home_url())
}

/// Signs a user in given an email address or a numeric user id. Callers
/// usually follow this with a redirect.
pub fn log_user_in(
    users: &dyn UserDirectory,
    session: &dyn SessionManager,
    email_or_id: &str,
) -> Result<User, LoginError> {
    let user = if is_valid_email(email_or_id) {
        users.find_by_email(email_or_id)
    } else {
        email_or_id.parse::<u64>().ok().and_then(|id| users.find_by_id(id))
    };

    let user = user.ok_or_else(|| LoginError::UnknownUser(email_or_id.to_string()))?;

    session.set_current_user(user.id, &user.login);
    session.set_auth_cookie(user.id);
    session.on_login(&user.login);
    tracing::info!("Programmatic login for user {}", user.id);

    Ok(user)
}

//! Typed accessors over the platform option store.
//!
//! The extension's settings live alongside the platform's own options; a
//! missing or malformed value always reads as absent rather than erroring,
//! matching how the settings screens treat unsaved options.

use std::collections::HashSet;

use serde_json::Value;

use crate::models::EmailTemplate;
use crate::platform::OptionStore;

pub mod keys {
    pub const LOGIN_METHOD: &str = "login_method";
    pub const LOGIN_PAGE: &str = "login_page";
    pub const REGISTRATION_PAGE: &str = "registration_page";
    pub const PASSWORD_RECOVERY_PAGE: &str = "password_recovery_page";
    pub const ACCOUNT_PAGE: &str = "account_page";
    pub const PROFILE_PAGE: &str = "profile_page";
    pub const REGISTRATION_REDIRECT: &str = "registration_redirect";
    pub const LOGIN_REDIRECT: &str = "login_redirect";
    pub const LOGOUT_REDIRECT: &str = "logout_redirect";
    pub const EXCLUDE_USERNAMES: &str = "exclude_usernames";
    pub const DISABLE_ADMIN_REGISTER_EMAIL: &str = "disable_admin_register_email";
    pub const EMAILS: &str = "emails";

    // Platform-owned options read by this extension.
    pub const USERS_CAN_REGISTER: &str = "users_can_register";
    pub const BLOGNAME: &str = "blogname";
    pub const ADMIN_EMAIL: &str = "admin_email";
}

/// How users are allowed to identify themselves on the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMethod {
    #[default]
    Username,
    Email,
    UsernameEmail,
}

impl LoginMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginMethod::Username => "username",
            LoginMethod::Email => "email",
            LoginMethod::UsernameEmail => "username_email",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "username" => Some(LoginMethod::Username),
            "email" => Some(LoginMethod::Email),
            "username_email" => Some(LoginMethod::UsernameEmail),
            _ => None,
        }
    }
}

pub fn option_string(options: &dyn OptionStore, key: &str) -> Option<String> {
    match options.get_option(key)? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

pub fn option_bool(options: &dyn OptionStore, key: &str) -> bool {
    match options.get_option(key) {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        Some(Value::String(s)) => s == "1" || s == "true",
        _ => false,
    }
}

/// Reads an option stored as a list of page ids.
pub fn option_page_ids(options: &dyn OptionStore, key: &str) -> Vec<u64> {
    match options.get_option(key) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_u64).collect(),
        Some(Value::Number(n)) => n.as_u64().into_iter().collect(),
        _ => Vec::new(),
    }
}

pub fn login_method(options: &dyn OptionStore) -> LoginMethod {
    option_string(options, keys::LOGIN_METHOD)
        .and_then(|raw| LoginMethod::parse(&raw))
        .unwrap_or_default()
}

/// Looks up a configured notification email by name, e.g.
/// `registration_confirmation`. Returns `None` when the template is not
/// configured or does not deserialize.
pub fn email_template(options: &dyn OptionStore, name: &str) -> Option<EmailTemplate> {
    let emails = options.get_option(keys::EMAILS)?;
    let template = emails.get(name)?.clone();
    serde_json::from_value(template).ok()
}

/// Parses the newline-separated `exclude_usernames` option into the set of
/// usernames registration must reject.
pub fn disabled_usernames(options: &dyn OptionStore) -> HashSet<String> {
    let Some(raw) = option_string(options, keys::EXCLUDE_USERNAMES) else {
        return HashSet::new();
    };
    raw.trim()
        .replace('\r', "")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPlatform;
    use serde_json::json;

    #[test]
    fn test_login_method_defaults_to_username() {
        let platform = MemoryPlatform::new("https://example.test");
        assert_eq!(login_method(&platform), LoginMethod::Username);
        platform.set_option(keys::LOGIN_METHOD, json!("email"));
        assert_eq!(login_method(&platform), LoginMethod::Email);
        platform.set_option(keys::LOGIN_METHOD, json!("bogus"));
        assert_eq!(login_method(&platform), LoginMethod::Username);
    }

    #[test]
    fn test_option_page_ids_accepts_list_or_scalar() {
        let platform = MemoryPlatform::new("https://example.test");
        assert!(option_page_ids(&platform, keys::LOGIN_PAGE).is_empty());
        platform.set_option(keys::LOGIN_PAGE, json!([4, 9]));
        assert_eq!(option_page_ids(&platform, keys::LOGIN_PAGE), vec![4, 9]);
        platform.set_option(keys::LOGIN_PAGE, json!(12));
        assert_eq!(option_page_ids(&platform, keys::LOGIN_PAGE), vec![12]);
    }

    #[test]
    fn test_option_bool_accepts_loose_truthy_values() {
        let platform = MemoryPlatform::new("https://example.test");
        assert!(!option_bool(&platform, keys::USERS_CAN_REGISTER));
        platform.set_option(keys::USERS_CAN_REGISTER, json!("1"));
        assert!(option_bool(&platform, keys::USERS_CAN_REGISTER));
        platform.set_option(keys::USERS_CAN_REGISTER, json!(0));
        assert!(!option_bool(&platform, keys::USERS_CAN_REGISTER));
        platform.set_option(keys::USERS_CAN_REGISTER, json!(true));
        assert!(option_bool(&platform, keys::USERS_CAN_REGISTER));
    }

    #[test]
    fn test_email_template_lookup() {
        let platform = MemoryPlatform::new("https://example.test");
        assert_eq!(email_template(&platform, "registration_confirmation"), None);
        platform.set_option(
            keys::EMAILS,
            json!({
                "registration_confirmation": {
                    "title": "Welcome!",
                    "subject": "Your new account",
                    "content": "Thanks for registering."
                }
            }),
        );
        let template = email_template(&platform, "registration_confirmation").unwrap();
        assert_eq!(template.subject, "Your new account");
        assert_eq!(email_template(&platform, "password_recovery"), None);
    }

    #[test]
    fn test_disabled_usernames_parses_newline_list() {
        let platform = MemoryPlatform::new("https://example.test");
        assert!(disabled_usernames(&platform).is_empty());
        platform.set_option(keys::EXCLUDE_USERNAMES, json!("admin\r\nroot\n\n  webmaster  \n"));
        let set = disabled_usernames(&platform);
        assert_eq!(set.len(), 3);
        assert!(set.contains("admin"));
        assert!(set.contains("root"));
        assert!(set.contains("webmaster"));
    }
}

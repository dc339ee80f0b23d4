//! Registration helpers and the confirmation email flow.

use anyhow::{bail, Context, Result};

use crate::mask::mask_email_address;
use crate::platform::{Mailer, OptionStore, UserDirectory};
use crate::settings::{self, keys};

/// Whether the host platform currently accepts self-registrations.
pub fn is_registration_enabled(options: &dyn OptionStore) -> bool {
    settings::option_bool(options, keys::USERS_CAN_REGISTER)
}

/// Sends the registration confirmation email for a freshly created account,
/// plus the new-registration notice to the site admin unless that notice is
/// disabled. When a generated password is supplied it is appended to the
/// user-facing message.
///
/// A missing `registration_confirmation` template means the notification is
/// not configured; the call is a no-op rather than an error.
pub async fn send_registration_confirmation_email<M: Mailer>(
    options: &dyn OptionStore,
    users: &dyn UserDirectory,
    mailer: &M,
    user_id: u64,
    plain_text_password: Option<&str>,
) -> Result<()> {
    let Some(template) = settings::email_template(options, "registration_confirmation") else {
        return Ok(());
    };

    let Some(user) = users.find_by_id(user_id) else {
        bail!("no account with id {} to notify", user_id);
    };

    let blogname =
        settings::option_string(options, keys::BLOGNAME).unwrap_or_else(|| "this site".to_string());

    if !settings::option_bool(options, keys::DISABLE_ADMIN_REGISTER_EMAIL) {
        if let Some(admin_email) = settings::option_string(options, keys::ADMIN_EMAIL) {
            let subject = format!("[{}] New User Registration", blogname);
            let body = format!(
                "New user registration on your site {}:\r\n\r\nUsername: {}\r\n\r\nE-mail: {}\r\n",
                blogname, user.login, user.email
            );
            mailer
                .send(&admin_email, &subject, &body, &body)
                .await
                .context("admin registration notice failed")?;
        }
    }

    let mut plain = template.content.clone();
    let mut html = format!("<h2>{}</h2><p>{}</p>", template.title, template.content);
    if let Some(password) = plain_text_password {
        plain.push_str(&format!("\r\n\r\nYour password: {}", password));
        html.push_str(&format!("<p>Your password: {}</p>", password));
    }

    mailer
        .send(&user.email, &template.subject, &html, &plain)
        .await
        .context("registration confirmation failed")?;

    let masked = mask_email_address(&user.email).unwrap_or_else(|_| "<invalid>".to_string());
    tracing::info!("Registration confirmation sent to {} (user {})", masked, user.id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryMailer, MemoryPlatform};
    use crate::models::User;
    use serde_json::json;

    fn platform_with_bob() -> MemoryPlatform {
        let platform = MemoryPlatform::new("https://example.test");
        platform.add_user(User {
            id: 7,
            login: "bob".to_string(),
            email: "bob@example.com".to_string(),
            display_name: "Bob".to_string(),
        });
        platform.set_option(keys::BLOGNAME, json!("Example Site"));
        platform.set_option(keys::ADMIN_EMAIL, json!("admin@example.com"));
        platform.set_option(
            keys::EMAILS,
            json!({
                "registration_confirmation": {
                    "title": "Welcome aboard",
                    "subject": "Your Example Site account",
                    "content": "Your account is ready."
                }
            }),
        );
        platform
    }

    #[test]
    fn test_registration_enabled_flag() {
        let platform = MemoryPlatform::new("https://example.test");
        assert!(!is_registration_enabled(&platform));
        platform.set_option(keys::USERS_CAN_REGISTER, json!("1"));
        assert!(is_registration_enabled(&platform));
    }

    #[tokio::test]
    async fn test_confirmation_sends_admin_notice_and_user_email() {
        let platform = platform_with_bob();
        let mailer = MemoryMailer::new();

        send_registration_confirmation_email(&platform, &platform, &mailer, 7, None)
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "admin@example.com");
        assert_eq!(sent[0].subject, "[Example Site] New User Registration");
        assert!(sent[0].plain.contains("Username: bob"));
        assert_eq!(sent[1].to, "bob@example.com");
        assert_eq!(sent[1].subject, "Your Example Site account");
        assert!(sent[1].html.contains("<h2>Welcome aboard</h2>"));
        assert!(!sent[1].plain.contains("Your password"));
    }

    #[tokio::test]
    async fn test_confirmation_includes_generated_password() {
        let platform = platform_with_bob();
        let mailer = MemoryMailer::new();

        send_registration_confirmation_email(&platform, &platform, &mailer, 7, Some("s3cret"))
            .await
            .unwrap();

        let sent = mailer.sent();
        assert!(sent[1].plain.contains("Your password: s3cret"));
        assert!(sent[1].html.contains("Your password: s3cret"));
    }

    #[tokio::test]
    async fn test_confirmation_respects_admin_notice_opt_out() {
        let platform = platform_with_bob();
        platform.set_option(keys::DISABLE_ADMIN_REGISTER_EMAIL, json!(true));
        let mailer = MemoryMailer::new();

        send_registration_confirmation_email(&platform, &platform, &mailer, 7, None)
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "bob@example.com");
    }

    #[tokio::test]
    async fn test_confirmation_noop_without_template() {
        let platform = platform_with_bob();
        platform.set_option(keys::EMAILS, json!({}));
        let mailer = MemoryMailer::new();

        send_registration_confirmation_email(&platform, &platform, &mailer, 7, None)
            .await
            .unwrap();

        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_confirmation_errors_for_unknown_user() {
        let platform = platform_with_bob();
        let mailer = MemoryMailer::new();

        let err = send_registration_confirmation_email(&platform, &platform, &mailer, 99, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("99"));
        assert!(mailer.sent().is_empty());
    }
}

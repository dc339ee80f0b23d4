//! Contracts for the host platform services this extension builds on.
//!
//! Persistence, page/role data, sessions and mail transport all belong to the
//! surrounding platform; each concern is cut as its own narrow trait so call
//! sites only name what they actually touch.

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::models::{Page, Role, User};

/// Keyed settings storage (the platform's options table).
pub trait OptionStore {
    fn get_option(&self, key: &str) -> Option<Value>;
    fn set_option(&self, key: &str, value: Value);
}

/// Expiring cache storage (the platform's transients).
pub trait TransientCache {
    fn get_transient(&self, key: &str) -> Option<Value>;
    fn set_transient(&self, key: &str, value: Value, ttl: Duration);
}

/// Read access to the platform's published pages.
pub trait PageRegistry {
    fn pages(&self) -> Vec<Page>;
    fn permalink(&self, page_id: u64) -> Option<String>;
    fn home_url(&self) -> String;
}

/// Read access to the platform's registered roles.
pub trait RoleRegistry {
    fn roles(&self) -> Vec<Role>;
}

/// Account lookup in the platform's user directory.
pub trait UserDirectory {
    fn find_by_id(&self, id: u64) -> Option<User>;
    fn find_by_email(&self, email: &str) -> Option<User>;
}

/// The platform's authentication session.
pub trait SessionManager {
    fn set_current_user(&self, id: u64, login: &str);
    fn set_auth_cookie(&self, id: u64);
    /// Fired after a programmatic login so platform listeners can react.
    fn on_login(&self, login: &str);
}

/// Outbound mail transport.
#[allow(async_fn_in_trait)]
pub trait Mailer {
    async fn send(&self, to: &str, subject: &str, html: &str, plain: &str) -> Result<()>;
}

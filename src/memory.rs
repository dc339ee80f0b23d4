//! In-memory platform backends.
//!
//! Used by the test suite and by hosts that wire the extension up before a
//! real platform adapter exists. All stores are interior-mutable so they can
//! be shared behind `&` like the real platform services.

use std::{
    collections::HashMap,
    sync::{Mutex, RwLock},
    time::{Duration, SystemTime},
};

use anyhow::Result;
use serde_json::Value;

use crate::models::{Page, Role, User};
use crate::platform::{
    Mailer, OptionStore, PageRegistry, RoleRegistry, SessionManager, TransientCache, UserDirectory,
};

#[derive(Debug, Default)]
struct SessionState {
    current_user: Option<(u64, String)>,
    auth_cookie_for: Option<u64>,
    login_events: Vec<String>,
}

/// A platform backed entirely by process memory.
pub struct MemoryPlatform {
    options: RwLock<HashMap<String, Value>>,
    transients: RwLock<HashMap<String, (Value, SystemTime)>>,
    pages: RwLock<Vec<Page>>,
    roles: RwLock<Vec<Role>>,
    users: RwLock<Vec<User>>,
    session: RwLock<SessionState>,
    home_url: String,
}

impl MemoryPlatform {
    pub fn new(home_url: impl Into<String>) -> Self {
        Self {
            options: RwLock::new(HashMap::new()),
            transients: RwLock::new(HashMap::new()),
            pages: RwLock::new(Vec::new()),
            roles: RwLock::new(Vec::new()),
            users: RwLock::new(Vec::new()),
            session: RwLock::new(SessionState::default()),
            home_url: home_url.into(),
        }
    }

    pub fn add_page(&self, page: Page) {
        self.pages.write().unwrap_or_else(|e| panic!("pages lock: {}", e)).push(page);
    }

    pub fn add_role(&self, role: Role) {
        self.roles.write().unwrap_or_else(|e| panic!("roles lock: {}", e)).push(role);
    }

    pub fn add_user(&self, user: User) {
        self.users.write().unwrap_or_else(|e| panic!("users lock: {}", e)).push(user);
    }

    pub fn current_user(&self) -> Option<(u64, String)> {
        self.session.read().unwrap_or_else(|e| panic!("session lock: {}", e)).current_user.clone()
    }

    pub fn auth_cookie_for(&self) -> Option<u64> {
        self.session.read().unwrap_or_else(|e| panic!("session lock: {}", e)).auth_cookie_for
    }

    pub fn login_events(&self) -> Vec<String> {
        self.session.read().unwrap_or_else(|e| panic!("session lock: {}", e)).login_events.clone()
    }
}

impl OptionStore for MemoryPlatform {
    fn get_option(&self, key: &str) -> Option<Value> {
        self.options.read().unwrap_or_else(|e| panic!("options lock: {}", e)).get(key).cloned()
    }

    fn set_option(&self, key: &str, value: Value) {
        self.options
            .write()
            .unwrap_or_else(|e| panic!("options lock: {}", e))
            .insert(key.to_string(), value);
    }
}

impl TransientCache for MemoryPlatform {
    fn get_transient(&self, key: &str) -> Option<Value> {
        let transients = self.transients.read().unwrap_or_else(|e| panic!("transients lock: {}", e));
        match transients.get(key) {
            Some((value, expires_at)) if SystemTime::now() < *expires_at => Some(value.clone()),
            _ => None,
        }
    }

    fn set_transient(&self, key: &str, value: Value, ttl: Duration) {
        self.transients
            .write()
            .unwrap_or_else(|e| panic!("transients lock: {}", e))
            .insert(key.to_string(), (value, SystemTime::now() + ttl));
    }
}

impl PageRegistry for MemoryPlatform {
    fn pages(&self) -> Vec<Page> {
        self.pages.read().unwrap_or_else(|e| panic!("pages lock: {}", e)).clone()
    }

    fn permalink(&self, page_id: u64) -> Option<String> {
        let pages = self.pages.read().unwrap_or_else(|e| panic!("pages lock: {}", e));
        pages
            .iter()
            .find(|p| p.id == page_id)
            .map(|p| format!("{}/?page_id={}", self.home_url.trim_end_matches('/'), p.id))
    }

    fn home_url(&self) -> String {
        self.home_url.clone()
    }
}

impl RoleRegistry for MemoryPlatform {
    fn roles(&self) -> Vec<Role> {
        self.roles.read().unwrap_or_else(|e| panic!("roles lock: {}", e)).clone()
    }
}

impl UserDirectory for MemoryPlatform {
    fn find_by_id(&self, id: u64) -> Option<User> {
        let users = self.users.read().unwrap_or_else(|e| panic!("users lock: {}", e));
        users.iter().find(|u| u.id == id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().unwrap_or_else(|e| panic!("users lock: {}", e));
        users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned()
    }
}

impl SessionManager for MemoryPlatform {
    fn set_current_user(&self, id: u64, login: &str) {
        let mut session = self.session.write().unwrap_or_else(|e| panic!("session lock: {}", e));
        session.current_user = Some((id, login.to_string()));
    }

    fn set_auth_cookie(&self, id: u64) {
        let mut session = self.session.write().unwrap_or_else(|e| panic!("session lock: {}", e));
        session.auth_cookie_for = Some(id);
    }

    fn on_login(&self, login: &str) {
        let mut session = self.session.write().unwrap_or_else(|e| panic!("session lock: {}", e));
        session.login_events.push(login.to_string());
    }
}

/// A delivered message captured by [`MemoryMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub plain: String,
}

/// A mailer that records instead of delivering.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap_or_else(|e| panic!("mailer lock: {}", e)).clone()
    }
}

impl Mailer for MemoryMailer {
    async fn send(&self, to: &str, subject: &str, html: &str, plain: &str) -> Result<()> {
        let mut sent = self.sent.lock().unwrap_or_else(|e| panic!("mailer lock: {}", e));
        sent.push(OutboundEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
            plain: plain.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_round_trip() {
        let platform = MemoryPlatform::new("https://example.test");
        assert_eq!(platform.get_option("login_method"), None);
        platform.set_option("login_method", json!("email"));
        assert_eq!(platform.get_option("login_method"), Some(json!("email")));
    }

    #[test]
    fn test_transient_expiry() {
        let platform = MemoryPlatform::new("https://example.test");
        platform.set_transient("k", json!(1), Duration::from_secs(60));
        assert_eq!(platform.get_transient("k"), Some(json!(1)));
        platform.set_transient("k", json!(2), Duration::ZERO);
        assert_eq!(platform.get_transient("k"), None);
    }

    #[test]
    fn test_permalink_only_for_known_pages() {
        let platform = MemoryPlatform::new("https://example.test/");
        platform.add_page(Page { id: 7, title: "Account".to_string() });
        assert_eq!(platform.permalink(7), Some("https://example.test/?page_id=7".to_string()));
        assert_eq!(platform.permalink(8), None);
    }
}

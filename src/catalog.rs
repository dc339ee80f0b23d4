//! Page and role enumeration for the settings screens.
//!
//! Enumerating every published page (or role) on each settings-screen render
//! is wasteful, so both lists are cached in the platform's transient store
//! for a day. Callers outside the settings screens get an empty list unless
//! they force the enumeration.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::SelectOption;
use crate::platform::{PageRegistry, RoleRegistry, TransientCache};
use crate::settings::LoginMethod;

pub const PAGES_TRANSIENT: &str = "member_accounts_get_pages";
pub const ROLES_TRANSIENT: &str = "member_accounts_get_roles";

pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Pulls one field out of each element of a list.
pub fn list_pluck<T, V>(list: &[T], field: impl Fn(&T) -> V) -> Vec<V> {
    list.iter().map(field).collect()
}

/// Pulls one field out of each element, keyed by another field. Later
/// elements win on key collisions.
pub fn list_pluck_by<T, K: Ord, V>(
    list: &[T],
    index: impl Fn(&T) -> K,
    field: impl Fn(&T) -> V,
) -> BTreeMap<K, V> {
    list.iter().map(|item| (index(item), field(item))).collect()
}

/// The published pages as select options, cached as a transient.
pub fn get_pages(
    registry: &dyn PageRegistry,
    cache: &dyn TransientCache,
    ttl: Duration,
    force: bool,
) -> Vec<SelectOption> {
    if !force {
        return Vec::new();
    }

    if let Some(cached) = read_cached_options(cache, PAGES_TRANSIENT) {
        return cached;
    }

    let pages = registry.pages();
    let options = list_pluck(&pages, |p| SelectOption::new(p.id.to_string(), p.title.clone()));
    write_cached_options(cache, PAGES_TRANSIENT, &options, ttl);
    options
}

/// The assignable roles as select options, cached as a transient. The
/// administrator role is never offered for self-registration.
pub fn get_roles(
    registry: &dyn RoleRegistry,
    cache: &dyn TransientCache,
    ttl: Duration,
    force: bool,
) -> Vec<SelectOption> {
    if !force {
        return Vec::new();
    }

    if let Some(cached) = read_cached_options(cache, ROLES_TRANSIENT) {
        return cached;
    }

    let roles: Vec<_> =
        registry.roles().into_iter().filter(|r| r.id != "administrator").collect();
    let options = list_pluck(&roles, |r| SelectOption::new(r.id.clone(), r.name.clone()));
    write_cached_options(cache, ROLES_TRANSIENT, &options, ttl);
    options
}

/// The available login method choices.
pub fn login_methods() -> Vec<SelectOption> {
    vec![
        SelectOption::new(LoginMethod::Username.as_str(), "Username only"),
        SelectOption::new(LoginMethod::Email.as_str(), "Email only"),
        SelectOption::new(LoginMethod::UsernameEmail.as_str(), "Username or Email"),
    ]
}

fn read_cached_options(cache: &dyn TransientCache, key: &str) -> Option<Vec<SelectOption>> {
    let value = cache.get_transient(key)?;
    serde_json::from_value(value).ok()
}

fn write_cached_options(
    cache: &dyn TransientCache,
    key: &str,
    options: &[SelectOption],
    ttl: Duration,
) {
    if options.is_empty() {
        return;
    }
    match serde_json::to_value(options) {
        Ok(value) => cache.set_transient(key, value, ttl),
        Err(e) => tracing::warn!("Failed to serialize {} cache: {:#}", key, e),
    }
}

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskError {
    #[error("not a syntactically valid email address")]
    InvalidSyntax,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Simple validation; the domain needs at least two non-empty labels
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Keeps the first and last character of a segment and stars out the middle.
///
/// Length-preserving: the result has as many characters as the input. A
/// two-character segment keeps only its first character (`ab` -> `a*`), a
/// single character is returned unchanged. Empty input returns `None`.
pub fn star_mid(segment: &str) -> Option<String> {
    let mut chars = segment.chars();
    let first = chars.next()?;
    let last = match chars.next_back() {
        Some(c) => c,
        None => return Some(first.to_string()),
    };
    let interior = chars.count();
    if interior == 0 {
        return Some(format!("{first}*"));
    }
    Some(format!("{first}{}{last}", "*".repeat(interior)))
}

/// Produces a display-safe form of an email address, e.g.
/// `alice@example.com` -> `a***e@e*****e.com`.
///
/// The local part and the domain body (everything before the final dot) are
/// star-masked independently; the top-level label is kept verbatim. Input
/// case is preserved. Addresses that do not parse as `local@domain.tld` are
/// rejected rather than partially masked.
pub fn mask_email_address(address: &str) -> Result<String, MaskError> {
    if !is_valid_email(address) {
        return Err(MaskError::InvalidSyntax);
    }

    let (local, domain) = address.split_once('@').ok_or(MaskError::InvalidSyntax)?;
    let (domain_body, tld) = domain.rsplit_once('.').ok_or(MaskError::InvalidSyntax)?;

    let masked_local = star_mid(local).ok_or(MaskError::InvalidSyntax)?;
    let masked_body = star_mid(domain_body).ok_or(MaskError::InvalidSyntax)?;

    Ok(format!("{masked_local}@{masked_body}.{tld}"))
}

/// Masks all but the first `left` and last `right` bytes of a secret for
/// log-safe display. Inputs shorter than `left + right` are fully starred.
pub fn mask_secret(s: &str, left: usize, right: usize) -> String {
    if s.len() <= left + right {
        return "*".repeat(s.len());
    }
    format!("{}{}{}", &s[..left], "*".repeat(s.len() - left - right), &s[s.len() - right..])
}

//! member-accounts: user-registration and account-management helpers for a
//! host content-management platform.
//!
//! The platform owns persistence, pages, roles, sessions and mail transport;
//! this crate wraps those services (see [`platform`]) with the registration,
//! login and settings-screen helpers the extension needs, plus the email
//! masking used for display-safe confirmation notices.

pub mod catalog;
pub mod config;
pub mod email;
pub mod login;
pub mod mask;
pub mod memory;
pub mod models;
pub mod platform;
pub mod registration;
pub mod settings;
pub mod shortcode;

pub use config::Config;
pub use mask::{is_valid_email, mask_email_address, MaskError};

//! User's own contact details, shown as a QR self-card.

use serde::{Deserialize, Serialize};

/// Name used until the user edits their profile.
pub const DEFAULT_PROFILE_NAME: &str = "Anonymous";
/// Email used until the user edits their profile.
pub const DEFAULT_PROFILE_EMAIL: &str = "you@yoursite.com";

/// Profile persisted as two key/value settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email_address: String,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email_address: email_address.into(),
        }
    }

    /// Two-line payload encoded into the self-card QR code.
    ///
    /// The same shape is accepted by `scan::parse_scan_payload`.
    pub fn qr_payload(&self) -> String {
        format!("{}\n{}", self.name, self.email_address)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_NAME, DEFAULT_PROFILE_EMAIL)
    }
}

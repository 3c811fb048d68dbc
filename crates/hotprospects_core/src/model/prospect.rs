//! Prospect domain model.
//!
//! # Responsibility
//! - Define the canonical contact record tracked by the store.
//! - Provide in-place mutation helpers used by edit and swipe actions.
//!
//! # Invariants
//! - `id` is stable and never reused for another prospect.
//! - `name` and `email_address` are free-form; no validation is applied.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one prospect.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProspectId = Uuid;

/// A contact record with name, email, and a contacted flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    /// Stable ID used for selection and equality.
    pub id: ProspectId,
    pub name: String,
    pub email_address: String,
    pub is_contacted: bool,
}

impl Prospect {
    /// Creates an uncontacted prospect with a generated stable ID.
    pub fn new(name: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, email_address)
    }

    /// Creates an uncontacted prospect with a caller-provided ID.
    ///
    /// Used by read-back paths where identity already exists in storage.
    pub fn with_id(
        id: ProspectId,
        name: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email_address: email_address.into(),
            is_contacted: false,
        }
    }

    /// Flips the contacted flag and returns the new value.
    pub fn toggle_contacted(&mut self) -> bool {
        self.is_contacted = !self.is_contacted;
        self.is_contacted
    }

    /// Applies a partial update; `None` fields are left untouched.
    pub fn apply(&mut self, update: &ProspectUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email_address) = &update.email_address {
            self.email_address = email_address.clone();
        }
        if let Some(is_contacted) = update.is_contacted {
            self.is_contacted = is_contacted;
        }
    }
}

/// Partial field update for one prospect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProspectUpdate {
    pub name: Option<String>,
    pub email_address: Option<String>,
    pub is_contacted: Option<bool>,
}

impl ProspectUpdate {
    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email_address.is_none() && self.is_contacted.is_none()
    }
}

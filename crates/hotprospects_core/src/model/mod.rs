//! Domain model for prospects and the user's own profile.
//!
//! # Responsibility
//! - Define the records shared by store, scan import and reminder flows.
//! - Keep identity rules in one place.
//!
//! # Invariants
//! - Every prospect is identified by a stable `ProspectId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod profile;
pub mod prospect;

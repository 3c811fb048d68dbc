//! Local reminder notifications.
//!
//! # Responsibility
//! - Describe one-shot reminder requests for a prospect.
//! - Gate scheduling on notification permission.
//! - Model the host notification API behind `NotificationCenter`.
//!
//! # Invariants
//! - A request is only added once permission is granted.
//! - Denials and errors are dropped after logging; nothing is retried.
//! - Every schedule call produces at most one request with a fresh id.

pub mod center;
pub mod request;
pub mod scheduler;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Apply the no-op policy for misses and malformed input.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod profile_service;
pub mod prospect_service;

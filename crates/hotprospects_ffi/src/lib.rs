//! Flutter-facing FFI surface for the HotProspects core.

pub mod api;

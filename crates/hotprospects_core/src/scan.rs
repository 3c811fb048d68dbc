//! Scan payload import.
//!
//! # Responsibility
//! - Turn decoded QR text into a candidate prospect.
//!
//! # Invariants
//! - A payload is exactly two `\n`-separated segments: name, then email.
//! - Any other shape is rejected whole; there is no partial recovery.
//! - Imported prospects always start uncontacted.

use crate::model::prospect::Prospect;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SEGMENT_SEPARATOR: char = '\n';
const EXPECTED_SEGMENTS: usize = 2;

/// Outcome reported by the host scanner view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// The scanner decoded a code into text.
    Decoded(String),
    /// The scanner failed before producing text (camera denied, etc.).
    Failed(String),
}

/// Scan import errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Payload did not split into exactly name + email.
    MalformedPayload { segments: usize },
    /// Scanner reported a failure instead of a payload.
    ScannerFailed(String),
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedPayload { segments } => write!(
                f,
                "malformed scan payload: expected {EXPECTED_SEGMENTS} lines, got {segments}"
            ),
            Self::ScannerFailed(reason) => write!(f, "scanning failed: {reason}"),
        }
    }
}

impl Error for ScanError {}

/// Parses a `"name\nemail"` payload into a new uncontacted prospect.
pub fn parse_scan_payload(raw: &str) -> Result<Prospect, ScanError> {
    let segments: Vec<&str> = raw.split(SEGMENT_SEPARATOR).collect();
    if segments.len() != EXPECTED_SEGMENTS {
        return Err(ScanError::MalformedPayload {
            segments: segments.len(),
        });
    }

    Ok(Prospect::new(segments[0], segments[1]))
}

/// Parses a scanner outcome, treating scanner failures as import errors.
pub fn import_scan_result(result: &ScanResult) -> Result<Prospect, ScanError> {
    match result {
        ScanResult::Decoded(raw) => parse_scan_payload(raw),
        ScanResult::Failed(reason) => Err(ScanError::ScannerFailed(reason.clone())),
    }
}

//! Error types for mcprobe
//!
//! Provides a unified error type for transport calls and scenario checks.
//! Server-side `ERROR` replies are ordinary response bytes, not errors.

use thiserror::Error;

/// Result type alias using ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Unified error type for mcprobe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Read timed out after receiving {received} bytes")]
    StreamTimeout { received: usize },

    // -------------------------------------------------------------------------
    // Datagram Transport Violations
    // -------------------------------------------------------------------------
    #[error("Inconsistent number of total frames: {expected} and {actual}")]
    InconsistentTotal { expected: i16, actual: i16 },

    #[error("Invalid request id: {actual}, expected {expected}")]
    RequestIdMismatch { expected: i16, actual: i16 },

    #[error("Duplicate frame for seq={0}")]
    DuplicateSequence(i16),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Timed out waiting for frames: got {received} of {expected}")]
    DatagramTimeout { received: usize, expected: i16 },

    // -------------------------------------------------------------------------
    // Assertion Failures
    // -------------------------------------------------------------------------
    #[error("Response mismatch for {request:?}: expected {expected:?}, got {actual:?}")]
    Mismatch {
        request: String,
        expected: String,
        actual: String,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProbeError {
    /// True for errors raised by comparing a response, as opposed to a
    /// transport failure that aborted the call.
    pub fn is_assertion(&self) -> bool {
        matches!(self, ProbeError::Mismatch { .. })
    }

    /// True for datagram framing violations and bounded-wait expiry.
    pub fn is_transport_violation(&self) -> bool {
        matches!(
            self,
            ProbeError::InconsistentTotal { .. }
                | ProbeError::RequestIdMismatch { .. }
                | ProbeError::DuplicateSequence(_)
                | ProbeError::MalformedFrame(_)
                | ProbeError::DatagramTimeout { .. }
        )
    }
}

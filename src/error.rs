//! Error types for cookie interchange operations.

use thiserror::Error;

/// Errors surfaced by codecs, the crypto layer, and the interchange orchestrator.
///
/// Decryption failures are deliberately collapsed into a single variant so callers
/// cannot distinguish a wrong password from tampered or truncated ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterchangeError {
    /// Missing required input or field, or an unknown format selector.
    #[error("{0}")]
    Validation(String),

    /// Text could not be parsed, or no cookie survived per-item skipping.
    #[error("invalid {format} format: {reason}")]
    Format {
        /// Format label (`json`, `header`, `netscape`, `encrypted`).
        format: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// Input looks encrypted but no password was supplied.
    #[error("this data appears to be encrypted; please provide the decryption password")]
    PasswordRequired,

    /// Authentication failed or the encrypted blob is corrupt.
    #[error("decryption failed: wrong password or corrupted data")]
    Decryption,

    /// The AEAD primitive refused to encrypt the payload.
    #[error("encryption failed")]
    Encryption,
}

impl InterchangeError {
    /// Creates a `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a `Format` error for the given format label.
    #[must_use]
    pub fn format(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Format {
            format,
            reason: reason.into(),
        }
    }

    /// Creates the zero-survivor `Format` error.
    #[must_use]
    pub fn no_valid_cookies(format: &'static str) -> Self {
        Self::format(format, "no valid cookies found")
    }
}

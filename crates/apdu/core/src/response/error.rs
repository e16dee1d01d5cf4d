//! Error types specific to APDU responses

use thiserror::Error;

use super::status::StatusWord;

/// A response whose status word is anything other than 90 00
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Status error {status}: {}", status.description())]
pub struct StatusError {
    /// Status word that caused the error
    pub status: StatusWord,
}

impl StatusError {
    /// Create a new status error
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self {
            status: StatusWord::new(sw1, sw2),
        }
    }

    /// Get the status word
    pub const fn status_word(&self) -> StatusWord {
        self.status
    }
}

/// Error for APDU response processing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// Incomplete response (less than 2 bytes)
    #[error("Incomplete response: {0} bytes, a status word needs 2")]
    Incomplete(usize),

    /// Status error
    #[error(transparent)]
    Status(#[from] StatusError),
}

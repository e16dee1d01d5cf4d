//! Error types specific to card transport

use thiserror::Error;

/// Transport error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection error
    #[error("Failed to connect to device")]
    Connection,

    /// Transmission error
    #[error("Failed to transmit data")]
    Transmission,

    /// The card left the field or was removed mid-exchange
    #[error("Card removed")]
    CardRemoved,

    /// Device error
    #[error("Device error")]
    Device,

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Driver error with the driver's own description
    #[error("Driver error: {0}")]
    Driver(String),
}

impl TransportError {
    /// Create a driver error
    pub fn driver<S: Into<String>>(message: S) -> Self {
        Self::Driver(message.into())
    }
}

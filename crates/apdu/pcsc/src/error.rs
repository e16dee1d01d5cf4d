//! Error types for PC/SC transport

use emvtap_apdu_core::TransportError;
use thiserror::Error;

/// PC/SC-specific errors
#[derive(Debug, Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::Pcsc(e) => map_pcsc_error(e),
            PcscError::NoReadersAvailable | PcscError::ReaderNotFound(_) => Self::Device,
            PcscError::NoCard(_) => Self::Connection,
        }
    }
}

/// Sort a PC/SC status code into the transport taxonomy
pub(crate) fn map_pcsc_error(error: pcsc::Error) -> TransportError {
    use pcsc::Error;

    match error {
        Error::RemovedCard | Error::ResetCard | Error::NoSmartcard => TransportError::CardRemoved,
        Error::Timeout => TransportError::Timeout,
        Error::UnpoweredCard | Error::UnresponsiveCard | Error::UnsupportedCard => {
            TransportError::Connection
        }
        Error::NoService
        | Error::ServiceStopped
        | Error::NoReadersAvailable
        | Error::ReaderUnavailable
        | Error::UnknownReader => TransportError::Device,
        other => TransportError::driver(other.to_string()),
    }
}

//! Error types for the EMV handshake

use derive_more::Display;
use emvtap_apdu_core::command::error::CommandError;
use emvtap_apdu_core::{ResponseError, StatusError, StatusWord, TransportError};

use crate::tags::Tag;

/// Result type for EMV operations
pub type Result<T> = std::result::Result<T, Error>;

/// Handshake step an error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Step {
    /// SELECT of the proximity payment system environment
    #[display("SELECT PPSE")]
    SelectPpse,
    /// SELECT of the application named by the PPSE
    #[display("SELECT application")]
    SelectApplication,
    /// GET PROCESSING OPTIONS
    #[display("GET PROCESSING OPTIONS")]
    GetProcessingOptions,
    /// READ RECORD of a single record
    #[display("READ RECORD {record} (SFI {sfi:02X})")]
    ReadRecord {
        /// Short file identifier as it appears in the AFL
        sfi: u8,
        /// Record number
        record: u8,
    },
}

/// Error type for EMV operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport failed to exchange bytes with the card
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The card answered with bytes that do not follow the protocol
    #[error("Protocol error: {0}")]
    Protocol(&'static str),

    /// The card answered with a status word other than 90 00
    #[error("Card returned status {0}: {desc}", desc = .0.description())]
    Status(StatusWord),

    /// A required tag is absent from a card response
    #[error("Tag {0} ({name}) not found", name = .0.name())]
    NotFound(Tag),

    /// Locally supplied data cannot be encoded
    #[error("Validation error: {0}")]
    Validation(&'static str),

    /// The PPSE did not name any application
    #[error("No payment application found on card")]
    NoApplication,

    /// Every record the AFL points at was read without finding a PAN
    #[error("No PAN found in application records")]
    NoPanFound,

    /// Error annotated with the handshake step that produced it
    #[error("{step}: {source}")]
    Context {
        /// Step that failed
        step: Step,
        /// Source error
        source: Box<Self>,
    },

    /// Discovery kept failing and the listener gave up
    #[error("Giving up after {attempts} consecutive discovery failures: {last}")]
    RetriesExhausted {
        /// Number of consecutive failures
        attempts: u32,
        /// The failure that ended the loop
        last: TransportError,
    },
}

impl Error {
    /// Create a new protocol error
    pub const fn protocol(message: &'static str) -> Self {
        Self::Protocol(message)
    }

    /// Create a new validation error
    pub const fn validation(message: &'static str) -> Self {
        Self::Validation(message)
    }

    /// Attach the handshake step to this error
    pub fn with_step(self, step: Step) -> Self {
        Self::Context {
            step,
            source: Box::new(self),
        }
    }

    /// The innermost error, with every step annotation removed
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// The outermost step annotation, if any
    pub const fn step(&self) -> Option<Step> {
        match self {
            Self::Context { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<StatusError> for Error {
    fn from(error: StatusError) -> Self {
        Self::Status(error.status_word())
    }
}

impl From<ResponseError> for Error {
    fn from(error: ResponseError) -> Self {
        match error {
            ResponseError::Incomplete(_) => Self::Protocol("response shorter than a status word"),
            ResponseError::Status(status) => status.into(),
        }
    }
}

impl From<CommandError> for Error {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::DataTooLong(..) => {
                Self::Validation("command data exceeds a short APDU")
            }
            CommandError::InvalidLength(_) => Self::Protocol("malformed command"),
        }
    }
}

/// Extension trait attaching handshake steps to results
pub trait ResultExt<T> {
    /// Annotate the error, if any, with the step that produced it
    fn context(self, step: Step) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, step: Step) -> Result<T> {
        self.map_err(|e| e.into().with_step(step))
    }
}

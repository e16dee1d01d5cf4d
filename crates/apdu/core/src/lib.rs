//! Core types and traits for APDU (Application Protocol Data Unit) exchanges
//!
//! This crate provides the foundational types and traits for talking to smart cards
//! with ISO/IEC 7816-4 command/response pairs.
//!
//! ## Overview
//!
//! - Building APDU commands from their header, data field and expected length
//! - Splitting raw responses into payload and status word
//! - A transport abstraction over whatever moves the bytes (PC/SC, NFC radio, mocks)
//! - A target discovery abstraction for loops that wait for cards to be presented
//!
//! Transports trace every exchange at TRACE level with hex-encoded bytes, so any
//! installed `tracing` subscriber doubles as the diagnostic byte sink.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod discovery;
pub mod response;
pub mod transport;

pub use command::{ApduCommand, Command, ExpectedLength};
pub use discovery::TargetDiscovery;
pub use response::Response;
pub use response::error::{ResponseError, StatusError};
pub use response::status::StatusWord;
pub use transport::{CardTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{Bytes, BytesMut};

    // Command related
    pub use crate::command::{ApduCommand, Command, ExpectedLength};

    // Response related
    pub use crate::response::Response;
    pub use crate::response::error::{ResponseError, StatusError};
    pub use crate::response::status::{StatusWord, common as status};

    // Transport layer
    pub use crate::discovery::TargetDiscovery;
    pub use crate::transport::{CardTransport, TransportError};
}

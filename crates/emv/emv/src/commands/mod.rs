//! EMV commands used by the handshake
//!
//! Each command implements [`ApduCommand`](emvtap_apdu_core::ApduCommand) and
//! comes with a parser for the payload of a successful answer.

pub mod get_processing_options;
pub mod read_record;
pub mod select;

pub use get_processing_options::{GetProcessingOptions, ProcessingOptions};
pub use read_record::{AccountRecord, ReadRecord};
pub use select::{ApplicationFci, DirectoryFci, Select};

/// Inter-industry class byte
pub const CLA_ISO: u8 = 0x00;
/// Proprietary class byte used by GET PROCESSING OPTIONS
pub const CLA_PROPRIETARY: u8 = 0x80;

/// SELECT instruction
pub const INS_SELECT: u8 = 0xA4;
/// GET PROCESSING OPTIONS instruction
pub const INS_GET_PROCESSING_OPTIONS: u8 = 0xA8;
/// READ RECORD instruction
pub const INS_READ_RECORD: u8 = 0xB2;

/// Le asking for as many bytes as the card has
pub const LE_ANY: u8 = 0x00;

/// DF name of the proximity payment system environment
pub const PPSE_NAME: &[u8] = b"2PAY.SYS.DDF01";

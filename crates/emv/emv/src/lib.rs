//! Contactless EMV card reading
//!
//! This crate runs the part of an EMV contactless transaction needed to learn
//! a card's application label, PAN and expiry date:
//!
//! 1. SELECT the proximity payment system environment and pick the first
//!    application it lists
//! 2. SELECT that application and collect its PDOL
//! 3. GET PROCESSING OPTIONS with terminal data laid out as the PDOL asks
//! 4. READ RECORD through the AFL until a record carries a PAN
//!
//! Bytes move through any [`CardTransport`](emvtap_apdu_core::CardTransport).
//! The [`listener`] module wraps the handshake in a discovery loop that
//! delivers [`Card`]s over a channel.
//!
//! ```no_run
//! # fn demo(transport: impl emvtap_apdu_core::CardTransport) -> emvtap::Result<()> {
//! use emvtap::{TerminalConfig, ThreadRandom, read_card};
//!
//! let card = read_card(transport, &TerminalConfig::default(), ThreadRandom)?;
//! println!("{card}");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

pub mod afl;
pub mod bcd;
pub mod commands;
mod config;
mod error;
pub mod listener;
pub mod pdol;
pub mod tags;
pub mod tlv;
mod transaction;
mod types;
mod unpredictable;

pub use config::{RetryPolicy, TerminalConfig};
pub use error::{Error, Result, ResultExt, Step};
pub use listener::Listener;
pub use tags::Tag;
pub use transaction::{State, Transaction, read_card};
pub use types::{Card, Expiry};
pub use unpredictable::{
    Fixed, MAX_UNPREDICTABLE_BOUND, ThreadRandom, UnpredictableNumberSource,
};

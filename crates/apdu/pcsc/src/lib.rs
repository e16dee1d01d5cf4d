//! PC/SC transport and card discovery
//!
//! This crate implements [`CardTransport`](emvtap_apdu_core::CardTransport)
//! and [`TargetDiscovery`](emvtap_apdu_core::TargetDiscovery) over the PC/SC
//! API, so contactless readers such as the ACR122U can drive the EMV engine.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use emvtap_apdu_core::TargetDiscovery;
//! use emvtap_transport_pcsc::{PcscConfig, PcscDeviceManager};
//!
//! let manager = PcscDeviceManager::with_config(PcscConfig::new().with_reader("ACR122"))?;
//! for reader in manager.list_readers()? {
//!     println!("{reader}");
//! }
//!
//! // Wait for a card to be tapped
//! let mut discovery = manager.discovery();
//! let cards = loop {
//!     let cards = discovery.poll_targets()?;
//!     if !cards.is_empty() {
//!         break cards;
//!     }
//! };
//! println!("Card in {}", cards[0].reader_name());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod manager;
mod reader;
mod transport;

pub use config::{PcscConfig, Protocol, ShareMode};
pub use discovery::PcscDiscovery;
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;

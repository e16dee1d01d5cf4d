//! Target discovery for card-present loops
//!
//! Discovery is the half of the hardware that the transport does not cover:
//! waiting for a card to enter the field (or be inserted) and handing out a
//! transport bound to it.

use crate::transport::{CardTransport, TransportError};

/// Something that can wait for cards and connect to them
pub trait TargetDiscovery: Send {
    /// Transport bound to a single discovered target
    ///
    /// Dropping the transport releases (deselects) the target.
    type Target: CardTransport;

    /// Wait for newly presented targets
    ///
    /// Returns every target that appeared since the previous call, which may
    /// be none when the implementation's polling window elapsed quietly.
    /// Errors are reported for the discovery machinery itself (radio, reader
    /// subsystem), not for individual targets that could not be selected.
    fn poll_targets(&mut self) -> Result<Vec<Self::Target>, TransportError>;
}

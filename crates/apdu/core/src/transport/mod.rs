//! Transport traits for APDU communication with cards
//!
//! A transport is the duplex byte exchange with one card: it sends a command and
//! returns whatever the card answered. It has no knowledge of command structure
//! or of the protocol running on top of it.

pub mod error;

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Trait for basic card transports
///
/// A transport is exclusively owned by whoever drives a card session; it is
/// never shared between concurrent exchanges.
pub trait CardTransport: Send + fmt::Debug {
    /// Send raw APDU bytes to the card and return the raw response bytes
    ///
    /// Command and response are traced at TRACE level before sending and after
    /// receiving. `timeout` is a hint for transports that support one; `None`
    /// leaves the choice to the transport.
    fn transmit_raw(
        &mut self,
        command: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Bytes, TransportError> {
        trace!(command = ?hex::encode(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command, timeout);
        match &result {
            Ok(response) => {
                trace!(response = ?hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    ///
    /// This is the method that concrete implementations should override.
    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Bytes, TransportError>;
}

impl<T: CardTransport + ?Sized> CardTransport for &mut T {
    fn transmit_raw(
        &mut self,
        command: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Bytes, TransportError> {
        (**self).transmit_raw(command, timeout)
    }

    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command, timeout)
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct MockTransport {
    /// Mock responses to return, in order
    pub(crate) responses: Vec<Result<Bytes, TransportError>>,
    /// Commands that were sent
    pub(crate) commands: Vec<Bytes>,
}

#[cfg(test)]
impl MockTransport {
    pub(crate) fn new(responses: Vec<Result<Bytes, TransportError>>) -> Self {
        Self {
            responses,
            commands: Vec::new(),
        }
    }
}

#[cfg(test)]
impl CardTransport for MockTransport {
    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        _timeout: Option<Duration>,
    ) -> Result<Bytes, TransportError> {
        self.commands.push(Bytes::copy_from_slice(command));

        if self.responses.is_empty() {
            return Err(TransportError::Transmission);
        }
        self.responses.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmit_records_commands_in_order() {
        let mut transport = MockTransport::new(vec![
            Ok(Bytes::from_static(&[0x90, 0x00])),
            Err(TransportError::CardRemoved),
        ]);

        let response = transport
            .transmit_raw(&[0x00, 0xA4, 0x04, 0x00], None)
            .unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);

        let err = transport
            .transmit_raw(&[0x00, 0xB2, 0x01, 0x0C, 0x00], None)
            .unwrap_err();
        assert_eq!(err, TransportError::CardRemoved);

        assert_eq!(
            transport.transmit_raw(&[0x00], None),
            Err(TransportError::Transmission)
        );
        assert_eq!(transport.commands.len(), 3);
        assert_eq!(transport.commands[1].as_ref(), &[0x00, 0xB2, 0x01, 0x0C, 0x00]);
    }

    #[test]
    fn test_mutable_reference_is_a_transport() {
        fn send<T: CardTransport>(mut transport: T) -> Result<Bytes, TransportError> {
            transport.transmit_raw(&[0x00, 0xA4, 0x04, 0x00], Some(Duration::from_millis(50)))
        }

        let mut transport = MockTransport::new(vec![Ok(Bytes::from_static(&[0x6A, 0x82]))]);
        assert_eq!(send(&mut transport).unwrap().as_ref(), &[0x6A, 0x82]);
        assert_eq!(transport.commands.len(), 1);
    }
}

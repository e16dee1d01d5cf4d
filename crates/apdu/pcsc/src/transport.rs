//! PC/SC transport implementation

use std::ffi::CString;
use std::fmt;
use std::time::Duration;

use emvtap_apdu_core::prelude::*;
use pcsc::{Card, Context, Disposition, MAX_BUFFER_SIZE};
use tracing::debug;

use crate::config::PcscConfig;
use crate::error::{PcscError, map_pcsc_error};

/// Transport bound to the card in one PC/SC reader
///
/// The card is released with [`Disposition::LeaveCard`] when the transport is
/// dropped.
pub struct PcscTransport {
    card: Option<Card>,
    reader_name: String,
    atr: Vec<u8>,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("atr", &hex::encode(&self.atr))
            .finish()
    }
}

impl PcscTransport {
    /// Connect to the card in `reader_name`
    pub(crate) fn connect(
        context: &Context,
        reader_name: &str,
        atr: Vec<u8>,
        config: &PcscConfig,
    ) -> Result<Self, PcscError> {
        let reader = CString::new(reader_name)
            .map_err(|_| PcscError::ReaderNotFound(reader_name.to_string()))?;

        let card = match context.connect(
            &reader,
            config.share_mode.into(),
            config.protocol.into(),
        ) {
            Ok(card) => card,
            Err(pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard) => {
                return Err(PcscError::NoCard(reader_name.to_string()));
            }
            Err(pcsc::Error::UnknownReader) => {
                return Err(PcscError::ReaderNotFound(reader_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!(reader = reader_name, atr = %hex::encode(&atr), "Connected to card");

        Ok(Self {
            card: Some(card),
            reader_name: reader_name.to_string(),
            atr,
        })
    }

    /// Get the reader name
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Get the ATR the card presented when it was discovered
    pub fn atr(&self) -> &[u8] {
        &self.atr
    }
}

impl CardTransport for PcscTransport {
    /// PC/SC has no per-exchange timeout, so `timeout` is ignored
    fn do_transmit_raw(
        &mut self,
        command: &[u8],
        _timeout: Option<Duration>,
    ) -> Result<Bytes, TransportError> {
        let card = self.card.as_mut().ok_or(TransportError::Connection)?;
        let mut response = [0u8; MAX_BUFFER_SIZE];
        card.transmit(command, &mut response)
            .map(Bytes::copy_from_slice)
            .map_err(map_pcsc_error)
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            if let Err((_, e)) = card.disconnect(Disposition::LeaveCard) {
                debug!(reader = %self.reader_name, error = %e, "Failed to release card");
            }
        }
    }
}

//! Card discovery over PC/SC reader state changes

use std::collections::HashSet;
use std::ffi::CString;

use emvtap_apdu_core::{TargetDiscovery, TransportError};
use pcsc::{Context, ReaderState, State};
use tracing::{debug, trace, warn};

use crate::config::PcscConfig;
use crate::error::{PcscError, map_pcsc_error};
use crate::reader::card_present;
use crate::transport::PcscTransport;

/// Watches readers and connects to every card that enters one
///
/// A card that is already present when discovery starts counts as newly
/// presented on the first poll. A card is reported again only after it has
/// left the reader.
#[allow(missing_debug_implementations)]
pub struct PcscDiscovery {
    context: Context,
    config: PcscConfig,
    states: Vec<ReaderState>,
    occupied: HashSet<CString>,
}

impl PcscDiscovery {
    pub(crate) fn new(context: Context, config: PcscConfig) -> Self {
        Self {
            context,
            config,
            states: vec![ReaderState::new(pcsc::PNP_NOTIFICATION(), State::UNAWARE)],
            occupied: HashSet::new(),
        }
    }

    /// Bring the watched set in line with the attached readers
    fn refresh_readers(&mut self) -> Result<(), PcscError> {
        let readers = match self.context.list_readers_owned() {
            Ok(readers) => readers,
            Err(pcsc::Error::NoReadersAvailable) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let readers: Vec<CString> = readers
            .into_iter()
            .filter(|name| self.config.accepts_reader(&name.to_string_lossy()))
            .collect();

        let pnp = pcsc::PNP_NOTIFICATION();
        self.states.retain(|state| {
            state.name() == pnp || readers.iter().any(|r| r.as_c_str() == state.name())
        });
        self.occupied.retain(|name| readers.contains(name));

        for reader in readers {
            if !self.states.iter().any(|state| state.name() == reader.as_c_str()) {
                debug!(reader = %reader.to_string_lossy(), "Watching reader");
                self.states.push(ReaderState::new(reader, State::UNAWARE));
            }
        }
        Ok(())
    }
}

impl TargetDiscovery for PcscDiscovery {
    type Target = PcscTransport;

    fn poll_targets(&mut self) -> Result<Vec<PcscTransport>, TransportError> {
        self.refresh_readers()?;
        for state in &mut self.states {
            state.sync_current_state();
        }

        match self
            .context
            .get_status_change(Some(self.config.poll_timeout()), &mut self.states)
        {
            Ok(()) => {}
            Err(pcsc::Error::Timeout) => return Ok(Vec::new()),
            Err(e) => return Err(map_pcsc_error(e)),
        }

        let pnp = pcsc::PNP_NOTIFICATION();
        let mut targets = Vec::new();
        for state in self.states.iter().filter(|state| state.name() != pnp) {
            let name = state.name().to_owned();
            if !card_present(state.event_state()) {
                if self.occupied.remove(&name) {
                    trace!(reader = %name.to_string_lossy(), "Card left reader");
                }
                continue;
            }
            if !self.occupied.insert(name) {
                continue;
            }

            let reader_name = state.name().to_string_lossy();
            match PcscTransport::connect(
                &self.context,
                &reader_name,
                state.atr().to_vec(),
                &self.config,
            ) {
                Ok(transport) => targets.push(transport),
                Err(e) => warn!(reader = %reader_name, error = %e, "Failed to connect to card"),
            }
        }
        Ok(targets)
    }
}

//! Device manager for PC/SC operations

use pcsc::{Context, ReaderState, Scope, State};
use tracing::debug;

use crate::config::PcscConfig;
use crate::discovery::PcscDiscovery;
use crate::error::PcscError;
use crate::reader::PcscReader;
use crate::transport::PcscTransport;

/// Entry point to the PC/SC subsystem
#[allow(missing_debug_implementations)]
pub struct PcscDeviceManager {
    context: Context,
    config: PcscConfig,
}

impl PcscDeviceManager {
    /// Establish a PC/SC context with the default configuration
    pub fn new() -> Result<Self, PcscError> {
        Self::with_config(PcscConfig::default())
    }

    /// Establish a PC/SC context
    pub fn with_config(config: PcscConfig) -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context, config })
    }

    /// Configuration used for connections and discovery
    pub const fn config(&self) -> &PcscConfig {
        &self.config
    }

    /// List the readers that pass the reader filter, with card presence
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let readers = match self.context.list_readers_owned() {
            Ok(readers) => readers,
            Err(pcsc::Error::NoReadersAvailable) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let mut states: Vec<ReaderState> = readers
            .into_iter()
            .filter(|name| self.config.accepts_reader(&name.to_string_lossy()))
            .map(|name| ReaderState::new(name, State::UNAWARE))
            .collect();
        if states.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        // UNAWARE makes this return immediately with the current states
        self.context.get_status_change(None, &mut states)?;

        Ok(states.iter().map(PcscReader::from_reader_state).collect())
    }

    /// Connect to the card in a specific reader
    pub fn open_reader(&self, reader_name: &str) -> Result<PcscTransport, PcscError> {
        let reader = self
            .list_readers()?
            .into_iter()
            .find(|reader| reader.name() == reader_name)
            .ok_or_else(|| PcscError::ReaderNotFound(reader_name.to_string()))?;

        let Some(atr) = reader.atr() else {
            return Err(PcscError::NoCard(reader_name.to_string()));
        };
        debug!(reader = reader_name, "Opening reader");
        PcscTransport::connect(&self.context, reader_name, atr.to_vec(), &self.config)
    }

    /// Start watching the filtered readers for presented cards
    pub fn discovery(&self) -> PcscDiscovery {
        PcscDiscovery::new(self.context.clone(), self.config.clone())
    }
}

//! The contactless handshake
//!
//! A [`Transaction`] drives one card from PPSE selection to the first record
//! carrying a PAN. Every command waits for its answer before the next is
//! sent, and nothing survives the transaction apart from the transport.

use bytes::Bytes;
use emvtap_apdu_core::{ApduCommand, CardTransport, Response};
use tracing::{debug, instrument, trace};

use crate::afl::AflEntry;
use crate::commands::{
    AccountRecord, ApplicationFci, DirectoryFci, GetProcessingOptions, ProcessingOptions,
    ReadRecord, Select,
};
use crate::config::TerminalConfig;
use crate::error::{Error, Result, ResultExt, Step};
use crate::pdol::PdolEntry;
use crate::types::Card;
use crate::unpredictable::UnpredictableNumberSource;

/// Progress of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing sent yet
    Init,
    /// PPSE selected and an application found
    AppListSelected,
    /// Payment application selected
    AppSelected,
    /// GET PROCESSING OPTIONS answered with an AFL
    ProcessingOptionsObtained,
    /// Reading the records listed in the AFL
    ScanningRecords,
    /// A card was read
    Succeeded,
    /// The handshake stopped on an error
    Failed,
}

/// One handshake with one card
#[derive(Debug)]
pub struct Transaction<'a, T, U> {
    transport: T,
    config: &'a TerminalConfig,
    unpredictable: U,
    state: State,
}

impl<'a, T, U> Transaction<'a, T, U>
where
    T: CardTransport,
    U: UnpredictableNumberSource,
{
    /// Prepare a handshake over `transport`
    pub const fn new(transport: T, config: &'a TerminalConfig, unpredictable: U) -> Self {
        Self {
            transport,
            config,
            unpredictable,
            state: State::Init,
        }
    }

    /// Current state
    pub const fn state(&self) -> State {
        self.state
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Run the handshake to completion or to its first error
    #[instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> Result<Card> {
        let result = self.handshake();
        self.state = match &result {
            Ok(_) => State::Succeeded,
            Err(e) => {
                debug!(error = %e, "Handshake failed");
                State::Failed
            }
        };
        result
    }

    fn handshake(&mut self) -> Result<Card> {
        let directory = self.select_ppse().context(Step::SelectPpse)?;
        self.state = State::AppListSelected;

        let application = self
            .select_application(directory.application_id)
            .context(Step::SelectApplication)?;
        self.state = State::AppSelected;

        let options = self
            .get_processing_options(application.pdol.as_deref())
            .context(Step::GetProcessingOptions)?;
        self.state = State::ProcessingOptionsObtained;

        let account = self.scan_records(&options.afl)?;

        Ok(Card::new(application.label_lossy(), &account))
    }

    fn select_ppse(&mut self) -> Result<DirectoryFci> {
        let fci = self.exchange(&Select::ppse())?;
        let directory = DirectoryFci::try_from(fci.as_ref())?;
        debug!(aid = %hex::encode(&directory.application_id), "Found payment application");
        Ok(directory)
    }

    fn select_application(&mut self, aid: Bytes) -> Result<ApplicationFci> {
        let fci = self.exchange(&Select::by_name(aid))?;
        let application = ApplicationFci::try_from(fci.as_ref())?;
        debug!(
            label = %application.label_lossy(),
            pdol_entries = application.pdol.as_ref().map_or(0, Vec::len),
            "Selected application"
        );
        Ok(application)
    }

    fn get_processing_options(&mut self, pdol: Option<&[PdolEntry]>) -> Result<ProcessingOptions> {
        let command = GetProcessingOptions::for_pdol(pdol, self.config, &mut self.unpredictable)?;
        let payload = self.exchange(&command)?;
        let options = ProcessingOptions::try_from(payload.as_ref())?;
        debug!(afl_entries = options.afl.len(), "Obtained processing options");
        Ok(options)
    }

    fn scan_records(&mut self, afl: &[AflEntry]) -> Result<AccountRecord> {
        self.state = State::ScanningRecords;

        for entry in afl {
            for record in entry.records() {
                let step = Step::ReadRecord {
                    sfi: entry.sfi,
                    record,
                };
                let payload = self
                    .exchange(&ReadRecord::new(record, entry.sfi))
                    .context(step)?;

                match AccountRecord::parse(&payload).context(step)? {
                    Some(account) => {
                        debug!(sfi = entry.sfi, record, "Found PAN");
                        return Ok(account);
                    }
                    None => trace!(sfi = entry.sfi, record, "No PAN in record"),
                }
            }
        }

        Err(Error::NoPanFound)
    }

    /// Send one command and return the payload of a 90 00 answer
    fn exchange(&mut self, command: &impl ApduCommand) -> Result<Bytes> {
        let raw = self
            .transport
            .transmit_raw(&command.try_to_bytes()?, self.config.exchange_timeout())?;
        let response = Response::from_bytes(&raw)?;

        if !response.is_success() {
            debug!(
                ins = format_args!("{:#04x}", command.instruction()),
                status = %response.status(),
                description = response.status().description(),
                "Card refused command"
            );
        }

        Ok(response.into_payload()?)
    }
}

/// Run one handshake and return the card it read
pub fn read_card<T, U>(transport: T, config: &TerminalConfig, unpredictable: U) -> Result<Card>
where
    T: CardTransport,
    U: UnpredictableNumberSource,
{
    Transaction::new(transport, config, unpredictable).run()
}

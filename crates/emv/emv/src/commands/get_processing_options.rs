//! GET PROCESSING OPTIONS

use bytes::Bytes;
use emvtap_apdu_core::{ApduCommand, ExpectedLength};

use super::{CLA_PROPRIETARY, INS_GET_PROCESSING_OPTIONS, LE_ANY};
use crate::afl::{self, AflEntry};
use crate::config::TerminalConfig;
use crate::error::{Error, Result};
use crate::pdol::{self, PdolEntry};
use crate::tags;
use crate::tlv;
use crate::unpredictable::UnpredictableNumberSource;

/// GET PROCESSING OPTIONS command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetProcessingOptions {
    /// Command template (83) wrapping the terminal data
    data: Bytes,
}

impl GetProcessingOptions {
    /// Wrap already assembled terminal data in a command template
    pub fn with_terminal_data(data: &[u8]) -> Self {
        Self {
            data: tlv::encode(tags::COMMAND_TEMPLATE, data),
        }
    }

    /// Build the command answering `pdol`
    ///
    /// Without a PDOL the command carries an empty command template.
    pub fn for_pdol(
        pdol: Option<&[PdolEntry]>,
        config: &TerminalConfig,
        unpredictable: &mut impl UnpredictableNumberSource,
    ) -> Result<Self> {
        let data = match pdol {
            Some(entries) => pdol::fill(entries, config, unpredictable)?,
            None => Vec::new(),
        };
        Ok(Self::with_terminal_data(&data))
    }

    /// The command template sent as command data
    pub const fn template(&self) -> &Bytes {
        &self.data
    }
}

impl ApduCommand for GetProcessingOptions {
    fn class(&self) -> u8 {
        CLA_PROPRIETARY
    }

    fn instruction(&self) -> u8 {
        INS_GET_PROCESSING_OPTIONS
    }

    fn p1(&self) -> u8 {
        0x00
    }

    fn p2(&self) -> u8 {
        0x00
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.data[..])
    }

    fn expected_length(&self) -> Option<ExpectedLength> {
        Some(LE_ANY)
    }
}

/// Answer to GET PROCESSING OPTIONS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Application interchange profile, when the card sent one
    pub aip: Option<[u8; 2]>,
    /// Files and records the terminal should read
    pub afl: Vec<AflEntry>,
}

impl TryFrom<&[u8]> for ProcessingOptions {
    type Error = Error;

    fn try_from(payload: &[u8]) -> Result<Self> {
        // Format 1 is a bare 80 record: AIP followed by the AFL
        let records = tlv::decode_all(payload)?;
        if let Some(record) = records
            .iter()
            .find(|record| record.tag == tags::RESPONSE_FORMAT_1)
        {
            let [b0, b1, rest @ ..] = record.value else {
                return Err(Error::protocol("format 1 answer shorter than the AIP"));
            };
            return Ok(Self {
                aip: Some([*b0, *b1]),
                afl: afl::parse(rest)?,
            });
        }

        let afl = tlv::find(tags::AFL, payload)?;
        let aip = match tlv::find(tags::AIP, payload) {
            Ok(record) => match record.value {
                [b0, b1] => Some([*b0, *b1]),
                _ => None,
            },
            Err(Error::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            aip,
            afl: afl::parse(afl.value)?,
        })
    }
}

//! SELECT by DF name

use bytes::Bytes;
use emvtap_apdu_core::{ApduCommand, ExpectedLength};

use super::{CLA_ISO, INS_SELECT, LE_ANY, PPSE_NAME};
use crate::error::{Error, Result};
use crate::pdol::{self, PdolEntry};
use crate::tags;
use crate::tlv;

/// SELECT command addressing a file by its DF name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    name: Bytes,
}

impl Select {
    /// Select by name (AID or directory name)
    pub fn by_name(name: impl Into<Bytes>) -> Self {
        Self { name: name.into() }
    }

    /// Select the proximity payment system environment
    pub fn ppse() -> Self {
        Self::by_name(Bytes::from_static(PPSE_NAME))
    }

    /// The DF name being selected
    pub const fn name(&self) -> &Bytes {
        &self.name
    }
}

impl ApduCommand for Select {
    fn class(&self) -> u8 {
        CLA_ISO
    }

    fn instruction(&self) -> u8 {
        INS_SELECT
    }

    fn p1(&self) -> u8 {
        0x04
    }

    fn p2(&self) -> u8 {
        0x00
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.name[..])
    }

    fn expected_length(&self) -> Option<ExpectedLength> {
        Some(LE_ANY)
    }
}

/// Answer to SELECT PPSE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFci {
    /// Identifier of the first application listed
    pub application_id: Bytes,
}

impl TryFrom<&[u8]> for DirectoryFci {
    type Error = Error;

    fn try_from(fci: &[u8]) -> Result<Self> {
        let aid = match tlv::find(tags::APPLICATION_ID, fci) {
            Ok(record) => record.value,
            Err(Error::NotFound(_)) => return Err(Error::NoApplication),
            Err(e) => return Err(e),
        };

        Ok(Self {
            application_id: Bytes::copy_from_slice(aid),
        })
    }
}

/// Answer to SELECT of a payment application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFci {
    /// Application label as sent by the card
    pub label: Bytes,
    /// Data the card wants with GET PROCESSING OPTIONS, if it asked for any
    pub pdol: Option<Vec<PdolEntry>>,
}

impl ApplicationFci {
    /// Application label decoded as text, replacing invalid bytes
    pub fn label_lossy(&self) -> String {
        String::from_utf8_lossy(&self.label).into_owned()
    }
}

impl TryFrom<&[u8]> for ApplicationFci {
    type Error = Error;

    fn try_from(fci: &[u8]) -> Result<Self> {
        let label = tlv::find(tags::APPLICATION_LABEL, fci)?;

        let pdol = match tlv::find(tags::PDOL, fci) {
            Ok(record) => Some(pdol::parse(record.value)?),
            Err(Error::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            label: Bytes::copy_from_slice(label.value),
            pdol,
        })
    }
}

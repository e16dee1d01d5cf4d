//! READ RECORD

use bytes::Bytes;
use emvtap_apdu_core::{ApduCommand, ExpectedLength};

use super::{CLA_ISO, INS_READ_RECORD, LE_ANY};
use crate::error::{Error, Result};
use crate::tags;
use crate::tlv;
use crate::types::Expiry;

/// READ RECORD of one record in a short file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRecord {
    record: u8,
    sfi: u8,
}

impl ReadRecord {
    /// Read `record` from the file whose P2-form SFI is `sfi`
    pub const fn new(record: u8, sfi: u8) -> Self {
        Self { record, sfi }
    }
}

impl ApduCommand for ReadRecord {
    fn class(&self) -> u8 {
        CLA_ISO
    }

    fn instruction(&self) -> u8 {
        INS_READ_RECORD
    }

    fn p1(&self) -> u8 {
        self.record
    }

    fn p2(&self) -> u8 {
        self.sfi
    }

    fn data(&self) -> Option<&[u8]> {
        None
    }

    fn expected_length(&self) -> Option<ExpectedLength> {
        Some(LE_ANY)
    }
}

/// Account data found in a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Raw PAN bytes
    pub pan: Bytes,
    /// Decoded expiry date
    pub expiry: Expiry,
}

impl AccountRecord {
    /// Extract the PAN and expiry date from a record
    ///
    /// Records without a PAN yield `None`. A PAN without an expiry date is an
    /// error.
    pub fn parse(record: &[u8]) -> Result<Option<Self>> {
        let pan = match tlv::find(tags::PAN, record) {
            Ok(pan) => pan,
            Err(Error::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let expiry = tlv::find(tags::EXPIRATION_DATE, record)?;

        Ok(Some(Self {
            pan: Bytes::copy_from_slice(pan.value),
            expiry: Expiry::from_bcd(expiry.value)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_record_bytes() {
        assert_eq!(hex::encode(ReadRecord::new(2, 0x0C).to_bytes()), "00b2020c00");
    }

    #[test]
    fn test_account_record() {
        let record = hex::decode("70145a0847617390010100105f24032312315f340101").unwrap();
        let account = AccountRecord::parse(&record).unwrap().unwrap();

        assert_eq!(hex::encode(&account.pan), "4761739001010010");
        assert_eq!(account.expiry, Expiry { year: 23, month: 12 });
    }

    #[test]
    fn test_record_without_pan() {
        let record = hex::decode("70095f24032312315f2000").unwrap();
        assert_eq!(AccountRecord::parse(&record).unwrap(), None);
    }

    #[test]
    fn test_pan_without_expiry() {
        let record = hex::decode("700a5a084761739001010010").unwrap();
        assert!(matches!(
            AccountRecord::parse(&record),
            Err(Error::NotFound(tag)) if tag == tags::EXPIRATION_DATE
        ));
    }
}

//! Application file locator

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Size of one AFL entry in bytes
pub const ENTRY_LEN: usize = 4;

/// One file and the range of its records the terminal should read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AflEntry {
    /// Short file identifier shifted into READ RECORD P2 form
    pub sfi: u8,
    /// First record to read
    pub first_record: u8,
    /// Last record to read
    pub last_record: u8,
    /// Number of records used for offline data authentication
    pub offline_auth_records: u8,
}

impl AflEntry {
    /// Decode a single four byte entry
    pub const fn from_bytes(bytes: [u8; ENTRY_LEN]) -> Self {
        Self {
            sfi: (bytes[0] & 0xF8) | 0x04,
            first_record: bytes[1],
            last_record: bytes[2],
            offline_auth_records: bytes[3],
        }
    }

    /// Record numbers covered by this entry; empty when first exceeds last
    pub const fn records(&self) -> RangeInclusive<u8> {
        self.first_record..=self.last_record
    }
}

/// Parse the value of an AFL (94) record
pub fn parse(buf: &[u8]) -> Result<Vec<AflEntry>> {
    if buf.len() % ENTRY_LEN != 0 {
        return Err(Error::validation("AFL length is not a multiple of 4"));
    }

    Ok(buf
        .chunks_exact(ENTRY_LEN)
        .map(|entry| AflEntry::from_bytes([entry[0], entry[1], entry[2], entry[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let entries = parse(&hex::decode("0801010010010300").unwrap()).unwrap();
        assert_eq!(
            entries,
            [
                AflEntry {
                    sfi: 0x0C,
                    first_record: 1,
                    last_record: 1,
                    offline_auth_records: 0,
                },
                AflEntry {
                    sfi: 0x14,
                    first_record: 1,
                    last_record: 3,
                    offline_auth_records: 0,
                },
            ]
        );
        assert_eq!(entries[1].records().count(), 3);
    }

    #[test]
    fn test_sfi_normalisation() {
        assert_eq!(AflEntry::from_bytes([0x0B, 1, 1, 0]).sfi, 0x0C);
        assert_eq!(AflEntry::from_bytes([0xFF, 1, 1, 0]).sfi, 0xFC);
    }

    #[test]
    fn test_parse_rejects_partial_entries() {
        for len in [1, 2, 3, 5, 7, 9] {
            let buf = vec![0x08; len];
            assert!(
                matches!(parse(&buf), Err(Error::Validation(_))),
                "length {len}"
            );
        }
        assert!(parse(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert_eq!(AflEntry::from_bytes([0x08, 3, 1, 0]).records().count(), 0);
    }
}

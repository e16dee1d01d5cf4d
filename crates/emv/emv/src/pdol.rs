//! Processing options data object list
//!
//! A PDOL is a list of tag and length pairs without values. The terminal
//! answers it with the concatenation of its own values for those tags, each
//! exactly as long as requested and in the order listed.

use emvtap_apdu_core::command::MAX_SHORT_DATA_LEN;
use tracing::trace;

use crate::bcd;
use crate::config::TerminalConfig;
use crate::error::{Error, Result};
use crate::tags::{self, Tag};
use crate::tlv;
use crate::unpredictable::{MAX_UNPREDICTABLE_BOUND, UnpredictableNumberSource};

/// One requested data object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdolEntry {
    /// Tag the card asks for
    pub tag: Tag,
    /// Number of bytes the terminal must supply
    pub length: usize,
}

/// Parse the value of a PDOL (9F38) record
pub fn parse(buf: &[u8]) -> Result<Vec<PdolEntry>> {
    let mut entries = Vec::new();
    let mut rest = buf;

    while !rest.is_empty() {
        let (tag, tag_len) = tlv::decode_tag(rest)?;
        let (length, length_len) = tlv::decode_length(&rest[tag_len..])?;
        entries.push(PdolEntry { tag, length });
        rest = &rest[tag_len + length_len..];
    }

    Ok(entries)
}

/// Total number of bytes the terminal must supply
pub fn data_length(entries: &[PdolEntry]) -> usize {
    entries
        .iter()
        .fold(0usize, |total, entry| total.saturating_add(entry.length))
}

/// Produce the terminal's answer to `entries`
///
/// Tags the terminal does not know are answered with zeros. The unpredictable
/// number is drawn below the largest value its field holds, and a source that
/// returns more than that is rejected. Lists asking for more
/// than a short APDU can carry are rejected before anything is allocated.
pub fn fill(
    entries: &[PdolEntry],
    config: &TerminalConfig,
    unpredictable: &mut impl UnpredictableNumberSource,
) -> Result<Vec<u8>> {
    let total = data_length(entries);
    if total > MAX_SHORT_DATA_LEN {
        return Err(Error::validation("PDOL asks for more data than a short APDU carries"));
    }

    let mut data = vec![0u8; total];
    let mut offset = 0;

    for entry in entries {
        let field = &mut data[offset..offset + entry.length];
        offset += entry.length;

        match entry.tag {
            tags::TERMINAL_TRANSACTION_QUALIFIERS => {
                let ttq = config.ttq.to_be_bytes();
                if field.len() < ttq.len() {
                    return Err(Error::validation("TTQ field shorter than 4 bytes"));
                }
                field[..ttq.len()].copy_from_slice(&ttq);
            }
            tags::AMOUNT_AUTHORIZED => bcd::encode_into(field, config.amount_authorized)?,
            tags::UNPREDICTABLE_NUMBER => {
                let bound = 100u64
                    .checked_pow(field.len() as u32)
                    .map_or(MAX_UNPREDICTABLE_BOUND, |capacity| capacity.min(MAX_UNPREDICTABLE_BOUND));
                let number = unpredictable.next_below(bound);
                if number >= bound {
                    return Err(Error::validation("unpredictable number does not fit its field"));
                }
                bcd::encode_into(field, number)?;
            }
            tags::TRANSACTION_CURRENCY_CODE => {
                bcd::encode_into(field, config.transaction_currency_code.into())?
            }
            tags::TERMINAL_COUNTRY_CODE => {
                bcd::encode_into(field, config.terminal_country_code.into())?
            }
            other => trace!(tag = %other, length = entry.length, "Zero-filling unknown PDOL tag"),
        }
    }

    Ok(data)
}

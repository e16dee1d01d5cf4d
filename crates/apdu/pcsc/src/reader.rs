//! Reader representation for PC/SC devices

use std::fmt;

use pcsc::{ReaderState, State};

/// A PC/SC reader as seen at listing time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcscReader {
    name: String,
    atr: Option<Vec<u8>>,
}

impl PcscReader {
    /// Create a reader entry; `atr` is `Some` when a card is present
    pub const fn new(name: String, atr: Option<Vec<u8>>) -> Self {
        Self { name, atr }
    }

    /// Get the reader name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a card is present in the reader
    pub const fn has_card(&self) -> bool {
        self.atr.is_some()
    }

    /// Get the ATR of the card if present
    pub fn atr(&self) -> Option<&[u8]> {
        self.atr.as_deref()
    }

    pub(crate) fn from_reader_state(reader_state: &ReaderState) -> Self {
        let atr = card_present(reader_state.event_state()).then(|| reader_state.atr().to_vec());
        Self {
            name: reader_state.name().to_string_lossy().into_owned(),
            atr,
        }
    }
}

impl fmt::Display for PcscReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.atr {
            Some(atr) => write!(f, "{} [card {}]", self.name, hex::encode_upper(atr)),
            None => write!(f, "{} [empty]", self.name),
        }
    }
}

/// Whether a reader state reports a card in the field
pub(crate) const fn card_present(state: State) -> bool {
    state.contains(State::PRESENT) && !state.contains(State::EMPTY)
}

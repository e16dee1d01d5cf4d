use std::fmt;

use serde::Serialize;

use super::Expiry;
use crate::commands::AccountRecord;

/// Payment card data read during a successful handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Application label, e.g. "VISA"
    pub label: String,
    /// Primary account number as lowercase hex of the raw bytes
    pub pan: String,
    /// Expiry month, 1 to 12
    pub expiry_month: u8,
    /// Two-digit expiry year
    pub expiry_year: u8,
}

impl Card {
    /// Assemble a card from the application label and the record holding the PAN
    pub fn new(label: impl Into<String>, account: &AccountRecord) -> Self {
        Self {
            label: label.into(),
            pan: hex::encode(&account.pan),
            expiry_month: account.expiry.month,
            expiry_year: account.expiry.year,
        }
    }

    /// Expiry date of the card
    pub const fn expiry(&self) -> Expiry {
        Expiry {
            year: self.expiry_year,
            month: self.expiry_month,
        }
    }

    /// Last four PAN digits, or the whole PAN when it is shorter
    pub fn pan_suffix(&self) -> &str {
        let start = self.pan.len().saturating_sub(4);
        self.pan.get(start..).unwrap_or(&self.pan)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ****{} {}", self.label, self.pan_suffix(), self.expiry())
    }
}

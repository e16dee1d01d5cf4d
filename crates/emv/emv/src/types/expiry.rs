use derive_more::Display;
use serde::Serialize;

use crate::bcd;
use crate::error::{Error, Result};

/// Application expiry date (month and two-digit year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
#[display("{month:02}/{year:02}")]
pub struct Expiry {
    /// Two-digit year, 0 to 99
    pub year: u8,
    /// Month, 1 to 12
    pub month: u8,
}

impl Expiry {
    /// Decode the YYMMDD value of tag 5F24; the day is ignored
    pub fn from_bcd(bytes: &[u8]) -> Result<Self> {
        let [year, month, ..] = bytes else {
            return Err(Error::protocol("expiry date shorter than two bytes"));
        };

        let year = bcd::decode_byte(*year)?;
        let month = bcd::decode_byte(*month)?;
        if !(1..=12).contains(&month) {
            return Err(Error::protocol("expiry month out of range"));
        }

        Ok(Self { year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_then_month() {
        assert_eq!(
            Expiry::from_bcd(&[0x23, 0x01]).unwrap(),
            Expiry { year: 23, month: 1 }
        );
        assert_eq!(
            Expiry::from_bcd(&[0x27, 0x11, 0x30]).unwrap(),
            Expiry { year: 27, month: 11 }
        );
    }

    #[test]
    fn test_rejects_malformed_dates() {
        assert!(matches!(Expiry::from_bcd(&[0x23]), Err(Error::Protocol(_))));
        assert!(matches!(Expiry::from_bcd(&[0x23, 0x13]), Err(Error::Protocol(_))));
        assert!(matches!(Expiry::from_bcd(&[0x23, 0x00]), Err(Error::Protocol(_))));
        assert!(matches!(Expiry::from_bcd(&[0x2A, 0x01]), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(Expiry { year: 5, month: 3 }.to_string(), "03/05");
    }
}

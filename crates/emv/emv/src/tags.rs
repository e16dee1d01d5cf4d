//! EMV tag identifiers

use derive_more::{Display, From, Into};

/// BER-TLV tag number
///
/// Multi-byte tags are stored as the big-endian number formed by all of their
/// bytes, so `9F 38` is `Tag(0x9F38)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0:02X}")]
pub struct Tag(pub u32);

impl Tag {
    /// Create a tag from its number
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Number of bytes the tag occupies on the wire
    pub const fn encoded_len(self) -> usize {
        match self.0 {
            0..=0xFF => 1,
            0x100..=0xFFFF => 2,
            0x1_0000..=0xFF_FFFF => 3,
            _ => 4,
        }
    }

    /// The leading byte, which carries the class and constructed bits
    pub const fn first_byte(self) -> u8 {
        (self.0 >> (8 * (self.encoded_len() - 1))) as u8
    }

    /// Whether the value of this tag is itself a sequence of TLV records
    pub const fn is_constructed(self) -> bool {
        self.first_byte() & 0x20 != 0
    }

    /// Wire encoding of the tag
    pub fn to_bytes(self) -> Vec<u8> {
        self.0.to_be_bytes()[4 - self.encoded_len()..].to_vec()
    }

    /// Human-readable name of well-known EMV tags
    pub const fn name(self) -> &'static str {
        match self {
            APPLICATION_ID => "Application Identifier (AID)",
            APPLICATION_LABEL => "Application Label",
            TRACK_2_EQUIVALENT_DATA => "Track 2 Equivalent Data",
            PAN => "Application PAN",
            CARDHOLDER_NAME => "Cardholder Name",
            EXPIRATION_DATE => "Application Expiration Date",
            TRANSACTION_CURRENCY_CODE => "Transaction Currency Code",
            LANGUAGE_PREFERENCE => "Language Preference",
            PAN_SEQUENCE_NUMBER => "Application PAN Sequence Number",
            DIRECTORY_ENTRY => "Directory Entry",
            FCI_TEMPLATE => "File Control Information (FCI) Template",
            RECORD_TEMPLATE => "Record Template",
            RESPONSE_FORMAT_2 => "Response Message Template Format 2",
            RESPONSE_FORMAT_1 => "Response Message Template Format 1",
            AIP => "Application Interchange Profile",
            COMMAND_TEMPLATE => "Command Template",
            DF_NAME => "Dedicated File (DF) Name",
            AFL => "Application File Locator (AFL)",
            FCI_PROPRIETARY_TEMPLATE => "FCI Proprietary Template",
            AMOUNT_AUTHORIZED => "Amount, Authorised (Numeric)",
            TERMINAL_COUNTRY_CODE => "Terminal Country Code",
            UNPREDICTABLE_NUMBER => "Unpredictable Number",
            PDOL => "Processing Options Data Object List (PDOL)",
            APPLICATION_CURRENCY_CODE => "Application Currency Code",
            TERMINAL_TRANSACTION_QUALIFIERS => "Terminal Transaction Qualifiers (TTQ)",
            FCI_ISSUER_DISCRETIONARY_DATA => "FCI Issuer Discretionary Data",
            _ => "Unknown Tag",
        }
    }
}

// Application metadata
/// Application Identifier (AID)
pub const APPLICATION_ID: Tag = Tag(0x4F);
/// Application Label
pub const APPLICATION_LABEL: Tag = Tag(0x50);
/// Track 2 Equivalent Data
pub const TRACK_2_EQUIVALENT_DATA: Tag = Tag(0x57);
/// Application Primary Account Number
pub const PAN: Tag = Tag(0x5A);
/// Cardholder Name
pub const CARDHOLDER_NAME: Tag = Tag(0x5F20);
/// Application Expiration Date (YYMMDD, BCD)
pub const EXPIRATION_DATE: Tag = Tag(0x5F24);
/// Sequence number among cards sharing the same PAN
pub const PAN_SEQUENCE_NUMBER: Tag = Tag(0x5F34);
/// Application Currency Code
pub const APPLICATION_CURRENCY_CODE: Tag = Tag(0x9F42);
/// Language Preference
pub const LANGUAGE_PREFERENCE: Tag = Tag(0x5F2D);

// Templates
/// Directory entry inside the PPSE answer
pub const DIRECTORY_ENTRY: Tag = Tag(0x61);
/// File Control Information template
pub const FCI_TEMPLATE: Tag = Tag(0x6F);
/// READ RECORD response template
pub const RECORD_TEMPLATE: Tag = Tag(0x70);
/// GET PROCESSING OPTIONS response, format 2
pub const RESPONSE_FORMAT_2: Tag = Tag(0x77);
/// GET PROCESSING OPTIONS response, format 1
pub const RESPONSE_FORMAT_1: Tag = Tag(0x80);
/// FCI Proprietary Template
pub const FCI_PROPRIETARY_TEMPLATE: Tag = Tag(0xA5);
/// FCI Issuer Discretionary Data
pub const FCI_ISSUER_DISCRETIONARY_DATA: Tag = Tag(0xBF0C);
/// Dedicated File name
pub const DF_NAME: Tag = Tag(0x84);

// Processing
/// Application Interchange Profile
pub const AIP: Tag = Tag(0x82);
/// Command template wrapping the GET PROCESSING OPTIONS data
pub const COMMAND_TEMPLATE: Tag = Tag(0x83);
/// Application File Locator
pub const AFL: Tag = Tag(0x94);
/// Processing Options Data Object List
pub const PDOL: Tag = Tag(0x9F38);

// Terminal data requested through the PDOL
/// Terminal Transaction Qualifiers
pub const TERMINAL_TRANSACTION_QUALIFIERS: Tag = Tag(0x9F66);
/// Amount, Authorised (Numeric)
pub const AMOUNT_AUTHORIZED: Tag = Tag(0x9F02);
/// Unpredictable Number
pub const UNPREDICTABLE_NUMBER: Tag = Tag(0x9F37);
/// Transaction Currency Code
pub const TRANSACTION_CURRENCY_CODE: Tag = Tag(0x5F2A);
/// Terminal Country Code
pub const TERMINAL_COUNTRY_CODE: Tag = Tag(0x9F1A);

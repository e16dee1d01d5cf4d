//! APDU command definitions and traits
//!
//! This module provides types and traits for working with APDU commands
//! according to ISO/IEC 7816-4. Only short APDUs are modelled: a one byte Lc
//! and a one byte Le.

pub mod error;

use bytes::{BufMut, Bytes, BytesMut};

pub use error::CommandError;

/// Expected length type for APDU commands
pub type ExpectedLength = u8;

/// Largest data field a short APDU can carry
pub const MAX_SHORT_DATA_LEN: usize = 255;

/// Core trait for APDU commands
pub trait ApduCommand {
    /// Command class (CLA)
    fn class(&self) -> u8;

    /// Instruction code (INS)
    fn instruction(&self) -> u8;

    /// First parameter (P1)
    fn p1(&self) -> u8;

    /// Second parameter (P2)
    fn p2(&self) -> u8;

    /// Command payload data (optional)
    fn data(&self) -> Option<&[u8]>;

    /// Expected response length (optional)
    fn expected_length(&self) -> Option<ExpectedLength>;

    /// Convert to raw APDU bytes
    ///
    /// An absent or empty data field produces neither Lc nor data.
    fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.class());
        buffer.put_u8(self.instruction());
        buffer.put_u8(self.p1());
        buffer.put_u8(self.p2());

        if let Some(data) = self.data().filter(|data| !data.is_empty()) {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        if let Some(le) = self.expected_length() {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }

    /// Convert to raw APDU bytes, refusing data fields a short APDU cannot carry
    fn try_to_bytes(&self) -> Result<Bytes, CommandError> {
        match self.data() {
            Some(data) if data.len() > MAX_SHORT_DATA_LEN => Err(CommandError::data_too_long(
                data.len(),
                MAX_SHORT_DATA_LEN,
            )),
            _ => Ok(self.to_bytes()),
        }
    }

    /// Calculate length of serialized command
    fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;

        if let Some(data) = self.data().filter(|data| !data.is_empty()) {
            length += 1 + data.len();
        }

        if self.expected_length().is_some() {
            length += 1;
        }

        length
    }
}

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (Le)
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with both data and expected length
    pub fn new_with_data_and_le<T: Into<Bytes>>(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: T,
        le: ExpectedLength,
    ) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: Some(le),
        }
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Parse a short command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, CommandError> {
        if data.len() < 4 {
            return Err(CommandError::InvalidLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        match data.len() {
            4 => {}
            // Only Le present, no data
            5 => command.le = Some(data[4]),
            len => {
                let lc = data[4] as usize;
                if lc == 0 || len < 5 + lc || len > 6 + lc {
                    return Err(CommandError::InvalidLength(len));
                }
                command.data = Some(Bytes::copy_from_slice(&data[5..5 + lc]));
                if len == 6 + lc {
                    command.le = Some(data[5 + lc]);
                }
            }
        }

        Ok(command)
    }
}

impl ApduCommand for Command {
    fn class(&self) -> u8 {
        self.cla
    }

    fn instruction(&self) -> u8 {
        self.ins
    }

    fn p1(&self) -> u8 {
        self.p1
    }

    fn p2(&self) -> u8 {
        self.p2
    }

    fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    fn expected_length(&self) -> Option<ExpectedLength> {
        self.le
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let data = Bytes::from_static(&[0xA0, 0x00, 0x00, 0x00, 0x03, 0x10, 0x10]);
        let cmd = Command::new_with_data_and_le(0x00, 0xA4, 0x04, 0x00, data, 0);
        let bytes = cmd.to_bytes();

        assert_eq!(hex::encode(&bytes), "00a4040007a000000003101000");
    }

    #[test]
    fn test_empty_data_omits_lc() {
        let cmd = Command::new_with_data_and_le(0x00, 0xB2, 0x01, 0x0C, Bytes::new(), 0);
        assert_eq!(cmd.to_bytes().as_ref(), &[0x00, 0xB2, 0x01, 0x0C, 0x00]);
        assert_eq!(cmd.command_length(), 5);
    }

    #[test]
    fn test_command_length() {
        let cmd1 = Command::new(0x00, 0xB0, 0x00, 0x00);
        assert_eq!(cmd1.command_length(), 4);

        let cmd2 = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 0xFF);
        assert_eq!(cmd2.command_length(), 5);

        let data = Bytes::from_static(&[0x01, 0x02, 0x03]);
        let cmd3 = Command::new(0x00, 0xD6, 0x00, 0x00).with_data(data.clone());
        assert_eq!(cmd3.command_length(), 8);

        let cmd4 = Command::new_with_data_and_le(0x00, 0xD6, 0x00, 0x00, data, 0xFF);
        assert_eq!(cmd4.command_length(), 9);
        assert_eq!(cmd4.to_bytes().len(), 9);
    }

    #[test]
    fn test_oversized_data_is_rejected() {
        let cmd = Command::new_with_data_and_le(0x80, 0xA8, 0x00, 0x00, vec![0u8; 256], 0);
        assert!(matches!(
            cmd.try_to_bytes(),
            Err(CommandError::DataTooLong(256, 255))
        ));

        let cmd = Command::new_with_data_and_le(0x80, 0xA8, 0x00, 0x00, vec![0u8; 255], 0);
        assert_eq!(cmd.try_to_bytes().unwrap().len(), 4 + 1 + 255 + 1);
    }

    #[test]
    fn test_command_from_bytes() {
        // Header only
        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!((cmd.cla, cmd.ins, cmd.p1, cmd.p2), (0x00, 0xA4, 0x04, 0x00));
        assert!(cmd.data.is_none());
        assert!(cmd.le.is_none());

        // Data without Le
        let cmd = Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x03, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(cmd.data.as_deref(), Some(&[0x01, 0x02, 0x03][..]));
        assert!(cmd.le.is_none());

        // Data and Le
        let cmd =
            Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x03, 0x01, 0x02, 0x03, 0x00]).unwrap();
        assert_eq!(cmd.data.as_deref(), Some(&[0x01, 0x02, 0x03][..]));
        assert_eq!(cmd.le, Some(0x00));

        // Le only
        let cmd = Command::from_bytes(&[0x00, 0xB2, 0x01, 0x0C, 0x00]).unwrap();
        assert!(cmd.data.is_none());
        assert_eq!(cmd.le, Some(0x00));

        // Lc claims more data than present
        assert!(Command::from_bytes(&[0x00, 0xA4, 0x04, 0x00, 0x05, 0x01]).is_err());
        assert!(Command::from_bytes(&[0x00, 0xA4]).is_err());
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let cmd = Command::new_with_data_and_le(0x80, 0xA8, 0x00, 0x00, vec![0x83, 0x00], 0x00);
        assert_eq!(Command::from_bytes(&cmd.to_bytes()).unwrap(), cmd);
    }
}

//! Packed binary-coded decimal
//!
//! Each byte carries two decimal digits, tens in the high nibble. Multi-byte
//! values are most significant byte first.

use crate::error::{Error, Result};

/// Largest value an `width`-byte field holds, or `None` if every `u64` fits
const fn capacity(width: usize) -> Option<u64> {
    if width > u32::MAX as usize {
        return None;
    }
    match 100u64.checked_pow(width as u32) {
        Some(limit) => Some(limit - 1),
        None => None,
    }
}

/// Encode `value` into `buf`, zero-padding the leading bytes
///
/// Fails if the value needs more digits than `buf` can hold.
pub fn encode_into(buf: &mut [u8], value: u64) -> Result<()> {
    if capacity(buf.len()).is_some_and(|max| value > max) {
        return Err(Error::validation("value does not fit the BCD field"));
    }

    let mut rest = value;
    for byte in buf.iter_mut().rev() {
        let pair = (rest % 100) as u8;
        *byte = ((pair / 10) << 4) | (pair % 10);
        rest /= 100;
    }

    Ok(())
}

/// Encode `value` as a `width`-byte field
pub fn encode(value: u64, width: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; width];
    encode_into(&mut buf, value)?;
    Ok(buf)
}

/// Decode a single byte holding two digits
pub fn decode_byte(byte: u8) -> Result<u8> {
    let (high, low) = (byte >> 4, byte & 0x0F);
    if high > 9 || low > 9 {
        return Err(Error::protocol("invalid BCD digit"));
    }
    Ok(high * 10 + low)
}

/// Decode a multi-byte field
pub fn decode(bytes: &[u8]) -> Result<u64> {
    bytes.iter().try_fold(0u64, |acc, &byte| {
        let pair = u64::from(decode_byte(byte)?);
        acc.checked_mul(100)
            .and_then(|acc| acc.checked_add(pair))
            .ok_or(Error::protocol("BCD value overflows"))
    })
}

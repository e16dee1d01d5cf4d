//! BER-TLV codec
//!
//! Decoding works on borrowed buffers: a [`Tlv`] is a view into the response
//! it was parsed from. Encoding always produces the minimal length form.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::tags::Tag;

/// Deepest level of constructed records [`find`] descends into
pub const MAX_NESTING_DEPTH: usize = 16;

/// Longest tag this codec accepts, in bytes
const MAX_TAG_LEN: usize = 4;

/// Longest long-form length field accepted, not counting the initial byte
const MAX_LENGTH_BYTES: usize = 4;

/// A single decoded TLV record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    /// Record tag
    pub tag: Tag,
    /// Raw value bytes
    pub value: &'a [u8],
}

impl<'a> Tlv<'a> {
    /// Whether the value holds nested TLV records
    pub const fn is_constructed(&self) -> bool {
        self.tag.is_constructed()
    }

    /// Decode the records nested in a constructed value
    pub fn children(&self) -> Result<Vec<Tlv<'a>>> {
        decode_all(self.value)
    }

    /// Encode this record back to bytes
    pub fn to_bytes(&self) -> Bytes {
        encode(self.tag, self.value)
    }
}

/// Decode a tag from the front of `buf`, returning it and its encoded size
pub fn decode_tag(buf: &[u8]) -> Result<(Tag, usize)> {
    let first = *buf
        .first()
        .ok_or(Error::protocol("truncated TLV tag"))?;

    let mut number = u32::from(first);
    let mut len = 1;

    if first & 0x1F == 0x1F {
        loop {
            let byte = *buf
                .get(len)
                .ok_or(Error::protocol("truncated multi-byte TLV tag"))?;
            len += 1;
            if len > MAX_TAG_LEN {
                return Err(Error::protocol("TLV tag longer than 4 bytes"));
            }
            number = (number << 8) | u32::from(byte);
            if byte & 0x80 == 0 {
                break;
            }
        }
    }

    Ok((Tag(number), len))
}

/// Decode a length from the front of `buf`, returning it and its encoded size
pub fn decode_length(buf: &[u8]) -> Result<(usize, usize)> {
    let first = *buf
        .first()
        .ok_or(Error::protocol("truncated TLV length"))?;

    if first & 0x80 == 0 {
        return Ok((usize::from(first), 1));
    }

    let count = usize::from(first & 0x7F);
    if count == 0 {
        return Err(Error::protocol("indefinite TLV length"));
    }
    if count > MAX_LENGTH_BYTES {
        return Err(Error::protocol("TLV length field too long"));
    }

    let bytes = buf
        .get(1..=count)
        .ok_or(Error::protocol("truncated TLV length"))?;
    let length = bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));

    Ok((length, 1 + count))
}

/// Decode one record from the front of `buf`, returning it and its encoded size
pub fn decode_one(buf: &[u8]) -> Result<(Tlv<'_>, usize)> {
    let (tag, tag_len) = decode_tag(buf)?;
    let (length, length_len) = decode_length(&buf[tag_len..])?;

    let start = tag_len + length_len;
    let end = start
        .checked_add(length)
        .ok_or(Error::protocol("TLV length overflow"))?;
    let value = buf
        .get(start..end)
        .ok_or(Error::protocol("TLV value runs past end of buffer"))?;

    Ok((Tlv { tag, value }, end))
}

/// Decode the flat sequence of top-level records in `buf`
///
/// Constructed values are not expanded. Zero and `FF` bytes between records
/// are treated as padding and skipped.
pub fn decode_all(buf: &[u8]) -> Result<Vec<Tlv<'_>>> {
    let mut records = Vec::new();
    let mut rest = skip_padding(buf);

    while !rest.is_empty() {
        let (record, used) = decode_one(rest)?;
        records.push(record);
        rest = skip_padding(&rest[used..]);
    }

    Ok(records)
}

/// Find the first record with `tag`, searching depth first
///
/// A constructed record's children are searched before its next sibling.
/// Records are decoded as they are visited, so bytes after the match are
/// never looked at. Nesting deeper than [`MAX_NESTING_DEPTH`] is rejected as
/// malformed.
pub fn find(tag: Tag, buf: &[u8]) -> Result<Tlv<'_>> {
    // Each frame is the undecoded remainder of one nesting level
    let mut stack = vec![buf];

    while let Some(rest) = stack.last_mut() {
        let remaining = skip_padding(*rest);
        if remaining.is_empty() {
            stack.pop();
            continue;
        }

        let (record, used) = decode_one(remaining)?;
        *rest = &remaining[used..];

        if record.tag == tag {
            return Ok(record);
        }

        if record.is_constructed() {
            if stack.len() >= MAX_NESTING_DEPTH {
                return Err(Error::protocol("TLV nesting too deep"));
            }
            stack.push(record.value);
        }
    }

    Err(Error::NotFound(tag))
}

fn skip_padding(mut buf: &[u8]) -> &[u8] {
    while let [0x00 | 0xFF, tail @ ..] = buf {
        buf = tail;
    }
    buf
}

/// Encode a record as tag, minimal length, value
pub fn encode(tag: Tag, value: &[u8]) -> Bytes {
    let tag_bytes = tag.to_bytes();
    let mut buf = BytesMut::with_capacity(tag_bytes.len() + 1 + MAX_LENGTH_BYTES + value.len());
    buf.put_slice(&tag_bytes);
    put_length(&mut buf, value.len());
    buf.put_slice(value);
    buf.freeze()
}

fn put_length(buf: &mut BytesMut, length: usize) {
    if length < 0x80 {
        buf.put_u8(length as u8);
        return;
    }

    let be = length.to_be_bytes();
    let skip = be.iter().take_while(|&&b| b == 0).count();
    let significant = &be[skip..];
    buf.put_u8(0x80 | significant.len() as u8);
    buf.put_slice(significant);
}

//! Variable length quantities
//!
//! Unsigned values are stored big endian, seven bits per byte, with the high
//! bit set on every byte except the last. Signed values fold the sign into
//! the least significant bit before being stored as an unsigned value.
//!
//! ```
//! use sbon::vlq;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! assert_eq!(vlq::encode_unsigned(128), vec![0x81, 0x00]);
//! assert_eq!(vlq::decode_unsigned(&[0x81, 0x00], 0)?, (128, 2));
//!
//! assert_eq!(vlq::encode_signed(-1), vec![0x01]);
//! assert_eq!(vlq::decode_signed(&[0x01], 0)?, (-1, 1));
//! # Ok(())
//! # }
//! ```

use crate::{Error, ErrorKind};
use std::io::Read;

/// The most bytes a single quantity may span (70 bits of payload)
pub const MAX_VLQ_LEN: usize = 10;

/// Decodes an unsigned quantity that starts at `pos` within `data`.
///
/// Returns the value and the number of bytes consumed.
#[inline]
pub fn decode_unsigned(data: &[u8], pos: usize) -> Result<(u64, usize), Error> {
    let input = data.get(pos..).unwrap_or_default();
    read_unsigned_slice(input).map_err(|e| Error::from(e.at(pos as u64)))
}

/// Decodes a signed quantity that starts at `pos` within `data`.
#[inline]
pub fn decode_signed(data: &[u8], pos: usize) -> Result<(i64, usize), Error> {
    let (raw, len) = decode_unsigned(data, pos)?;
    Ok((unzigzag(raw), len))
}

/// Encodes an unsigned quantity into a fresh buffer
pub fn encode_unsigned(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VLQ_LEN);
    write_unsigned(&mut out, value);
    out
}

/// Encodes a signed quantity into a fresh buffer
pub fn encode_signed(value: i64) -> Vec<u8> {
    encode_unsigned(zigzag(value))
}

/// Appends an unsigned quantity to the buffer
#[inline]
pub fn write_unsigned(out: &mut Vec<u8>, value: u64) {
    let mut buf = [0u8; MAX_VLQ_LEN];
    let mut start = MAX_VLQ_LEN - 1;
    buf[start] = (value & 0x7f) as u8;
    let mut rest = value >> 7;
    while rest != 0 {
        start -= 1;
        buf[start] = (rest & 0x7f) as u8 | 0x80;
        rest >>= 7;
    }
    out.extend_from_slice(&buf[start..]);
}

/// Appends a signed quantity to the buffer
#[inline]
pub fn write_signed(out: &mut Vec<u8>, value: i64) {
    write_unsigned(out, zigzag(value))
}

/// Reads an unsigned quantity from a stream.
///
/// Errors are positioned relative to the start of the quantity; stream
/// consumers are expected to rebase them onto the stream position.
pub fn read_unsigned<R: Read>(mut reader: R) -> Result<(u64, usize), Error> {
    let mut value: u64 = 0;
    for i in 0..MAX_VLQ_LEN {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::from(ErrorKind::Eof { offset: i as u64 })
            } else {
                Error::from(ErrorKind::Io {
                    offset: Some(i as u64),
                    source: e,
                })
            }
        })?;

        value = push_group(value, byte[0]).ok_or(ErrorKind::MalformedInteger { offset: 0 })?;
        if byte[0] & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(ErrorKind::MalformedInteger { offset: 0 }.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VlqError {
    Eof,
    Malformed,
}

impl VlqError {
    #[inline]
    pub(crate) fn at(self, offset: u64) -> ErrorKind {
        match self {
            VlqError::Eof => ErrorKind::Eof { offset },
            VlqError::Malformed => ErrorKind::MalformedInteger { offset },
        }
    }
}

/// Core slice decoder shared by the public functions and the decoder cursor
#[inline]
pub(crate) fn read_unsigned_slice(data: &[u8]) -> Result<(u64, usize), VlqError> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().take(MAX_VLQ_LEN).enumerate() {
        value = push_group(value, byte).ok_or(VlqError::Malformed)?;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    if data.len() >= MAX_VLQ_LEN {
        Err(VlqError::Malformed)
    } else {
        Err(VlqError::Eof)
    }
}

#[inline]
fn push_group(value: u64, byte: u8) -> Option<u64> {
    if value >> 57 != 0 {
        return None;
    }

    Some((value << 7) | u64::from(byte & 0x7f))
}

#[inline]
pub(crate) const fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub(crate) const fn unzigzag(raw: u64) -> i64 {
    ((raw >> 1) as i64) ^ -((raw & 1) as i64)
}

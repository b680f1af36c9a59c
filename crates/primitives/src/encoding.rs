//! Byte-level encoder/decoder primitives for the wire format.
//!
//! Every multi-byte integer in this protocol is little-endian. Decode
//! errors carry the field name and the cursor offset where decoding
//! stopped; nothing is recovered silently.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes were available than the field declares.
    Truncated { field: &'static str, offset: usize },
    /// The 2-byte type tag has no registered body layout.
    UnsupportedType { type_tag: u16 },
    /// A value violates its declared width or range, or a derived length
    /// is inconsistent with the transaction's declared size.
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    /// The digest primitive failed; fatal, never retried.
    HashFailure(&'static str),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Truncated { field, offset } => {
                write!(f, "unexpected end of input reading {field} at offset {offset}")
            }
            CodecError::UnsupportedType { type_tag } => {
                write!(f, "no body layout registered for type 0x{type_tag:04x}")
            }
            CodecError::InvalidField { field, reason } => write!(f, "invalid {field}: {reason}"),
            CodecError::HashFailure(reason) => write!(f, "digest failure: {reason}"),
        }
    }
}

impl std::error::Error for CodecError {}

#[derive(Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a little-endian integer of the given byte width.
    ///
    /// Count fields declare their width per layout; a value that does not
    /// fit the declared width is an `InvalidField`, never silently masked.
    pub fn write_uint_le(
        &mut self,
        value: u64,
        width: usize,
        field: &'static str,
    ) -> Result<(), CodecError> {
        if width == 0 || width > 8 {
            return Err(CodecError::InvalidField {
                field,
                reason: "unsupported integer width",
            });
        }
        if width < 8 && value >= 1u64 << (8 * width) {
            return Err(CodecError::InvalidField {
                field,
                reason: "value exceeds declared width",
            });
        }
        self.buf.extend_from_slice(&value.to_le_bytes()[..width]);
        Ok(())
    }
}

pub struct Decoder<'a> {
    input: &'a [u8],
    cursor: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.cursor)
    }

    fn read_slice(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::Truncated {
                field,
                offset: self.cursor,
            });
        }
        let start = self.cursor;
        self.cursor += len;
        Ok(&self.input[start..start + len])
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, CodecError> {
        Ok(self.read_slice(1, field)?[0])
    }

    pub fn read_u16_le(&mut self, field: &'static str) -> Result<u16, CodecError> {
        let bytes = self.read_slice(2, field)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&mut self, field: &'static str) -> Result<u32, CodecError> {
        let bytes = self.read_slice(4, field)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64_le(&mut self, field: &'static str) -> Result<u64, CodecError> {
        let bytes = self.read_slice(8, field)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    pub fn read_fixed<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let bytes = self.read_slice(N, field)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>, CodecError> {
        Ok(self.read_slice(len, field)?.to_vec())
    }

    /// Reads a little-endian integer of the given byte width.
    pub fn read_uint_le(&mut self, width: usize, field: &'static str) -> Result<u64, CodecError> {
        if width == 0 || width > 8 {
            return Err(CodecError::InvalidField {
                field,
                reason: "unsupported integer width",
            });
        }
        let bytes = self.read_slice(width, field)?;
        let mut out = [0u8; 8];
        out[..width].copy_from_slice(bytes);
        Ok(u64::from_le_bytes(out))
    }
}

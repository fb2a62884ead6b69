//! Binary field grammar shared by the instruction encoder and the account decoder.
//!
//! Layout rules (must stay byte-compatible with the deployed program):
//!
//! ```text
//! u8 / bool      1 byte, bool is strictly 0x00 or 0x01
//! u32 / i64      little-endian, fixed width
//! string         [len: u32 LE][len bytes of UTF-8]
//! list<string>   [count: u32 LE][string]*count
//! ```
//!
//! Strings carry no fixed-width reservation, so the offset of every field
//! depends on the lengths of all the variable-length fields before it.
//! Reads therefore go through a [`FieldCursor`] that advances one field at a
//! time; there is no offset table.

use crate::core::constants::{DEFAULT_MAX_LIST_LEN, DEFAULT_MAX_STRING_LEN};
use crate::error::{Result, SdkError};
use serde::Deserialize;

const LEN_PREFIX: usize = 4;

/// Encode-time bounds on variable-length fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    /// Maximum UTF-8 byte length of a single string
    pub max_string_len: usize,
    /// Maximum number of entries in a string list
    pub max_list_len: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_list_len: DEFAULT_MAX_LIST_LEN,
        }
    }
}

/// Append-only encoder for the field grammar.
#[derive(Debug, Clone)]
pub struct FieldWriter {
    buffer: Vec<u8>,
    limits: FieldLimits,
}

impl FieldWriter {
    pub fn new(limits: FieldLimits) -> Self {
        Self {
            buffer: Vec::new(),
            limits,
        }
    }

    pub fn with_capacity(limits: FieldLimits, capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            limits,
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.buffer.push(value as u8);
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Raw fixed-width bytes, no length prefix (addresses).
    pub fn write_fixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    pub fn write_string(&mut self, field: &'static str, value: &str) -> Result<&mut Self> {
        let len = value.len();
        if len > self.limits.max_string_len {
            return Err(SdkError::FieldTooLarge {
                field,
                len,
                max: self.limits.max_string_len,
            });
        }
        let prefix = length_prefix(field, len)?;
        self.write_u32(prefix);
        self.buffer.extend_from_slice(value.as_bytes());
        Ok(self)
    }

    pub fn write_string_list<S: AsRef<str>>(
        &mut self,
        field: &'static str,
        values: &[S],
    ) -> Result<&mut Self> {
        if values.len() > self.limits.max_list_len {
            return Err(SdkError::FieldTooLarge {
                field,
                len: values.len(),
                max: self.limits.max_list_len,
            });
        }
        let count = length_prefix(field, values.len())?;
        self.write_u32(count);
        for value in values {
            self.write_string(field, value.as_ref())?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

fn length_prefix(field: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| SdkError::FieldTooLarge {
        field,
        len,
        max: u32::MAX as usize,
    })
}

/// Sequential reader over a borrowed buffer. Never mutates the input and
/// never reads past its end.
#[derive(Debug, Clone)]
pub struct FieldCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> FieldCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Remaining unread bytes, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        let data = self.data;
        &data[self.offset..]
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(SdkError::TruncatedBuffer {
                needed: len,
                remaining,
            });
        }
        let data = self.data;
        let start = self.offset;
        self.offset += len;
        Ok(&data[start..self.offset])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self, field: &'static str) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(SdkError::MalformedField { field, byte }),
        }
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    pub fn read_string_list(&mut self) -> Result<Vec<String>> {
        let count = self.read_u32()? as usize;
        // Each entry needs at least its length prefix; reject before allocating.
        let needed = count.saturating_mul(LEN_PREFIX);
        let remaining = self.remaining();
        if needed > remaining {
            return Err(SdkError::TruncatedBuffer { needed, remaining });
        }
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_string()?);
        }
        Ok(values)
    }
}

//! # Primitive Codec
//!
//! Network-byte-order reads and writes of the fixed-width fields used by every frame
//! body. `Reader` is a bounded cursor over a borrowed slice and never outlives one
//! decode call; `Writer` appends to a growable buffer. These two types are the only
//! places in the crate that index raw frame bytes.

use super::common::{CodecError, Result};
use bytes::BufMut;

/// Width of a NAME1 field (station, channel and digital bit names).
pub const NAME1_SIZE: usize = 16;

/// Padding byte used when writing NAME1 fields.
const NAME1_PAD: u8 = b' ';

/// Bounded read cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buffer: &'a [u8],
    position: usize,
    end: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Reader {
            buffer,
            position: 0,
            end: buffer.len(),
        }
    }

    /// Current offset from the start of the underlying slice.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left before the read window ends.
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.position)
    }

    /// Restricts the read window to end at `end` (clamped to the slice length).
    pub fn limit(&mut self, end: usize) {
        self.end = end.min(self.buffer.len());
    }

    /// Consumes exactly `count` bytes.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(CodecError::Truncated {
                needed: count,
                remaining,
            });
        }
        let bytes = &self.buffer[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// Consumes everything up to the end of the read window.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let start = self.position.min(self.end);
        self.position = self.end.max(self.position);
        &self.buffer[start..self.end]
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    /// Reads an IEEE-754 single; only the byte order is converted.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads a 16-byte NAME1 field, dropping trailing space and NUL padding.
    pub fn read_name1(&mut self) -> Result<String> {
        let raw = self.take(NAME1_SIZE)?;
        let name = String::from_utf8_lossy(raw);
        Ok(name.trim_end_matches([' ', '\0']).to_string())
    }
}

/// Growable big-endian output buffer.
#[derive(Debug, Default)]
pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.put_u16(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buffer.put_i16(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.put_u32(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buffer.put_u32(value.to_bits());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.put_slice(bytes);
    }

    /// Writes a NAME1 field: truncated or space padded to exactly 16 bytes.
    pub fn write_name1(&mut self, name: &str) {
        let bytes = name.as_bytes();
        let len = bytes.len().min(NAME1_SIZE);
        self.buffer.put_slice(&bytes[..len]);
        self.buffer.put_bytes(NAME1_PAD, NAME1_SIZE - len);
    }

    /// Overwrites two bytes at `offset`, used to patch FRAMESIZE once the body is known.
    ///
    /// `offset + 2` must not exceed the bytes written so far.
    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        self.buffer[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }
}

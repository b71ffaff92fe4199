//! # IEEE C37.118 Common Types
//!
//! This module defines the types shared by every frame codec: the error taxonomy, the
//! frame type encoded in the SYNC word, and the constants describing the fixed frame
//! envelope (SYNC, FRAMESIZE, IDCODE, SOC, FRACSEC ... CHK).
//!
//! ## Key Components
//!
//! - `CodecError`: Enumerates every failure of decoding or encoding a frame.
//! - `FrameType`: Message kind carried in bits 6-4 of the SYNC word.
//! - `sync_word`: Builds a SYNC word from a frame type and a version number.
//!
//! ## Usage
//!
//! "Not enough bytes yet" is not an error. `Parser::deserialize` reports it as
//! `Ok(None)`; everything in `CodecError` is scoped to one frame or one encode call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Leading byte of every SYNC word.
pub const SYNC_LEADING_BYTE: u16 = 0xAA00;

/// Bits of the SYNC word that must equal `SYNC_LEADING_BYTE` (bit 7 is reserved as zero).
pub const SYNC_MASK: u16 = 0xFF80;

/// Bits 6-4 of the SYNC word.
pub const FRAME_TYPE_MASK: u16 = 0x0070;

/// Bits 3-0 of the SYNC word.
pub const VERSION_MASK: u16 = 0x000F;

/// SYNC + FRAMESIZE + IDCODE + SOC + FRACSEC.
pub const PREFIX_SIZE: usize = 14;

/// Trailing CRC-CCITT field.
pub const CHK_SIZE: usize = 2;

/// Smallest legal frame: an empty body between prefix and CHK.
pub const MIN_FRAME_SIZE: usize = PREFIX_SIZE + CHK_SIZE;

/// Errors raised while decoding or encoding IEEE C37.118 frames.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// The SYNC word does not start with 0xAA; the stream must be resynchronized.
    #[error("invalid sync word 0x{sync:04X}, expected 0xAA in the leading byte")]
    InvalidSync { sync: u16 },

    /// FRAMESIZE is too small to hold the prefix and the checksum.
    #[error("invalid framesize {framesize}, a frame holds at least 16 bytes")]
    InvalidFrameSize { framesize: u16 },

    /// The trailing CHK field disagrees with the CRC computed over the frame.
    #[error("checksum mismatch: computed 0x{expected:04X}, frame carries 0x{actual:04X}")]
    ChecksumMismatch { expected: u16, actual: u16 },

    /// The frame type bits of the SYNC word do not name a supported message.
    #[error("unsupported frame type in sync word 0x{sync:04X}")]
    UnsupportedFrameType { sync: u16 },

    /// The PMU data passed to the encoder does not match the stored configuration.
    #[error("[{field}] expected {expected}, got {actual}")]
    SizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A value's notation differs from the one required by the PMU's FORMAT bits.
    #[error("format mismatch: PMU format requires {expected}, value is {actual}")]
    FormatMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A typed accessor asked for a notation the value does not hold.
    #[error("invalid notation: requested {expected}, value is {actual}")]
    InvalidNotation {
        expected: &'static str,
        actual: &'static str,
    },

    /// A read ran past the end of the frame body.
    #[error("truncated field: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A frame without a message cannot be serialized.
    #[error("frame carries no message")]
    MissingMessage,

    /// Data frames can only be encoded against a stored configuration.
    #[error("no configuration loaded, data frames cannot be encoded")]
    MissingConfig,
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Represents the type of an IEEE C37.118 frame.
///
/// The discriminant is the value of bits 6-4 of the SYNC word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameType {
    Data = 0,
    Header = 1,
    Config1 = 2,
    Config2 = 3,
    Command = 4,
}

impl FrameType {
    /// Extracts the frame type from the SYNC word.
    ///
    /// Only the frame type bits are inspected; validating the leading byte is the
    /// caller's job (see `is_valid_sync`).
    ///
    /// # Returns
    ///
    /// * `Ok(FrameType)`: The frame type selected by bits 6-4.
    /// * `Err(CodecError::UnsupportedFrameType)`: If the bits name no known body codec
    ///   (including configuration frame 3).
    pub fn from_sync(sync: u16) -> Result<FrameType> {
        match sync & FRAME_TYPE_MASK {
            0x00 => Ok(FrameType::Data),
            0x10 => Ok(FrameType::Header),
            0x20 => Ok(FrameType::Config1),
            0x30 => Ok(FrameType::Config2),
            0x40 => Ok(FrameType::Command),
            _ => Err(CodecError::UnsupportedFrameType { sync }),
        }
    }

    /// The frame type positioned at bits 6-4.
    pub fn sync_bits(self) -> u16 {
        (self as u16) << 4
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameType::Data => write!(f, "IEEE Std C37.118 Data Frame"),
            FrameType::Header => write!(f, "IEEE Std C37.118 Header Frame"),
            FrameType::Config1 => write!(f, "IEEE Std C37.118 Configuration Frame 1"),
            FrameType::Config2 => write!(f, "IEEE Std C37.118 Configuration Frame 2"),
            FrameType::Command => write!(f, "IEEE Std C37.118 Command Frame"),
        }
    }
}

/// Checks the fixed part of a SYNC word (leading 0xAA, reserved bit 7 clear).
pub fn is_valid_sync(sync: u16) -> bool {
    sync & SYNC_MASK == SYNC_LEADING_BYTE
}

/// Constructs a SYNC word.
///
/// ```text
/// bits 15-8: 0xAA
/// bit  7   : reserved (0)
/// bits 6-4 : frame type
/// bits 3-0 : version (1 = 2005, 2 = 2011)
/// ```
///
/// Only the low four bits of `version` are used.
pub fn sync_word(frame_type: FrameType, version: u16) -> u16 {
    SYNC_LEADING_BYTE | frame_type.sync_bits() | (version & VERSION_MASK)
}

//! # IEEE C37.118 Checksum and Time Utilities
//!
//! This module provides the CRC-CCITT checksum specified in IEEE C37.118.2-2011
//! Annex B, used both to verify incoming frames and to stamp outgoing ones, and helpers
//! converting between SOC/FRACSEC pairs and wall-clock time.

use super::common::{CodecError, Result, CHK_SIZE};
use std::time::SystemTime;

/// Mask selecting the 24-bit fraction-of-second count in FRACSEC.
pub const FRACSEC_COUNT_MASK: u32 = 0x00FF_FFFF;

/// Calculates the CRC-CCITT checksum for a given buffer.
///
/// Polynomial x^16 + x^12 + x^5 + 1 with initial value 0xFFFF and no final XOR. This is
/// the table-free routine of IEEE C37.118.2-2011 Annex B: the incoming byte is folded
/// into the high byte of the register and the feedback is applied as shifted copies
/// (by 0, 5 and 12 bits) of `temp ^ (temp >> 4)`.
///
/// # Parameters
///
/// * `buffer`: The input byte slice to calculate the CRC for.
///
/// # Returns
///
/// The calculated 16-bit CRC checksum.
pub fn calculate_crc(buffer: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in buffer {
        let temp = (crc >> 8) ^ byte as u16;
        crc <<= 8;
        let mut quick = temp ^ (temp >> 4);
        crc ^= quick;
        quick <<= 5;
        crc ^= quick;
        quick <<= 7;
        crc ^= quick;
    }
    crc
}

/// Validates the checksum of a complete frame.
///
/// Checks if the buffer's last two bytes match the CRC-CCITT checksum of the preceding
/// bytes.
///
/// # Returns
///
/// * `Ok(())` if the checksum is valid.
/// * `Err(CodecError::Truncated)` if the buffer cannot hold a checksum.
/// * `Err(CodecError::ChecksumMismatch)` if the checksum does not match.
pub fn validate_checksum(buffer: &[u8]) -> Result<()> {
    if buffer.len() < CHK_SIZE {
        return Err(CodecError::Truncated {
            needed: CHK_SIZE,
            remaining: buffer.len(),
        });
    }

    let split = buffer.len() - CHK_SIZE;
    let expected = calculate_crc(&buffer[..split]);
    let actual = u16::from_be_bytes([buffer[split], buffer[split + 1]]);

    if expected != actual {
        return Err(CodecError::ChecksumMismatch { expected, actual });
    }
    Ok(())
}

/// Converts SOC and FRACSEC into nanoseconds since the Unix epoch.
///
/// The upper byte of FRACSEC (time quality flags) is ignored; the remaining 24-bit count
/// is divided by `time_base`. A `time_base` of zero yields whole seconds only.
pub fn timestamp_ns(soc: u32, fracsec: u32, time_base: u32) -> i64 {
    let seconds = soc as i64 * 1_000_000_000;
    if time_base == 0 {
        return seconds;
    }
    let count = (fracsec & FRACSEC_COUNT_MASK) as i64;
    seconds + count * 1_000_000_000 / time_base as i64
}

/// Returns the current time as a `(soc, fracsec)` pair for the given `time_base`.
///
/// The time quality byte of FRACSEC is left at zero.
pub fn now_soc_fracsec(time_base: u32) -> (u32, u32) {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();

    let soc = now.as_secs() as u32;
    let fracsec = ((now.subsec_nanos() as u64 * time_base as u64) / 1_000_000_000) as u32
        & FRACSEC_COUNT_MASK;
    (soc, fracsec)
}

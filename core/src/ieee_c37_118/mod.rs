//! # IEEE C37.118 Frame Codec
//!
//! Decoding and encoding of IEEE C37.118 synchrophasor frames, the binary wire format
//! exchanged between Phasor Measurement Units (PMUs) and data concentrators. Data,
//! header, configuration (CFG-1, CFG-2) and command frames are supported.
//!
//! ## Submodules
//!
//! - `common`: Error type, frame types and SYNC word helpers.
//! - `utils`: CRC-CCITT checksum and SOC/FRACSEC time helpers.
//! - `cursor`: Bounded big-endian reader and writer used by every body codec.
//! - `phasors`: Phasor and scalar values, their notations and FORMAT-driven codec.
//! - `units`: Typed views of PHUNIT, ANUNIT, DIGUNIT and FNOM words.
//! - `config`: Configuration frames and the multi-pass layout codec.
//! - `data_frame`: Data frames, decoded against a configuration.
//! - `header`: Free-text header frames.
//! - `commands`: Command frames and command codes.
//! - `frame`: The frame envelope and the stateful `Parser`.
//! - `random`: Random configurations and data frames for tests and benches.
//!
//! ## Usage
//!
//! Keep one `Parser` per connection. Feed it the receive buffer; on `Ok(Some(frame))`
//! drop `frame.framesize` bytes, on `Ok(None)` wait for more data, and on an error
//! discard bytes up to the next 0xAA.

pub mod commands;
pub mod common;
pub mod config;
pub mod cursor;
pub mod data_frame;
pub mod frame;
pub mod header;
pub mod phasors;
pub mod random;
pub mod units;
pub mod utils;

#[cfg(test)]
mod tests;

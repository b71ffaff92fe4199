//! # Synchrophasor Frame Codec
//!
//! This crate decodes and encodes IEEE C37.118 synchrophasor frames, as defined in
//! IEEE C37.118-2005 and IEEE C37.118.2-2011, and maps decoded data frames to
//! timestamped samples for downstream processing.
//!
//! ## Submodules
//!
//! - `ieee_c37_118`: Core functionality for IEEE C37.118 frame processing.
//!   - `common`: Defines `CodecError`, `FrameType` and SYNC word helpers.
//!   - `cursor`: Bounded big-endian reads and writes over frame bytes.
//!   - `phasors`: Handles phasor and scalar values in each FORMAT notation.
//!   - `config`: Parses configuration frames (CFG-1, CFG-2) for PMU layouts.
//!   - `data_frame`: Processes data frames with real-time synchrophasor measurements.
//!   - `header`, `commands`: Header and command frame bodies.
//!   - `frame`: Frame envelope and the stateful `Parser`.
//!   - `units`: Defines measurement units (e.g., `PhasorUnits`, `NominalFrequency`).
//!   - `random`: Generates random frames for testing parsing logic.
//! - `sample`: Maps decoded data frames to per-PMU timestamped samples.
//!
//! ## Usage
//!
//! ```
//! use c37118_core::ieee_c37_118::frame::Parser;
//! use c37118_core::ieee_c37_118::random::{random_config, random_frame};
//! use c37118_core::sample::samples_from_frame;
//!
//! let config = random_config(2);
//! let parser = Parser::with_config(config.clone());
//! let bytes = parser.serialize(&random_frame(&config, 7)).unwrap();
//!
//! let mut receiver = Parser::with_config(config);
//! let frame = receiver.deserialize(&bytes).unwrap().unwrap();
//! let samples = samples_from_frame(&frame, receiver.get_config().unwrap());
//! assert_eq!(samples.len(), 2);
//! ```

pub mod ieee_c37_118;
pub mod sample;

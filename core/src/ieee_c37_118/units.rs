//! # IEEE C37.118 Measurement Units
//!
//! Typed views over the conversion-factor words of a configuration frame. The schema
//! keeps the raw PHUNIT/ANUNIT/DIGUNIT and FNOM words so that re-encoding reproduces
//! the received bytes exactly; this module interprets them on demand.
//!
//! ## Key Components
//!
//! - `PhasorUnits`: Voltage/current flag and the 24-bit scale factor of PHUNIT.
//! - `AnalogUnits`: Measurement type and signed 24-bit user scaling of ANUNIT.
//! - `MeasurementType`: Kind of analog measurement.
//! - `DigitalUnits`: Normal-status and valid-inputs masks of DIGUNIT.
//! - `NominalFrequency`: Nominal line frequency selected by FNOM.
//!
//! ## Usage
//!
//! ```
//! use c37118_core::ieee_c37_118::units::PhasorUnits;
//!
//! let units = PhasorUnits::from_raw(0x000D_F847);
//! assert!(!units.is_current);
//! assert_eq!(units.scale_factor, 915_527);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

const SCALE_MASK: u32 = 0x00FF_FFFF;

/// Scaling of integer phasors, in 10^-5 V or A per bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasorUnits {
    /// Most significant byte: 0 = voltage, 1 = current.
    pub is_current: bool,
    /// Unsigned 24-bit scale factor; ignored for float phasors.
    pub scale_factor: u32,
}

impl PhasorUnits {
    pub fn from_raw(raw: u32) -> Self {
        PhasorUnits {
            is_current: (raw >> 24) == 1,
            scale_factor: raw & SCALE_MASK,
        }
    }

    pub fn to_raw(&self) -> u32 {
        ((self.is_current as u32) << 24) | (self.scale_factor & SCALE_MASK)
    }

    /// Scales a raw integer phasor component to volts or amperes.
    pub fn scale(&self, value: f32) -> f32 {
        value * self.scale_factor as f32 * 1.0e-5
    }
}

/// Enumerates measurement types for analog channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementType {
    SinglePointOnWave,
    RmsOfAnalogInput,
    PeakOfAnalogInput,
    Reserved(u8),
}

impl MeasurementType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => MeasurementType::SinglePointOnWave,
            1 => MeasurementType::RmsOfAnalogInput,
            2 => MeasurementType::PeakOfAnalogInput,
            other => MeasurementType::Reserved(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            MeasurementType::SinglePointOnWave => 0,
            MeasurementType::RmsOfAnalogInput => 1,
            MeasurementType::PeakOfAnalogInput => 2,
            MeasurementType::Reserved(code) => *code,
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MeasurementType::SinglePointOnWave => write!(f, "Single Point-On-Wave"),
            MeasurementType::RmsOfAnalogInput => write!(f, "RMS"),
            MeasurementType::PeakOfAnalogInput => write!(f, "Peak"),
            MeasurementType::Reserved(code) => write!(f, "Reserved ({})", code),
        }
    }
}

/// Measurement type and user-defined scaling of an analog channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogUnits {
    pub measurement_type: MeasurementType,
    /// Signed 24-bit scale factor, sign-extended.
    pub scale_factor: i32,
}

impl AnalogUnits {
    pub fn from_raw(raw: u32) -> Self {
        // shift the 24-bit field to the top and back to sign-extend it
        let scale_factor = ((raw << 8) as i32) >> 8;
        AnalogUnits {
            measurement_type: MeasurementType::from_code((raw >> 24) as u8),
            scale_factor,
        }
    }

    pub fn to_raw(&self) -> u32 {
        ((self.measurement_type.code() as u32) << 24) | (self.scale_factor as u32 & SCALE_MASK)
    }
}

/// Mask words of a digital status word.
///
/// XOR of the status word with `normal_status` is zero when every input is in its
/// normal state; `valid_inputs` has a bit set for each input in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalUnits {
    pub normal_status: u16,
    pub valid_inputs: u16,
}

impl DigitalUnits {
    pub fn from_raw(raw: u32) -> Self {
        DigitalUnits {
            normal_status: (raw >> 16) as u16,
            valid_inputs: raw as u16,
        }
    }

    pub fn to_raw(&self) -> u32 {
        ((self.normal_status as u32) << 16) | self.valid_inputs as u32
    }

    /// Bits of `word` that are valid inputs and differ from their normal state.
    pub fn abnormal_bits(&self, word: u16) -> u16 {
        (word ^ self.normal_status) & self.valid_inputs
    }
}

/// Nominal line frequency, FNOM bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NominalFrequency {
    Hz50,
    Hz60,
}

impl NominalFrequency {
    /// Bit 0 set selects 50 Hz, clear selects 60 Hz; other bits are reserved.
    pub fn from_fnom(fnom: u16) -> Self {
        if fnom & 0x0001 != 0 {
            NominalFrequency::Hz50
        } else {
            NominalFrequency::Hz60
        }
    }

    pub fn to_fnom(&self) -> u16 {
        match self {
            NominalFrequency::Hz50 => 1,
            NominalFrequency::Hz60 => 0,
        }
    }

    pub fn hertz(&self) -> f32 {
        match self {
            NominalFrequency::Hz50 => 50.0,
            NominalFrequency::Hz60 => 60.0,
        }
    }
}

impl fmt::Display for NominalFrequency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NominalFrequency::Hz50 => write!(f, "50 Hz"),
            NominalFrequency::Hz60 => write!(f, "60 Hz"),
        }
    }
}

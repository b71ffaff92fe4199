//! # IEEE C37.118 Configuration Frames
//!
//! Configuration frames describe the channel layout of every PMU whose data is carried
//! by a stream: station name, FORMAT word, channel names, conversion factors, nominal
//! frequency and change count. Data frames cannot be read without one.
//!
//! CFG-1 (capabilities) and CFG-2 (current layout) share a body layout, so both are
//! represented by `Config` and distinguished by the `Config1`/`Config2` wrappers.
//!
//! ## Wire Layout
//!
//! The body is written in passes over the PMU list rather than PMU by PMU:
//!
//! ```text
//! TIME_BASE, NUM_PMU
//! for each PMU:  STN, IDCODE, FORMAT, PHNMR, ANNMR, DGNMR
//! for each PMU:  phasor names        then for each PMU: analog names
//! for each PMU:  digital names (16 per word)
//! for each PMU:  PHUNIT              then for each PMU: ANUNIT
//! for each PMU:  DIGUNIT
//! for each PMU:  FNOM, CFGCNT
//! DATA_RATE
//! ```
//!
//! With a single PMU this is identical to the per-PMU ordering.
//!
//! ## Key Components
//!
//! - `Config`: Time base, PMU layouts and data rate.
//! - `Config1`, `Config2`: Frame-kind wrappers around `Config`.
//! - `PmuConfig`: One PMU's channel layout.
//! - `ChannelInfo`, `DigitalInfo`: Channel names with their raw unit words.

use super::common::{CodecError, Result, PREFIX_SIZE, CHK_SIZE};
use super::cursor::{Reader, Writer, NAME1_SIZE};
use super::phasors::{NumberNotation, PhasorNotation};
use super::units::{AnalogUnits, DigitalUnits, NominalFrequency, PhasorUnits};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Number of named bits in one digital status word.
pub const DIGITAL_BITS: usize = 16;

/// STN, IDCODE, FORMAT, PHNMR, ANNMR, DGNMR.
const PMU_HEADER_SIZE: usize = NAME1_SIZE + 10;

/// A phasor or analog channel: its name and raw PHUNIT/ANUNIT word.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub nam: String,
    pub unit: u32,
}

impl ChannelInfo {
    pub fn new(nam: impl Into<String>, unit: u32) -> Self {
        ChannelInfo {
            nam: nam.into(),
            unit,
        }
    }
}

/// A digital status word: one name per bit and the raw DIGUNIT word.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DigitalInfo {
    pub nam: [String; DIGITAL_BITS],
    pub unit: u32,
}

/// Channel layout of a single PMU.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PmuConfig {
    pub stn: String,
    pub idcode: u16,
    pub format: u16,
    pub phinfo: Vec<ChannelInfo>,
    pub aninfo: Vec<ChannelInfo>,
    pub dginfo: Vec<DigitalInfo>,
    pub fnom: u16,
    pub cfgcnt: u16,
}

impl PmuConfig {
    pub fn phasor_notation(&self) -> PhasorNotation {
        PhasorNotation::from_format(self.format)
    }

    pub fn analog_notation(&self) -> NumberNotation {
        NumberNotation::analog_from_format(self.format)
    }

    pub fn freq_notation(&self) -> NumberNotation {
        NumberNotation::freq_from_format(self.format)
    }

    /// Bytes this PMU contributes to a data frame body.
    ///
    /// STAT, phasors, FREQ, DFREQ, analogs and digital words.
    pub fn data_size(&self) -> usize {
        2 + self.phinfo.len() * self.phasor_notation().size()
            + 2 * self.freq_notation().size()
            + self.aninfo.len() * self.analog_notation().size()
            + 2 * self.dginfo.len()
    }

    /// Channel names in data frame order: phasors, analogs, then digital bits.
    pub fn channel_names(&self) -> Vec<String> {
        self.phinfo
            .iter()
            .chain(self.aninfo.iter())
            .map(|channel| channel.nam.clone())
            .chain(self.dginfo.iter().flat_map(|word| word.nam.iter().cloned()))
            .collect()
    }

    pub fn phasor_units(&self) -> Vec<PhasorUnits> {
        self.phinfo
            .iter()
            .map(|channel| PhasorUnits::from_raw(channel.unit))
            .collect()
    }

    pub fn analog_units(&self) -> Vec<AnalogUnits> {
        self.aninfo
            .iter()
            .map(|channel| AnalogUnits::from_raw(channel.unit))
            .collect()
    }

    pub fn digital_units(&self) -> Vec<DigitalUnits> {
        self.dginfo
            .iter()
            .map(|word| DigitalUnits::from_raw(word.unit))
            .collect()
    }

    pub fn nominal_frequency(&self) -> NominalFrequency {
        NominalFrequency::from_fnom(self.fnom)
    }
}

/// Layout schema shared by CFG-1 and CFG-2 frames.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    pub time_base: u32,
    pub pmus: Vec<PmuConfig>,
    pub data_rate: i16,
}

// Counts read in the first pass, consumed by the later ones.
struct ChannelCounts {
    phasors: u16,
    analogs: u16,
    digitals: u16,
}

fn wire_count(field: &'static str, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| CodecError::SizeMismatch {
        field,
        expected: u16::MAX as usize,
        actual: len,
    })
}

impl Config {
    /// Reads a configuration body.
    ///
    /// # Parameters
    ///
    /// * `reader`: Cursor positioned after FRACSEC, bounded to the end of the body.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)`: The decoded schema.
    /// * `Err(CodecError::Truncated)`: If the body ends before the layout it announces.
    pub fn decode(reader: &mut Reader<'_>) -> Result<Config> {
        let time_base = reader.read_u32()?;
        let num_pmus = reader.read_u16()?;

        let mut pmus = Vec::new();
        let mut counts = Vec::new();
        for _ in 0..num_pmus {
            let stn = reader.read_name1()?;
            let idcode = reader.read_u16()?;
            let format = reader.read_u16()?;
            counts.push(ChannelCounts {
                phasors: reader.read_u16()?,
                analogs: reader.read_u16()?,
                digitals: reader.read_u16()?,
            });
            pmus.push(PmuConfig {
                stn,
                idcode,
                format,
                ..PmuConfig::default()
            });
        }

        for (pmu, count) in pmus.iter_mut().zip(&counts) {
            for _ in 0..count.phasors {
                pmu.phinfo.push(ChannelInfo::new(reader.read_name1()?, 0));
            }
        }
        for (pmu, count) in pmus.iter_mut().zip(&counts) {
            for _ in 0..count.analogs {
                pmu.aninfo.push(ChannelInfo::new(reader.read_name1()?, 0));
            }
        }
        for (pmu, count) in pmus.iter_mut().zip(&counts) {
            for _ in 0..count.digitals {
                let mut word = DigitalInfo::default();
                for name in word.nam.iter_mut() {
                    *name = reader.read_name1()?;
                }
                pmu.dginfo.push(word);
            }
        }

        for pmu in pmus.iter_mut() {
            for channel in pmu.phinfo.iter_mut() {
                channel.unit = reader.read_u32()?;
            }
        }
        for pmu in pmus.iter_mut() {
            for channel in pmu.aninfo.iter_mut() {
                channel.unit = reader.read_u32()?;
            }
        }
        for pmu in pmus.iter_mut() {
            for word in pmu.dginfo.iter_mut() {
                word.unit = reader.read_u32()?;
            }
        }

        for pmu in pmus.iter_mut() {
            pmu.fnom = reader.read_u16()?;
            pmu.cfgcnt = reader.read_u16()?;
        }

        let data_rate = reader.read_i16()?;

        Ok(Config {
            time_base,
            pmus,
            data_rate,
        })
    }

    /// Writes the configuration body in the same pass order `decode` reads it.
    ///
    /// Fails with `SizeMismatch` if a PMU or channel list does not fit its 16-bit count.
    pub fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_u32(self.time_base);
        writer.write_u16(wire_count("pmus", self.pmus.len())?);

        for pmu in &self.pmus {
            writer.write_name1(&pmu.stn);
            writer.write_u16(pmu.idcode);
            writer.write_u16(pmu.format);
            writer.write_u16(wire_count("phinfo", pmu.phinfo.len())?);
            writer.write_u16(wire_count("aninfo", pmu.aninfo.len())?);
            writer.write_u16(wire_count("dginfo", pmu.dginfo.len())?);
        }

        for channel in self.pmus.iter().flat_map(|pmu| &pmu.phinfo) {
            writer.write_name1(&channel.nam);
        }
        for channel in self.pmus.iter().flat_map(|pmu| &pmu.aninfo) {
            writer.write_name1(&channel.nam);
        }
        for word in self.pmus.iter().flat_map(|pmu| &pmu.dginfo) {
            for name in &word.nam {
                writer.write_name1(name);
            }
        }

        for channel in self.pmus.iter().flat_map(|pmu| &pmu.phinfo) {
            writer.write_u32(channel.unit);
        }
        for channel in self.pmus.iter().flat_map(|pmu| &pmu.aninfo) {
            writer.write_u32(channel.unit);
        }
        for word in self.pmus.iter().flat_map(|pmu| &pmu.dginfo) {
            writer.write_u32(word.unit);
        }

        for pmu in &self.pmus {
            writer.write_u16(pmu.fnom);
            writer.write_u16(pmu.cfgcnt);
        }

        writer.write_i16(self.data_rate);
        Ok(())
    }

    /// Body size of this configuration in bytes.
    pub fn encoded_size(&self) -> usize {
        6 + self
            .pmus
            .iter()
            .map(|pmu| {
                PMU_HEADER_SIZE
                    + NAME1_SIZE * (pmu.phinfo.len() + pmu.aninfo.len())
                    + NAME1_SIZE * DIGITAL_BITS * pmu.dginfo.len()
                    + 4 * (pmu.phinfo.len() + pmu.aninfo.len() + pmu.dginfo.len())
                    + 4
            })
            .sum::<usize>()
            + 2
    }

    /// Total FRAMESIZE of a data frame described by this configuration.
    pub fn data_frame_size(&self) -> usize {
        PREFIX_SIZE + self.pmus.iter().map(PmuConfig::data_size).sum::<usize>() + CHK_SIZE
    }

    pub fn find_pmu(&self, idcode: u16) -> Option<&PmuConfig> {
        self.pmus.iter().find(|pmu| pmu.idcode == idcode)
    }
}

/// Configuration frame 1: the PMU's reporting capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config1(pub Config);

/// Configuration frame 2: the layout of the data currently transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config2(pub Config);

macro_rules! config_wrapper {
    ($name:ident) => {
        impl Deref for $name {
            type Target = Config;

            fn deref(&self) -> &Config {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Config {
                &mut self.0
            }
        }

        impl From<Config> for $name {
            fn from(config: Config) -> Self {
                $name(config)
            }
        }

        impl From<$name> for Config {
            fn from(wrapper: $name) -> Config {
                wrapper.0
            }
        }
    };
}

config_wrapper!(Config1);
config_wrapper!(Config2);

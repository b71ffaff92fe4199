//! # IEEE C37.118 Data Frames
//!
//! Data frames carry one measurement sample per PMU. Their body has no self-describing
//! structure: the number of PMUs, the channel counts and the width of every value come
//! from the configuration frame received earlier on the same stream.
//!
//! ## Key Components
//!
//! - `Data`: A data frame body, one `PmuData` per configured PMU in schema order.
//! - `PmuData`: STAT, phasors, FREQ, DFREQ, analogs and digital words of one PMU.
//!
//! ## Usage
//!
//! Encoding validates the whole body against the schema before writing a single byte,
//! so a mismatched sample never produces partial output.

use super::common::{CodecError, Result};
use super::config::{Config, PmuConfig};
use super::cursor::{Reader, Writer};
use super::phasors::{
    check_analog, check_freq, check_phasor, decode_analog, decode_freq, decode_phasor,
    encode_analog, encode_freq, encode_phasor, Analog, Freq, Phasor,
};
use serde::{Deserialize, Serialize};

/// Measurements of a single PMU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmuData {
    pub stat: u16,
    pub phasor: Vec<Phasor>,
    pub freq: Freq,
    pub dfreq: Freq,
    pub analog: Vec<Analog>,
    pub digital: Vec<u16>,
}

impl PmuData {
    fn decode(reader: &mut Reader<'_>, pmu: &PmuConfig) -> Result<PmuData> {
        let stat = reader.read_u16()?;

        let mut phasor = Vec::with_capacity(pmu.phinfo.len());
        for _ in 0..pmu.phinfo.len() {
            phasor.push(decode_phasor(reader, pmu.format)?);
        }

        let freq = decode_freq(reader, pmu.format)?;
        let dfreq = decode_freq(reader, pmu.format)?;

        let mut analog = Vec::with_capacity(pmu.aninfo.len());
        for _ in 0..pmu.aninfo.len() {
            analog.push(decode_analog(reader, pmu.format)?);
        }

        let mut digital = Vec::with_capacity(pmu.dginfo.len());
        for _ in 0..pmu.dginfo.len() {
            digital.push(reader.read_u16()?);
        }

        Ok(PmuData {
            stat,
            phasor,
            freq,
            dfreq,
            analog,
            digital,
        })
    }

    /// Checks channel counts, then value notations, against one PMU's layout.
    fn validate(&self, pmu: &PmuConfig) -> Result<()> {
        let counts = [
            ("phasor", pmu.phinfo.len(), self.phasor.len()),
            ("analog", pmu.aninfo.len(), self.analog.len()),
            ("digital", pmu.dginfo.len(), self.digital.len()),
        ];
        for (field, expected, actual) in counts {
            if expected != actual {
                return Err(CodecError::SizeMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }

        for phasor in &self.phasor {
            check_phasor(phasor, pmu.format)?;
        }
        check_freq(&self.freq, pmu.format)?;
        check_freq(&self.dfreq, pmu.format)?;
        for analog in &self.analog {
            check_analog(analog, pmu.format)?;
        }
        Ok(())
    }

    fn encode(&self, writer: &mut Writer, pmu: &PmuConfig) -> Result<()> {
        writer.write_u16(self.stat);
        for phasor in &self.phasor {
            encode_phasor(writer, phasor, pmu.format)?;
        }
        encode_freq(writer, &self.freq, pmu.format)?;
        encode_freq(writer, &self.dfreq, pmu.format)?;
        for analog in &self.analog {
            encode_analog(writer, analog, pmu.format)?;
        }
        for &word in &self.digital {
            writer.write_u16(word);
        }
        Ok(())
    }
}

/// A data frame body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Data {
    pub pmus: Vec<PmuData>,
}

impl Data {
    /// Reads a data frame body laid out by `config`.
    ///
    /// # Parameters
    ///
    /// * `reader`: Cursor positioned after FRACSEC, bounded to the end of the body.
    /// * `config`: The schema of the stream.
    ///
    /// # Returns
    ///
    /// * `Ok(Data)`: One `PmuData` per PMU of `config`.
    /// * `Err(CodecError::Truncated)`: If the body is shorter than the schema requires.
    pub fn decode(reader: &mut Reader<'_>, config: &Config) -> Result<Data> {
        let mut pmus = Vec::with_capacity(config.pmus.len());
        for pmu in &config.pmus {
            pmus.push(PmuData::decode(reader, pmu)?);
        }
        Ok(Data { pmus })
    }

    /// Checks that this body can be written under `config`.
    ///
    /// # Returns
    ///
    /// * `Err(CodecError::SizeMismatch)`: If the PMU count or a PMU's phasor, analog or
    ///   digital count differs from the schema.
    /// * `Err(CodecError::FormatMismatch)`: If a value's notation differs from the one
    ///   selected by its PMU's FORMAT word.
    pub fn validate(&self, config: &Config) -> Result<()> {
        if self.pmus.len() != config.pmus.len() {
            return Err(CodecError::SizeMismatch {
                field: "pmus",
                expected: config.pmus.len(),
                actual: self.pmus.len(),
            });
        }
        for (data, pmu) in self.pmus.iter().zip(&config.pmus) {
            data.validate(pmu)?;
        }
        Ok(())
    }

    /// Writes the body laid out by `config`; nothing is written if validation fails.
    pub fn encode(&self, writer: &mut Writer, config: &Config) -> Result<()> {
        self.validate(config)?;
        for (data, pmu) in self.pmus.iter().zip(&config.pmus) {
            data.encode(writer, pmu)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ieee_c37_118::config::{ChannelInfo, DigitalInfo};
    use crate::ieee_c37_118::phasors::Number;

    fn station1() -> Config {
        Config {
            time_base: 1_000_000,
            pmus: vec![PmuConfig {
                stn: "STATION1".into(),
                idcode: 1,
                format: 0x0000,
                phinfo: vec![ChannelInfo::new("VA", 915_527)],
                ..PmuConfig::default()
            }],
            data_rate: 30,
        }
    }

    fn station1_sample() -> PmuData {
        PmuData {
            stat: 0,
            phasor: vec![Phasor::RectangularInt(1000, -500)],
            freq: Number::Int(5000),
            dfreq: Number::Int(0),
            analog: vec![],
            digital: vec![],
        }
    }

    #[test]
    fn test_encode_decode_station1_body() {
        let config = station1();
        let data = Data {
            pmus: vec![station1_sample()],
        };

        let mut writer = Writer::new();
        data.encode(&mut writer, &config).unwrap();
        assert_eq!(
            writer.as_slice(),
            &[0x00, 0x00, 0x03, 0xE8, 0xFE, 0x0C, 0x13, 0x88, 0x00, 0x00]
        );

        let mut reader = Reader::new(writer.as_slice());
        assert_eq!(Data::decode(&mut reader, &config).unwrap(), data);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_mixed_formats() {
        let config = Config {
            pmus: vec![
                PmuConfig {
                    idcode: 10,
                    format: 0x000F,
                    phinfo: vec![ChannelInfo::new("VA", 0)],
                    aninfo: vec![ChannelInfo::new("AN1", 0)],
                    ..PmuConfig::default()
                },
                PmuConfig {
                    idcode: 20,
                    format: 0x0001,
                    phinfo: vec![ChannelInfo::new("IA", 0)],
                    dginfo: vec![DigitalInfo::default()],
                    ..PmuConfig::default()
                },
            ],
            ..Config::default()
        };
        let data = Data {
            pmus: vec![
                PmuData {
                    stat: 0,
                    phasor: vec![Phasor::PolarFloat(230.0, 0.5)],
                    freq: Number::Float(50.01),
                    dfreq: Number::Float(-0.25),
                    analog: vec![Number::Float(12.5)],
                    digital: vec![],
                },
                PmuData {
                    stat: 0x0800,
                    phasor: vec![Phasor::PolarInt(1200, -15708)],
                    freq: Number::Int(-120),
                    dfreq: Number::Int(3),
                    analog: vec![],
                    digital: vec![0xA5A5],
                },
            ],
        };

        let mut writer = Writer::new();
        data.encode(&mut writer, &config).unwrap();
        assert_eq!(writer.len(), config.data_frame_size() - 16);

        let mut reader = Reader::new(writer.as_slice());
        assert_eq!(Data::decode(&mut reader, &config).unwrap(), data);
    }

    #[test]
    fn test_size_mismatch_writes_nothing() {
        let config = station1();
        let mut sample = station1_sample();
        sample.phasor.push(Phasor::RectangularInt(1, 1));
        let data = Data { pmus: vec![sample] };

        let mut writer = Writer::new();
        assert_eq!(
            data.encode(&mut writer, &config),
            Err(CodecError::SizeMismatch {
                field: "phasor",
                expected: 1,
                actual: 2
            })
        );
        assert!(writer.is_empty());

        let empty = Data::default();
        assert_eq!(
            empty.encode(&mut writer, &config),
            Err(CodecError::SizeMismatch {
                field: "pmus",
                expected: 1,
                actual: 0
            })
        );
        assert!(writer.is_empty());
    }

    #[test]
    fn test_digital_and_analog_counts_are_checked() {
        let config = station1();
        let mut sample = station1_sample();
        sample.digital.push(0xFFFF);
        let data = Data { pmus: vec![sample] };
        assert!(matches!(
            data.validate(&config),
            Err(CodecError::SizeMismatch { field: "digital", expected: 0, actual: 1 })
        ));

        let mut sample = station1_sample();
        sample.analog.push(Number::Int(1));
        let data = Data { pmus: vec![sample] };
        assert!(matches!(
            data.validate(&config),
            Err(CodecError::SizeMismatch { field: "analog", .. })
        ));
    }

    #[test]
    fn test_format_mismatch_writes_nothing() {
        let config = station1();
        let mut sample = station1_sample();
        sample.freq = Number::Float(60.0);
        let data = Data { pmus: vec![sample] };

        let mut writer = Writer::new();
        assert_eq!(
            data.encode(&mut writer, &config),
            Err(CodecError::FormatMismatch {
                expected: "Int",
                actual: "Float"
            })
        );
        assert!(writer.is_empty());
    }

    #[test]
    fn test_short_body_is_truncated() {
        let config = station1();
        let body = [0x00, 0x00, 0x03, 0xE8, 0xFE, 0x0C, 0x13, 0x88, 0x00];
        let mut reader = Reader::new(&body);
        assert!(matches!(
            Data::decode(&mut reader, &config),
            Err(CodecError::Truncated { needed: 2, remaining: 1 })
        ));
    }
}

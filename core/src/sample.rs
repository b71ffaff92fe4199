//! # Data Frame Samples
//!
//! This module flattens decoded data frames into per-PMU timestamped samples, the
//! representation consumed by downstream routing and storage stages. Values keep their
//! data frame order so that a sample can be matched with `value_names` of the same PMU.
//!
//! ## Key Components
//!
//! - `Sample`: One PMU's measurements at one instant.
//! - `SampleValue`: A complex phasor, a scalar or a digital status word.
//! - `samples_from_frame`: Maps a decoded data frame to one `Sample` per PMU.
//! - `value_names`: Column names of the values of a PMU's samples.

use crate::ieee_c37_118::config::{Config, PmuConfig};
use crate::ieee_c37_118::frame::{Frame, Message};
use crate::ieee_c37_118::phasors::Complex;
use crate::ieee_c37_118::utils::timestamp_ns;
use serde::{Deserialize, Serialize};

/// A single measured value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SampleValue {
    Complex(Complex),
    Float(f32),
    Digital(u16),
}

/// Measurements of one PMU at one instant.
///
/// `values` holds the phasors, FREQ, DFREQ, the analogs and then the digital words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub idcode: u16,
    pub stat: u16,
    /// Nanoseconds since the Unix epoch.
    pub timestamp_ns: i64,
    pub values: Vec<SampleValue>,
}

/// Maps a decoded data frame to one sample per PMU.
///
/// # Parameters
///
/// * `frame`: A frame returned by `Parser::deserialize`.
/// * `config`: The configuration the frame was decoded with.
///
/// # Returns
///
/// One `Sample` per PMU, in configuration order. Frames other than data frames, and
/// data frames decoded without a configuration, yield no samples.
pub fn samples_from_frame(frame: &Frame, config: &Config) -> Vec<Sample> {
    let data = match &frame.message {
        Some(Message::Data(data)) => data,
        _ => return Vec::new(),
    };
    let timestamp = timestamp_ns(frame.soc, frame.fracsec, config.time_base);

    data.pmus
        .iter()
        .zip(&config.pmus)
        .map(|(pmu_data, pmu)| {
            let mut values = Vec::with_capacity(
                pmu_data.phasor.len() + 2 + pmu_data.analog.len() + pmu_data.digital.len(),
            );
            values.extend(
                pmu_data
                    .phasor
                    .iter()
                    .map(|phasor| SampleValue::Complex(phasor.to_complex())),
            );
            values.push(SampleValue::Float(pmu_data.freq.to_float()));
            values.push(SampleValue::Float(pmu_data.dfreq.to_float()));
            values.extend(
                pmu_data
                    .analog
                    .iter()
                    .map(|analog| SampleValue::Float(analog.to_float())),
            );
            values.extend(pmu_data.digital.iter().copied().map(SampleValue::Digital));

            Sample {
                idcode: pmu.idcode,
                stat: pmu_data.stat,
                timestamp_ns: timestamp,
                values,
            }
        })
        .collect()
}

/// Column names of the values of a PMU's samples, as `station_idcode_channel`.
///
/// Digital words are named after their first bit.
pub fn value_names(pmu: &PmuConfig) -> Vec<String> {
    let column = |channel: &str| format!("{}_{}_{}", pmu.stn, pmu.idcode, channel);

    pmu.phinfo
        .iter()
        .map(|channel| column(&channel.nam))
        .chain([column("FREQ"), column("DFREQ")])
        .chain(pmu.aninfo.iter().map(|channel| column(&channel.nam)))
        .chain(pmu.dginfo.iter().map(|word| column(&word.nam[0])))
        .collect()
}

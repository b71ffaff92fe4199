//! # IEEE C37.118 Test Frame Generator
//!
//! This module generates random but schema-consistent configurations, data bodies and
//! data frames. Tests and benches use it to exercise the codec on layouts no fixture
//! covers: mixed FORMAT words, varying channel counts and many PMUs.
//!
//! ## Key Components
//!
//! - `random_config`: A `Config` with the requested number of PMUs, each with a random
//!   FORMAT word and channel counts.
//! - `random_data`: A `Data` body matching a given configuration.
//! - `random_frame`: A data `Frame` stamped with the current time.
//! - `random_station_name`, `random_channel_name`: Helpers for generating names.

use super::config::{ChannelInfo, Config, DigitalInfo, PmuConfig};
use super::data_frame::{Data, PmuData};
use super::frame::{Frame, Message};
use super::phasors::{Complex, Number, NumberNotation, Phasor};
use super::units::{AnalogUnits, MeasurementType, PhasorUnits};
use super::utils::now_soc_fracsec;
use rand::Rng;
use std::f32::consts::PI;

const DEFAULT_TIME_BASE: u32 = 1_000_000;
const DEFAULT_DATA_RATE: i16 = 30;

/// Generates a station name for a PMU (e.g., "STATION01").
pub fn random_station_name(index: usize) -> String {
    format!("STATION{:02}", index)
}

/// Generates a channel name for a measurement (e.g., "PH_01").
pub fn random_channel_name(prefix: &str, index: usize) -> String {
    format!("{}_{:02}", prefix, index)
}

fn random_pmu_config<R: Rng>(rng: &mut R, station_index: usize) -> PmuConfig {
    let format: u16 = rng.random_range(0..16);

    let phnmr = rng.random_range(1..=4);
    let annmr = rng.random_range(0..=3);
    let dgnmr = rng.random_range(0..=1);

    let phinfo = (0..phnmr)
        .map(|i| {
            // the last phasor of each station is a current
            let units = PhasorUnits {
                is_current: i + 1 == phnmr,
                scale_factor: if i + 1 == phnmr { 45_776 } else { 915_527 },
            };
            ChannelInfo::new(random_channel_name("PH", i), units.to_raw())
        })
        .collect();

    let aninfo = (0..annmr)
        .map(|i| {
            let units = AnalogUnits {
                measurement_type: MeasurementType::from_code(i as u8),
                scale_factor: 1,
            };
            ChannelInfo::new(random_channel_name("AN", i), units.to_raw())
        })
        .collect();

    let dginfo = (0..dgnmr)
        .map(|word| {
            let mut info = DigitalInfo {
                unit: 0x0000_FFFF,
                ..DigitalInfo::default()
            };
            for (bit, name) in info.nam.iter_mut().enumerate() {
                *name = random_channel_name("DG", word * 16 + bit);
            }
            info
        })
        .collect();

    PmuConfig {
        stn: random_station_name(station_index),
        idcode: (1000 + station_index) as u16,
        format,
        phinfo,
        aninfo,
        dginfo,
        fnom: rng.random_range(0..=1),
        cfgcnt: 0,
    }
}

/// Generates a random configuration for testing.
///
/// # Parameters
///
/// * `num_pmus`: Number of PMUs to describe.
///
/// # Returns
///
/// A `Config` with a 1 MHz time base, 30 frames per second and `num_pmus` PMUs whose
/// FORMAT words and channel counts are drawn at random.
pub fn random_config(num_pmus: usize) -> Config {
    let mut rng = rand::rng();
    Config {
        time_base: DEFAULT_TIME_BASE,
        pmus: (0..num_pmus)
            .map(|index| random_pmu_config(&mut rng, index))
            .collect(),
        data_rate: DEFAULT_DATA_RATE,
    }
}

fn random_number<R: Rng>(rng: &mut R, value: f32, notation: NumberNotation) -> Number {
    match notation {
        NumberNotation::Int => Number::Int(rng.random()),
        NumberNotation::Float => Number::Float(value),
    }
}

/// Generates random measurements matching one PMU's layout.
pub fn random_pmu_data(pmu: &PmuConfig) -> PmuData {
    let mut rng = rand::rng();

    let phasor = (0..pmu.phinfo.len())
        .map(|_| {
            let value = Complex::from_polar(
                rng.random_range(0.0..30_000.0),
                rng.random_range(-PI..PI),
            );
            Phasor::from_complex(value, pmu.phasor_notation())
        })
        .collect();

    // around 60 Hz with a small rate of change
    let freq_value = 60.0 + rng.random::<f32>() * 0.2 - 0.1;
    let dfreq_value = rng.random::<f32>() * 0.1 - 0.05;
    let freq = random_number(&mut rng, freq_value, pmu.freq_notation());
    let dfreq = random_number(&mut rng, dfreq_value, pmu.freq_notation());

    let analog = (0..pmu.aninfo.len())
        .map(|_| {
            let value = rng.random_range(-100.0..100.0);
            random_number(&mut rng, value, pmu.analog_notation())
        })
        .collect();

    let digital = (0..pmu.dginfo.len()).map(|_| rng.random()).collect();

    PmuData {
        stat: 0,
        phasor,
        freq,
        dfreq,
        analog,
        digital,
    }
}

/// Generates a random data body for `config`.
pub fn random_data(config: &Config) -> Data {
    Data {
        pmus: config.pmus.iter().map(random_pmu_data).collect(),
    }
}

/// Generates a random data frame for `config`, stamped with the current time.
pub fn random_frame(config: &Config, idcode: u16) -> Frame {
    let (soc, fracsec) = now_soc_fracsec(config.time_base);
    Frame::new(idcode, Message::Data(random_data(config))).with_time(soc, fracsec)
}

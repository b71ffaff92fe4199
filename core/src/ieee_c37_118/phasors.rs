//! # IEEE C37.118 Measurement Values
//!
//! Phasor, analog and frequency values in a data frame are not self-describing: their
//! width and meaning come from the FORMAT word of the owning PMU's configuration.
//!
//! ```text
//! FORMAT bit 0: phasor notation       0 = rectangular, 1 = polar
//! FORMAT bit 1: phasor width          0 = 16-bit int,  1 = 32-bit float
//! FORMAT bit 2: analog width          0 = 16-bit int,  1 = 32-bit float
//! FORMAT bit 3: FREQ/DFREQ width      0 = 16-bit int,  1 = 32-bit float
//! ```
//!
//! ## Key Components
//!
//! - `Phasor`: Tagged union over the four phasor notations.
//! - `Number`: Tagged union over integer and float values, aliased as `Analog` and `Freq`.
//! - `PhasorNotation`, `NumberNotation`: The notation selected by a FORMAT word.
//! - `notation`: Marker types for compile-time variant access (`get::<RectangularInt>()`).
//! - `decode_*` / `encode_*`: The schema-aware value codec used by data frames.

use super::common::{CodecError, Result};
use super::cursor::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// FORMAT bits selecting the phasor notation.
pub const FORMAT_PHASOR_MASK: u16 = 0x0003;
/// FORMAT bit selecting polar phasors.
pub const FORMAT_PHASOR_POLAR: u16 = 0x0001;
/// FORMAT bit selecting float phasors.
pub const FORMAT_PHASOR_FLOAT: u16 = 0x0002;
/// FORMAT bit selecting float analogs.
pub const FORMAT_ANALOG_FLOAT: u16 = 0x0004;
/// FORMAT bit selecting float FREQ/DFREQ.
pub const FORMAT_FREQ_FLOAT: u16 = 0x0008;

// Integer polar angles are transmitted in units of 10^-4 radian.
const INT_ANGLE_SCALE: f32 = 1.0e-4;

/// A complex value in rectangular form.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub fn new(re: f32, im: f32) -> Self {
        Complex { re, im }
    }

    /// Builds a complex value from magnitude and angle in radians.
    pub fn from_polar(magnitude: f32, angle: f32) -> Self {
        Complex {
            re: magnitude * angle.cos(),
            im: magnitude * angle.sin(),
        }
    }

    pub fn magnitude(&self) -> f32 {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    /// Angle in radians, in (-pi, pi].
    pub fn angle(&self) -> f32 {
        self.im.atan2(self.re)
    }
}

/// Enumerates the phasor notations a PMU can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhasorNotation {
    RectangularInt = 0,
    PolarInt = 1,
    RectangularFloat = 2,
    PolarFloat = 3,
}

impl PhasorNotation {
    /// Selects the notation from bits 1-0 of a FORMAT word.
    pub fn from_format(format: u16) -> Self {
        match format & FORMAT_PHASOR_MASK {
            0x0 => PhasorNotation::RectangularInt,
            0x1 => PhasorNotation::PolarInt,
            0x2 => PhasorNotation::RectangularFloat,
            _ => PhasorNotation::PolarFloat,
        }
    }

    /// The FORMAT bits encoding this notation.
    pub fn format_bits(self) -> u16 {
        self as u16
    }

    /// Bytes occupied by one phasor on the wire.
    pub fn size(self) -> usize {
        match self {
            PhasorNotation::RectangularInt | PhasorNotation::PolarInt => 4,
            PhasorNotation::RectangularFloat | PhasorNotation::PolarFloat => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PhasorNotation::RectangularInt => "RectangularInt",
            PhasorNotation::PolarInt => "PolarInt",
            PhasorNotation::RectangularFloat => "RectangularFloat",
            PhasorNotation::PolarFloat => "PolarFloat",
        }
    }
}

impl fmt::Display for PhasorNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Enumerates the notations of analog and frequency values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberNotation {
    Int,
    Float,
}

impl NumberNotation {
    /// Notation of analog values (FORMAT bit 2).
    pub fn analog_from_format(format: u16) -> Self {
        if format & FORMAT_ANALOG_FLOAT != 0 {
            NumberNotation::Float
        } else {
            NumberNotation::Int
        }
    }

    /// Notation of FREQ and DFREQ (FORMAT bit 3).
    pub fn freq_from_format(format: u16) -> Self {
        if format & FORMAT_FREQ_FLOAT != 0 {
            NumberNotation::Float
        } else {
            NumberNotation::Int
        }
    }

    /// Bytes occupied by one value on the wire.
    pub fn size(self) -> usize {
        match self {
            NumberNotation::Int => 2,
            NumberNotation::Float => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NumberNotation::Int => "Int",
            NumberNotation::Float => "Float",
        }
    }
}

impl fmt::Display for NumberNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A phasor measurement as transmitted.
///
/// Rectangular variants hold `(real, imaginary)`, polar variants hold
/// `(magnitude, angle)`. Integer polar angles are in 10^-4 radian, float polar angles
/// in radians. `to_complex` and `from_complex` apply that scale, so the raw i16 of a
/// `PolarInt` is not an angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phasor {
    RectangularInt(i16, i16),
    PolarInt(u16, i16),
    RectangularFloat(f32, f32),
    PolarFloat(f32, f32),
}

impl Phasor {
    pub fn notation(&self) -> PhasorNotation {
        match self {
            Phasor::RectangularInt(..) => PhasorNotation::RectangularInt,
            Phasor::PolarInt(..) => PhasorNotation::PolarInt,
            Phasor::RectangularFloat(..) => PhasorNotation::RectangularFloat,
            Phasor::PolarFloat(..) => PhasorNotation::PolarFloat,
        }
    }

    /// Converts the raw value to a complex number.
    ///
    /// Integer values are not scaled by PHUNIT; see `units::PhasorUnits` for that.
    pub fn to_complex(&self) -> Complex {
        match *self {
            Phasor::RectangularInt(real, imag) => Complex::new(real as f32, imag as f32),
            Phasor::PolarInt(magnitude, angle) => {
                Complex::from_polar(magnitude as f32, angle as f32 * INT_ANGLE_SCALE)
            }
            Phasor::RectangularFloat(real, imag) => Complex::new(real, imag),
            Phasor::PolarFloat(magnitude, angle) => Complex::from_polar(magnitude, angle),
        }
    }

    /// Builds a phasor of the given notation from a complex number.
    ///
    /// Integer notations round to the nearest representable value and saturate at the
    /// bounds of their field.
    pub fn from_complex(value: Complex, notation: PhasorNotation) -> Phasor {
        match notation {
            PhasorNotation::RectangularInt => {
                Phasor::RectangularInt(value.re.round() as i16, value.im.round() as i16)
            }
            PhasorNotation::PolarInt => Phasor::PolarInt(
                value.magnitude().round() as u16,
                (value.angle() / INT_ANGLE_SCALE).round() as i16,
            ),
            PhasorNotation::RectangularFloat => Phasor::RectangularFloat(value.re, value.im),
            PhasorNotation::PolarFloat => Phasor::PolarFloat(value.magnitude(), value.angle()),
        }
    }

    /// Returns the payload of variant `N`.
    ///
    /// ```
    /// use c37118_core::ieee_c37_118::phasors::{notation::RectangularInt, Phasor};
    ///
    /// let phasor = Phasor::RectangularInt(1000, -500);
    /// assert_eq!(phasor.get::<RectangularInt>().unwrap(), (1000, -500));
    /// ```
    pub fn get<N: PhasorForm>(&self) -> Result<N::Value> {
        N::extract(self).ok_or(CodecError::InvalidNotation {
            expected: N::NOTATION.name(),
            actual: self.notation().name(),
        })
    }

    /// Builds a phasor of variant `N`.
    pub fn make<N: PhasorForm>(value: N::Value) -> Phasor {
        N::wrap(value)
    }
}

/// A scalar measurement as transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i16),
    Float(f32),
}

/// Analog values share the `Number` representation.
pub type Analog = Number;

/// FREQ and DFREQ share the `Number` representation.
pub type Freq = Number;

impl Number {
    pub fn notation(&self) -> NumberNotation {
        match self {
            Number::Int(_) => NumberNotation::Int,
            Number::Float(_) => NumberNotation::Float,
        }
    }

    pub fn to_float(&self) -> f32 {
        match *self {
            Number::Int(value) => value as f32,
            Number::Float(value) => value,
        }
    }

    /// Builds a number of the given notation; integers round and saturate.
    pub fn from_float(value: f32, notation: NumberNotation) -> Number {
        match notation {
            NumberNotation::Int => Number::Int(value.round() as i16),
            NumberNotation::Float => Number::Float(value),
        }
    }

    /// Returns the payload of variant `N`.
    pub fn get<N: NumberForm>(&self) -> Result<N::Value> {
        N::extract(self).ok_or(CodecError::InvalidNotation {
            expected: N::NOTATION.name(),
            actual: self.notation().name(),
        })
    }

    pub fn make<N: NumberForm>(value: N::Value) -> Number {
        N::wrap(value)
    }
}

/// Compile-time selection of a `Phasor` variant.
pub trait PhasorForm {
    type Value;
    const NOTATION: PhasorNotation;

    fn extract(phasor: &Phasor) -> Option<Self::Value>;
    fn wrap(value: Self::Value) -> Phasor;
}

/// Compile-time selection of a `Number` variant.
pub trait NumberForm {
    type Value;
    const NOTATION: NumberNotation;

    fn extract(number: &Number) -> Option<Self::Value>;
    fn wrap(value: Self::Value) -> Number;
}

/// Marker types naming each variant, for use with `Phasor::get` and `Number::get`.
pub mod notation {
    use super::{Number, NumberForm, NumberNotation, Phasor, PhasorForm, PhasorNotation};

    macro_rules! phasor_form {
        ($name:ident, $first:ty, $second:ty) => {
            pub struct $name;

            impl PhasorForm for $name {
                type Value = ($first, $second);
                const NOTATION: PhasorNotation = PhasorNotation::$name;

                fn extract(phasor: &Phasor) -> Option<Self::Value> {
                    match *phasor {
                        Phasor::$name(first, second) => Some((first, second)),
                        _ => None,
                    }
                }

                fn wrap((first, second): Self::Value) -> Phasor {
                    Phasor::$name(first, second)
                }
            }
        };
    }

    phasor_form!(RectangularInt, i16, i16);
    phasor_form!(PolarInt, u16, i16);
    phasor_form!(RectangularFloat, f32, f32);
    phasor_form!(PolarFloat, f32, f32);

    macro_rules! number_form {
        ($name:ident, $ty:ty) => {
            pub struct $name;

            impl NumberForm for $name {
                type Value = $ty;
                const NOTATION: NumberNotation = NumberNotation::$name;

                fn extract(number: &Number) -> Option<$ty> {
                    match *number {
                        Number::$name(value) => Some(value),
                        _ => None,
                    }
                }

                fn wrap(value: $ty) -> Number {
                    Number::$name(value)
                }
            }
        };
    }

    number_form!(Int, i16);
    number_form!(Float, f32);
}

fn check_notation<T: fmt::Display + PartialEq + Copy>(
    required: T,
    actual: T,
    name: impl Fn(T) -> &'static str,
) -> Result<()> {
    if required != actual {
        return Err(CodecError::FormatMismatch {
            expected: name(required),
            actual: name(actual),
        });
    }
    Ok(())
}

/// Reads one phasor in the notation selected by `format`.
pub fn decode_phasor(reader: &mut Reader<'_>, format: u16) -> Result<Phasor> {
    let phasor = match PhasorNotation::from_format(format) {
        PhasorNotation::RectangularInt => {
            Phasor::RectangularInt(reader.read_i16()?, reader.read_i16()?)
        }
        PhasorNotation::PolarInt => Phasor::PolarInt(reader.read_u16()?, reader.read_i16()?),
        PhasorNotation::RectangularFloat => {
            Phasor::RectangularFloat(reader.read_f32()?, reader.read_f32()?)
        }
        PhasorNotation::PolarFloat => Phasor::PolarFloat(reader.read_f32()?, reader.read_f32()?),
    };
    Ok(phasor)
}

/// Checks that `value` can be written under `format` without writing anything.
pub fn check_phasor(value: &Phasor, format: u16) -> Result<()> {
    check_notation(
        PhasorNotation::from_format(format),
        value.notation(),
        PhasorNotation::name,
    )
}

/// Writes one phasor; its variant must match the notation selected by `format`.
pub fn encode_phasor(writer: &mut Writer, value: &Phasor, format: u16) -> Result<()> {
    check_phasor(value, format)?;
    match *value {
        Phasor::RectangularInt(real, imag) => {
            writer.write_i16(real);
            writer.write_i16(imag);
        }
        Phasor::PolarInt(magnitude, angle) => {
            writer.write_u16(magnitude);
            writer.write_i16(angle);
        }
        Phasor::RectangularFloat(first, second) | Phasor::PolarFloat(first, second) => {
            writer.write_f32(first);
            writer.write_f32(second);
        }
    }
    Ok(())
}

fn decode_number(reader: &mut Reader<'_>, notation: NumberNotation) -> Result<Number> {
    match notation {
        NumberNotation::Int => Ok(Number::Int(reader.read_i16()?)),
        NumberNotation::Float => Ok(Number::Float(reader.read_f32()?)),
    }
}

fn encode_number(writer: &mut Writer, value: &Number, notation: NumberNotation) -> Result<()> {
    check_notation(notation, value.notation(), NumberNotation::name)?;
    match *value {
        Number::Int(value) => writer.write_i16(value),
        Number::Float(value) => writer.write_f32(value),
    }
    Ok(())
}

/// Reads one analog value in the notation selected by `format`.
pub fn decode_analog(reader: &mut Reader<'_>, format: u16) -> Result<Analog> {
    decode_number(reader, NumberNotation::analog_from_format(format))
}

pub fn check_analog(value: &Analog, format: u16) -> Result<()> {
    check_notation(
        NumberNotation::analog_from_format(format),
        value.notation(),
        NumberNotation::name,
    )
}

/// Writes one analog value; its variant must match FORMAT bit 2.
pub fn encode_analog(writer: &mut Writer, value: &Analog, format: u16) -> Result<()> {
    encode_number(writer, value, NumberNotation::analog_from_format(format))
}

/// Reads FREQ or DFREQ in the notation selected by `format`.
pub fn decode_freq(reader: &mut Reader<'_>, format: u16) -> Result<Freq> {
    decode_number(reader, NumberNotation::freq_from_format(format))
}

pub fn check_freq(value: &Freq, format: u16) -> Result<()> {
    check_notation(
        NumberNotation::freq_from_format(format),
        value.notation(),
        NumberNotation::name,
    )
}

/// Writes FREQ or DFREQ; its variant must match FORMAT bit 3.
pub fn encode_freq(writer: &mut Writer, value: &Freq, format: u16) -> Result<()> {
    encode_number(writer, value, NumberNotation::freq_from_format(format))
}

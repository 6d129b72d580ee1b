//! Temperature sensor interface

pub mod ds1722;

use fixed::types::I28F4;

/// I28F4 is a fixed point number with 4 fractional bits and 28 integer bits.
/// This gives us a precision of 0.0625 degrees Celsius & a range of (-2^27, 2^27 - 0.0625).
pub type Temperature = I28F4;

pub trait Thermometer {
    type Error;

    /// Read the temperature in degrees Celsius
    fn read(&mut self) -> Result<Temperature, Self::Error>;
}

/// Contents of the temperature register pair.
///
/// The MSB holds the signed integer part, the top nibble of the LSB holds sixteenths of a
/// degree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTemperature {
    pub lsb: u8,
    pub msb: u8,
}

impl RawTemperature {
    /// Decodes the register pair.
    ///
    /// Negative readings are negated one byte at a time, each byte on its own, and the
    /// fraction of the negated LSB is then added to the negated integer part. For an LSB with
    /// a non-zero fraction this differs from reading the pair as one 12-bit two's complement
    /// number; decoding must stay byte-wise to match the device's format.
    pub fn decode(self) -> Temperature {
        let bits = if self.msb & 0x80 == 0 {
            (i32::from(self.msb) << 4) + i32::from(self.lsb >> 4)
        } else {
            let msb = self.msb.wrapping_neg();
            let lsb = self.lsb.wrapping_neg();
            -(i32::from(msb) << 4) + i32::from(lsb >> 4)
        };
        Temperature::from_bits(bits)
    }

    /// Decoded temperature in degrees Celsius
    pub fn to_celsius(self) -> f32 {
        self.decode().to_num()
    }
}

impl From<RawTemperature> for Temperature {
    fn from(raw: RawTemperature) -> Self {
        raw.decode()
    }
}

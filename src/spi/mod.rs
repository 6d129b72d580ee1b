//! Bus transport for the DS1722.
//!
//! Every register access is a single transaction: chip enable is raised, the address byte and
//! the data (or dummy) bytes are clocked out, and chip enable is dropped again.

mod error;

use embedded_hal::{
    blocking::spi::Transfer,
    digital::v2::OutputPin,
    spi::{Mode, MODE_1},
};
use fugit::HertzU32;

pub use self::error::*;

/// SPI mode the DS1722 expects: clock idles low, data is sampled on the trailing edge.
///
/// Bytes are sent most significant bit first.
pub const MODE: Mode = MODE_1;

/// Highest SCLK rate the DS1722 is driven at.
pub const CLOCK: HertzU32 = HertzU32::MHz(4);

/// Something that can run a select-bracketed exchange of bytes with the device.
pub trait Transport {
    type Error;

    /// Select the device, exchange every byte of `buf` in place, then deselect the device.
    ///
    /// The bytes clocked in from the device replace the bytes clocked out. Implementations
    /// must perform exactly one select/deselect bracket per call.
    fn transaction(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;
}

/// [`Transport`] over an `embedded-hal` SPI bus and a chip enable pin.
///
/// The DS1722 chip enable is active high: the device is selected while the pin is high.
pub struct SpiBus<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiBus<SPI, CS>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
{
    /// Takes ownership of the bus and chip enable line, leaving the device deselected.
    pub fn new(spi: SPI, cs: CS) -> Result<Self, SPI::Error, CS::Error> {
        let mut bus = Self { spi, cs };
        bus.deselect()?;
        Ok(bus)
    }

    /// Gives back the bus and chip enable line.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    fn select(&mut self) -> Result<(), SPI::Error, CS::Error> {
        self.cs.set_high().map_err(Error::Pin)
    }

    fn deselect(&mut self) -> Result<(), SPI::Error, CS::Error> {
        self.cs.set_low().map_err(Error::Pin)
    }
}

impl<SPI, CS> Transport for SpiBus<SPI, CS>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
{
    type Error = Error<SPI::Error, CS::Error>;

    fn transaction(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        self.select()?;

        let exchanged = self.spi.transfer(buf).map(|_| ()).map_err(Error::Spi);

        // Always release the device, but report the exchange failure first
        let released = self.deselect();
        exchanged.and(released)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn transaction(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        T::transaction(self, buf)
    }
}

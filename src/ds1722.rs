//! Implementation for the DS1722 temperature sensor.

use fugit::MillisDurationU32;

use crate::{
    config::{Configuration, MASK_RESOLUTION, MASK_SHUTDOWN},
    spi::Transport,
    thermometer::{RawTemperature, Temperature},
};

/// Byte clocked out while the device answers a read.
pub const DUMMY: u8 = 0xFF;

/// Register addresses. Reads and writes of the configuration register use different
/// addresses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    ReadConfiguration = 0x00,
    TemperatureLsb = 0x01,
    TemperatureMsb = 0x02,
    WriteConfiguration = 0x80,
}

impl Register {
    #[inline]
    pub const fn address(self) -> u8 {
        self as u8
    }
}

/// Outcome of a conditional configuration write.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Change {
    /// The register was rewritten
    Changed,
    /// The device already held the requested value, nothing was written
    Unchanged,
}

impl Change {
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Outcome of [`Ds1722::request_conversion`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// A one-shot conversion was started
    Accepted,
    /// The device is converting continuously, nothing was written
    Rejected,
}

impl Trigger {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Conversion mode, held in the shutdown bit of the configuration register.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// The device converts back to back on its own
    Continuous,
    /// The device sleeps until a conversion is requested
    OneShot,
}

impl Mode {
    pub(crate) const fn from_config_register(reg: u8) -> Self {
        if reg & MASK_SHUTDOWN == 0 {
            Self::Continuous
        } else {
            Self::OneShot
        }
    }

    pub(crate) const fn to_config_register(self) -> u8 {
        match self {
            Self::Continuous => 0,
            Self::OneShot => MASK_SHUTDOWN,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    Bits8,
    Bits9,
    Bits10,
    Bits11,
    Bits12,
}

impl Resolution {
    /// Decodes the resolution field, `None` if it holds none of the five defined codes.
    pub(crate) const fn from_config_register(reg: u8) -> Option<Self> {
        match reg & MASK_RESOLUTION {
            0x0 => Some(Self::Bits8),
            0x2 => Some(Self::Bits9),
            0x4 => Some(Self::Bits10),
            0x6 => Some(Self::Bits11),
            0x8 => Some(Self::Bits12),
            _ => None,
        }
    }

    pub(crate) const fn to_config_register(self) -> u8 {
        match self {
            Self::Bits8 => 0x0,
            Self::Bits9 => 0x2,
            Self::Bits10 => 0x4,
            Self::Bits11 => 0x6,
            Self::Bits12 => 0x8,
        }
    }

    /// Picks the resolution for a bit depth, pulling anything outside 8..=12 to the nearest
    /// bound.
    pub const fn from_bits_clamped(bits: u8) -> Self {
        match bits {
            0..=8 => Self::Bits8,
            9 => Self::Bits9,
            10 => Self::Bits10,
            11 => Self::Bits11,
            _ => Self::Bits12,
        }
    }

    /// Number of bits of conversion precision
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits9 => 9,
            Self::Bits10 => 10,
            Self::Bits11 => 11,
            Self::Bits12 => 12,
        }
    }

    /// Returns the maximum conversion time
    pub const fn conversion_time(self) -> MillisDurationU32 {
        match self {
            Self::Bits8 => MillisDurationU32::millis(75),
            Self::Bits9 => MillisDurationU32::millis(150),
            Self::Bits10 => MillisDurationU32::millis(300),
            Self::Bits11 => MillisDurationU32::millis(600),
            Self::Bits12 => MillisDurationU32::millis(1200),
        }
    }
}

/// DS1722 driver.
///
/// Nothing is cached: every query reads the chip again, and every configuration change is a
/// read-modify-write of the configuration register. Operations are not atomic with respect
/// to anything else touching the bus; callers sharing a bus must lock around whole
/// operations.
#[derive(Debug)]
pub struct Ds1722<T> {
    bus: T,
}

impl<T: Transport> Ds1722<T> {
    #[inline]
    pub const fn new(bus: T) -> Self {
        Self { bus }
    }

    /// Gives back the transport.
    pub fn release(self) -> T {
        self.bus
    }

    /// Reads a single register.
    ///
    /// An absent device yields whatever the data line floats to; there is no acknowledge to
    /// detect it by. Only read addresses may be passed: clocking out a write address here
    /// would write the dummy byte.
    fn read_register(&mut self, register: Register) -> Result<u8, T::Error> {
        let mut buf = [register.address(), DUMMY];
        self.bus.transaction(&mut buf)?;
        trace!("read {:?} = {:#x}", register, buf[1]);
        Ok(buf[1])
    }

    /// Writes a single register.
    fn write_register(&mut self, register: Register, value: u8) -> Result<(), T::Error> {
        let mut buf = [register.address(), value];
        trace!("write {:?} = {:#x}", register, value);
        self.bus.transaction(&mut buf)
    }

    /// Reads the configuration register
    pub fn configuration(&mut self) -> Result<Configuration, T::Error> {
        self.read_register(Register::ReadConfiguration)
            .map(Configuration::from_register)
    }

    fn write_configuration(&mut self, config: Configuration) -> Result<(), T::Error> {
        self.write_register(Register::WriteConfiguration, config.to_register())
    }

    /// Read-modify-write of the configuration register. Always writes.
    ///
    /// Bits `modify` leaves alone are written back exactly as read.
    pub fn modify_configuration<F: FnOnce(&mut Configuration)>(
        &mut self,
        modify: F,
    ) -> Result<Configuration, T::Error> {
        let mut config = self.configuration()?;
        modify(&mut config);
        self.write_configuration(config)?;
        Ok(config)
    }

    /// Read-modify-write that skips the write when `modify` reports no change.
    fn update_configuration<F: FnOnce(&mut Configuration) -> bool>(
        &mut self,
        modify: F,
    ) -> Result<Change, T::Error> {
        let mut config = self.configuration()?;
        if !modify(&mut config) {
            return Ok(Change::Unchanged);
        }
        self.write_configuration(config)?;
        Ok(Change::Changed)
    }

    /// Retrieves the resolution of the sensor
    ///
    /// `None` means the resolution field held an undefined code, which only happens on a
    /// corrupted or misread register.
    pub fn resolution(&mut self) -> Result<Option<Resolution>, T::Error> {
        let resolution = self.configuration()?.resolution();
        if resolution.is_none() {
            warn!("undefined resolution code");
        }
        Ok(resolution)
    }

    /// Sets the resolution of the sensor, clamping `bits` to 8..=12
    ///
    /// Costs one configuration read, plus one write when the resolution differs.
    pub fn set_resolution(&mut self, bits: u8) -> Result<Change, T::Error> {
        let resolution = Resolution::from_bits_clamped(bits);

        let change = self.update_configuration(|config| {
            if config.resolution() == Some(resolution) {
                return false;
            }
            config.set_resolution(resolution);
            true
        })?;

        debug!("resolution {} bits: {:?}", resolution.bits(), change);
        Ok(change)
    }

    /// Retrieves the conversion mode
    pub fn mode(&mut self) -> Result<Mode, T::Error> {
        Ok(self.configuration()?.mode())
    }

    /// Sets the conversion mode
    pub fn set_mode(&mut self, mode: Mode) -> Result<Change, T::Error> {
        let change = self.update_configuration(|config| {
            if config.mode() == mode {
                return false;
            }
            config.set_mode(mode);
            true
        })?;

        debug!("mode {:?}: {:?}", mode, change);
        Ok(change)
    }

    /// Starts a one-shot temperature conversion
    ///
    /// Rejected while the device converts continuously. This does not wait: the result is
    /// available after [`Resolution::conversion_time`].
    pub fn request_conversion(&mut self) -> Result<Trigger, T::Error> {
        let change = self.update_configuration(|config| {
            if config.mode() == Mode::Continuous {
                return false;
            }
            config.trigger_one_shot();
            true
        })?;

        let trigger = if change.is_changed() {
            Trigger::Accepted
        } else {
            Trigger::Rejected
        };
        debug!("conversion request: {:?}", trigger);
        Ok(trigger)
    }

    /// Reads both temperature registers in one transaction, LSB first.
    pub fn read_raw_temperature(&mut self) -> Result<RawTemperature, T::Error> {
        let mut buf = [Register::TemperatureLsb.address(), DUMMY, DUMMY];
        self.bus.transaction(&mut buf)?;
        Ok(RawTemperature {
            lsb: buf[1],
            msb: buf[2],
        })
    }

    /// Reads the temperature data from the sensor
    pub fn read_temperature(&mut self) -> Result<Temperature, T::Error> {
        let temp = Temperature::from(self.read_raw_temperature()?);
        trace!("temperature: {}", temp.to_num::<f32>());
        Ok(temp)
    }

    /// Reads the temperature in degrees Celsius
    ///
    /// No range check is made: values far outside -55..=125 point at a wiring fault.
    pub fn temperature(&mut self) -> Result<f32, T::Error> {
        Ok(self.read_temperature()?.to_num())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeDs1722;

    fn sensor(config: u8) -> Ds1722<FakeDs1722> {
        Ds1722::new(FakeDs1722::new(config))
    }

    #[test]
    fn register_access_is_one_transaction() {
        let mut ds = sensor(0b1110_0100);

        assert_eq!(ds.read_register(Register::ReadConfiguration).unwrap(), 0b1110_0100);
        assert_eq!(ds.bus.transactions(), 1);

        ds.write_register(Register::WriteConfiguration, 0b1110_0000).unwrap();
        assert_eq!(ds.bus.transactions(), 2);
        assert_eq!(ds.bus.config(), 0b1110_0000);
    }

    #[test]
    fn reads_never_write() {
        let mut ds = sensor(0b0000_0100);

        ds.configuration().unwrap();
        ds.resolution().unwrap();
        ds.mode().unwrap();
        ds.read_temperature().unwrap();

        assert_eq!(ds.bus.writes(), 0);
        assert_eq!(ds.bus.transactions(), 4);
        assert_eq!(ds.bus.config(), 0b0000_0100);
    }

    #[test]
    fn modify_configuration_always_writes() {
        let mut ds = sensor(0b1010_0110);

        let config = ds.modify_configuration(|_| {}).unwrap();
        assert_eq!(config.to_register(), 0b1010_0110);
        assert_eq!(ds.bus.writes(), 1);
        assert_eq!(ds.bus.last_write(), Some(0b1010_0110));

        ds.modify_configuration(|config| {
            config.set_mode(Mode::OneShot);
        })
        .unwrap();
        assert_eq!(ds.bus.writes(), 2);
        assert_eq!(ds.bus.config(), 0b1010_0111);
    }

    #[test]
    fn borrowed_transport() {
        let mut fake = FakeDs1722::new(0b1110_0000);

        {
            let mut ds = Ds1722::new(&mut fake);
            assert_eq!(ds.set_mode(Mode::OneShot).unwrap(), Change::Changed);
            assert!(ds.request_conversion().unwrap().is_accepted());
        }

        assert_eq!(fake.config(), 0b1110_0001);
        assert_eq!(fake.conversions(), 1);
        assert_eq!(fake.transactions(), 4);
    }

    #[test]
    fn resolution_round_trip() {
        let mut ds = sensor(0b1110_0000);

        for bits in 8..=12 {
            ds.set_resolution(bits).unwrap();
            assert_eq!(ds.resolution().unwrap().map(Resolution::bits), Some(bits));
        }
    }

    #[test]
    fn resolution_is_clamped() {
        let mut ds = sensor(0b1110_0000);

        assert_eq!(ds.set_resolution(20).unwrap(), Change::Changed);
        assert_eq!(ds.resolution().unwrap(), Some(Resolution::Bits12));
        assert_eq!(ds.bus.config() & MASK_RESOLUTION, 0x8);

        assert_eq!(ds.set_resolution(0).unwrap(), Change::Changed);
        assert_eq!(ds.resolution().unwrap(), Some(Resolution::Bits8));
        assert_eq!(ds.bus.config() & MASK_RESOLUTION, 0x0);
    }

    #[test]
    fn same_resolution_is_not_written() {
        let mut ds = sensor(0b1110_0000);

        assert_eq!(ds.set_resolution(11).unwrap(), Change::Changed);
        let writes = ds.bus.writes();

        assert_eq!(ds.set_resolution(11).unwrap(), Change::Unchanged);
        assert_eq!(ds.bus.writes(), writes);
    }

    #[test]
    fn undefined_resolution_code() {
        let mut ds = sensor(0b0000_1010);
        assert_eq!(ds.resolution().unwrap(), None);

        // An undefined code never equals the target, so it is always rewritten
        assert_eq!(ds.set_resolution(12).unwrap(), Change::Changed);
        assert_eq!(ds.resolution().unwrap(), Some(Resolution::Bits12));
    }

    #[test]
    fn mode_toggle() {
        let mut ds = sensor(0b1110_1000);
        assert_eq!(ds.mode().unwrap(), Mode::Continuous);

        assert_eq!(ds.set_mode(Mode::OneShot).unwrap(), Change::Changed);
        assert_eq!(ds.mode().unwrap(), Mode::OneShot);
        assert_eq!(ds.set_mode(Mode::OneShot).unwrap(), Change::Unchanged);

        assert_eq!(ds.set_mode(Mode::Continuous).unwrap(), Change::Changed);
        assert_eq!(ds.mode().unwrap(), Mode::Continuous);
        assert_eq!(ds.set_mode(Mode::Continuous).unwrap(), Change::Unchanged);

        assert_eq!(ds.bus.writes(), 2);
        assert_eq!(ds.bus.config(), 0b1110_1000);
    }

    #[test]
    fn conversion_rejected_in_continuous_mode() {
        let mut ds = sensor(0b1110_1000);

        assert_eq!(ds.request_conversion().unwrap(), Trigger::Rejected);
        assert_eq!(ds.bus.writes(), 0);
        assert_eq!(ds.bus.conversions(), 0);
    }

    #[test]
    fn conversion_accepted_in_one_shot_mode() {
        let mut ds = sensor(0b1110_0111);
        ds.bus.set_temperature(RawTemperature {
            lsb: 0x40,
            msb: 0x19,
        });

        assert_eq!(ds.request_conversion().unwrap(), Trigger::Accepted);
        assert_eq!(ds.bus.last_write(), Some(0b1111_0111));
        assert_eq!(ds.bus.conversions(), 1);

        // The trigger bit clears itself once the conversion is done
        assert_eq!(ds.bus.config(), 0b1110_0111);
        assert!((ds.temperature().unwrap() - 25.25).abs() < f32::EPSILON);
    }

    #[test]
    fn reserved_bits_survive() {
        for reserved in [0b0000_0000, 0b1010_0000, 0b0100_0000, 0b1110_0000] {
            let mut ds = sensor(reserved);

            ds.set_resolution(10).unwrap();
            assert_eq!(ds.bus.config() & 0xE0, reserved);

            ds.set_mode(Mode::OneShot).unwrap();
            assert_eq!(ds.bus.config() & 0xE0, reserved);

            ds.request_conversion().unwrap();
            assert_eq!(ds.bus.last_write().map(|b| b & 0xE0), Some(reserved));
            assert_eq!(ds.bus.config(), reserved | 0x4 | 0x1);
        }
    }

    #[test]
    fn temperature_read_is_one_transaction() {
        let mut ds = sensor(0);
        ds.bus.set_temperature(RawTemperature {
            lsb: 0x00,
            msb: 0xE7,
        });

        assert_eq!(ds.temperature().unwrap(), -25.0);
        assert_eq!(ds.bus.transactions(), 1);
    }

    #[test]
    fn clamping() {
        assert_eq!(Resolution::from_bits_clamped(0), Resolution::Bits8);
        assert_eq!(Resolution::from_bits_clamped(9), Resolution::Bits9);
        assert_eq!(Resolution::from_bits_clamped(13), Resolution::Bits12);
        assert_eq!(Resolution::from_bits_clamped(u8::MAX), Resolution::Bits12);
    }

    #[test]
    fn conversion_times() {
        assert_eq!(Resolution::Bits8.conversion_time().to_millis(), 75);
        assert_eq!(Resolution::Bits12.conversion_time().to_millis(), 1200);
    }
}

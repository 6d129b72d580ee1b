use embedded_hal::blocking::delay::DelayMs;

use crate::{
    ds1722::{Ds1722, Mode, Resolution},
    spi::Transport,
    thermometer::{Temperature, Thermometer},
};

/// [`Thermometer`] over a DS1722 that takes care of conversion timing.
///
/// In one-shot mode every read requests a conversion and blocks for the worst-case
/// conversion time of the active resolution before reading the result.
pub struct Ds1722Thermometer<T, D> {
    sensor: Ds1722<T>,
    delay: D,
}

impl<T: Transport, D: DelayMs<u32>> Ds1722Thermometer<T, D> {
    pub const fn new(sensor: Ds1722<T>, delay: D) -> Self {
        Self { sensor, delay }
    }

    pub fn sensor(&self) -> &Ds1722<T> {
        &self.sensor
    }
    pub fn sensor_mut(&mut self) -> &mut Ds1722<T> {
        &mut self.sensor
    }

    pub fn release(self) -> (Ds1722<T>, D) {
        (self.sensor, self.delay)
    }

    /// Puts the device into `mode` at `bits` resolution (clamped to 8..=12)
    pub fn configure(&mut self, mode: Mode, bits: u8) -> Result<(), T::Error> {
        self.sensor.set_resolution(bits)?;
        self.sensor.set_mode(mode)?;
        Ok(())
    }
}

impl<T: Transport, D: DelayMs<u32>> Thermometer for Ds1722Thermometer<T, D> {
    type Error = T::Error;

    fn read(&mut self) -> Result<Temperature, Self::Error> {
        // Undefined resolution codes get the longest wait
        let resolution = self.sensor.resolution()?.unwrap_or(Resolution::Bits12);

        if self.sensor.request_conversion()?.is_accepted() {
            // Wait for conversion to complete
            self.delay.delay_ms(resolution.conversion_time().to_millis());
        }

        self.sensor.read_temperature()
    }
}

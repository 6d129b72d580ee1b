//! Simulated DS1722 for testing without hardware.

use core::convert::Infallible;

use crate::{
    config::{MASK_ONE_SHOT, MASK_SHUTDOWN},
    ds1722::Register,
    spi::Transport,
    thermometer::RawTemperature,
};

/// In-memory register file that answers transactions the way the chip does.
///
/// Reads auto-increment through the registers, writes land only in the configuration
/// register. Setting the one-shot bit completes a conversion immediately: the preset
/// temperature is latched into the temperature registers and the bit clears itself.
#[derive(Debug, Clone)]
pub struct FakeDs1722 {
    config: u8,
    temperature: RawTemperature,
    latched: RawTemperature,
    transactions: u32,
    writes: u32,
    conversions: u32,
    last_write: Option<u8>,
}

impl FakeDs1722 {
    pub const fn new(config: u8) -> Self {
        let zero = RawTemperature { lsb: 0, msb: 0 };
        Self {
            config,
            temperature: zero,
            latched: zero,
            transactions: 0,
            writes: 0,
            conversions: 0,
            last_write: None,
        }
    }

    /// Sets the temperature the next conversion produces.
    ///
    /// While the device is converting continuously it shows up at once.
    pub fn set_temperature(&mut self, temperature: RawTemperature) {
        self.temperature = temperature;
        if self.config & MASK_SHUTDOWN == 0 {
            self.latched = temperature;
        }
    }

    pub const fn config(&self) -> u8 {
        self.config
    }
    pub const fn transactions(&self) -> u32 {
        self.transactions
    }
    pub const fn writes(&self) -> u32 {
        self.writes
    }
    pub const fn conversions(&self) -> u32 {
        self.conversions
    }
    /// The last byte written to the configuration register, before any self-clearing
    pub const fn last_write(&self) -> Option<u8> {
        self.last_write
    }

    fn register(&self, address: u8) -> u8 {
        match address {
            a if a == Register::ReadConfiguration.address() => self.config,
            a if a == Register::TemperatureLsb.address() => self.latched.lsb,
            a if a == Register::TemperatureMsb.address() => self.latched.msb,
            _ => 0xFF,
        }
    }

    fn write_config(&mut self, value: u8) {
        self.writes += 1;
        self.last_write = Some(value);

        if value & MASK_ONE_SHOT == 0 {
            self.config = value;
        } else {
            self.conversions += 1;
            self.latched = self.temperature;
            self.config = value & !MASK_ONE_SHOT;
        }
    }
}

impl Transport for FakeDs1722 {
    type Error = Infallible;

    fn transaction(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.transactions += 1;

        let Some((&mut address, data)) = buf.split_first_mut() else {
            return Ok(());
        };

        if address == Register::WriteConfiguration.address() {
            if let Some(&value) = data.first() {
                self.write_config(value);
            }
        } else {
            for (offset, byte) in (0u8..).zip(data.iter_mut()) {
                *byte = self.register(address.wrapping_add(offset));
            }
        }

        Ok(())
    }
}

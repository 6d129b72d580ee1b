//! Configuration register layout.
//!
//! ```text
//!   7   6   5   4      3   2   1     0
//! | reserved  | 1SHOT | R2  R1  R0 | SD |
//! ```

use static_assertions::const_assert_eq;

use crate::ds1722::{Mode, Resolution};

/// Shutdown bit, set while the device is in one-shot mode
pub const MASK_SHUTDOWN: u8 = 0x01;
/// Resolution code
pub const MASK_RESOLUTION: u8 = 0x0E;
/// One-shot conversion trigger, cleared by the device when the conversion ends
pub const MASK_ONE_SHOT: u8 = 0x10;
/// Bits the driver never changes
pub const MASK_RESERVED: u8 = !(MASK_SHUTDOWN | MASK_RESOLUTION | MASK_ONE_SHOT);

const_assert_eq!(MASK_SHUTDOWN & MASK_RESOLUTION, 0);
const_assert_eq!((MASK_SHUTDOWN | MASK_RESOLUTION) & MASK_ONE_SHOT, 0);
const_assert_eq!(MASK_RESERVED, 0xE0);

/// Unpacked configuration register.
///
/// The resolution field is kept as its raw code so that undefined codes survive a
/// read-modify-write untouched.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    mode: Mode,
    resolution: u8,
    one_shot: bool,
    reserved: u8,
}

impl Configuration {
    pub const fn from_register(reg: u8) -> Self {
        Self {
            mode: Mode::from_config_register(reg),
            resolution: reg & MASK_RESOLUTION,
            one_shot: reg & MASK_ONE_SHOT != 0,
            reserved: reg & MASK_RESERVED,
        }
    }

    pub const fn to_register(self) -> u8 {
        let one_shot = if self.one_shot { MASK_ONE_SHOT } else { 0 };
        self.mode.to_config_register() | self.resolution | one_shot | self.reserved
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// `None` if the field holds an undefined code
    pub const fn resolution(&self) -> Option<Resolution> {
        Resolution::from_config_register(self.resolution)
    }

    pub fn set_resolution(&mut self, resolution: Resolution) -> &mut Self {
        self.resolution = resolution.to_config_register();
        self
    }

    /// Whether a one-shot conversion is still in progress
    pub const fn one_shot(&self) -> bool {
        self.one_shot
    }

    pub fn trigger_one_shot(&mut self) -> &mut Self {
        self.one_shot = true;
        self
    }

    pub const fn reserved(&self) -> u8 {
        self.reserved
    }
}

impl From<u8> for Configuration {
    fn from(reg: u8) -> Self {
        Self::from_register(reg)
    }
}

impl From<Configuration> for u8 {
    fn from(config: Configuration) -> Self {
        config.to_register()
    }
}

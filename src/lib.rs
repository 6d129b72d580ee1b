//! Driver for the Maxim DS1722 digital thermometer over SPI.
//!
//! The chip exposes one configuration register and a pair of temperature registers. This
//! crate maps typed operations (resolution, conversion mode, one-shot conversion requests,
//! temperature reads) onto single-transaction register accesses over an `embedded-hal` SPI
//! bus and an active-high chip enable pin.
//!
//! ```no_run
//! # fn demo<SPI, CS>(spi: SPI, cs: CS)
//! # where SPI: embedded_hal::blocking::spi::Transfer<u8>, CS: embedded_hal::digital::v2::OutputPin,
//! #       SPI::Error: core::fmt::Debug, CS::Error: core::fmt::Debug {
//! use ds1722::{Ds1722, Mode, SpiBus};
//!
//! let mut sensor = Ds1722::new(SpiBus::new(spi, cs).unwrap());
//! sensor.set_resolution(12).unwrap();
//! sensor.set_mode(Mode::Continuous).unwrap();
//! let celsius = sensor.temperature().unwrap();
//! # }
//! ```
//!
//! ## Features
//!
//! - `defmt`: log over `defmt` and derive `defmt::Format` on public types.
//! - `log`: log over the `log` facade.
//! - `fake`: expose [`fake::FakeDs1722`], a simulated device.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod config;
pub mod ds1722;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod spi;
pub mod thermometer;

pub use crate::{
    config::Configuration,
    ds1722::{Change, Ds1722, Mode, Register, Resolution, Trigger},
    spi::{SpiBus, Transport},
    thermometer::{ds1722::Ds1722Thermometer, RawTemperature, Temperature, Thermometer},
};

use core::fmt;

pub type Result<T, S, P> = core::result::Result<T, Error<S, P>>;

/// Errors raised by the bus while talking to the device.
///
/// The DS1722 itself never acknowledges anything, so these only ever come from the HAL.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<S, P> {
    /// The SPI peripheral failed to exchange bytes
    Spi(S),

    /// The chip select line could not be driven
    Pin(P),
}

impl<S, P> Error<S, P> {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spi(_) => "SPI error",
            Self::Pin(_) => "Chip select error",
        }
    }
}

impl<S, P> fmt::Display for Error<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

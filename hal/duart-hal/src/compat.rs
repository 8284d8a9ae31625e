//! Adapters over `embedded-hal` 1.0 bus implementations
//!
//! Platform HALs that already expose the blocking `embedded-hal` traits
//! plug into the duart stack through these newtype wrappers instead of a
//! bespoke [`I2cBus`]/[`SpiBus`] implementation.
//!
//! Enabled with the `embedded-hal` feature.

use crate::i2c::I2cBus;
use crate::spi::SpiBus;

/// Wraps an [`embedded_hal::i2c::I2c`] implementation as an [`I2cBus`]
pub struct EhI2c<T>(pub T);

impl<T> EhI2c<T> {
    /// Wrap an embedded-hal I2C master
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Return the wrapped bus
    pub fn release(self) -> T {
        self.0
    }
}

impl<T> I2cBus for EhI2c<T>
where
    T: embedded_hal::i2c::I2c,
{
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.0.write_read(address, write_data, read_buf)
    }
}

/// Wraps an [`embedded_hal::spi::SpiDevice`] implementation as a [`SpiBus`]
///
/// `SpiDevice` (not `SpiBus`) is required because register transactions
/// need chip-select framing per call.
pub struct EhSpi<T>(pub T);

impl<T> EhSpi<T> {
    /// Wrap an embedded-hal SPI device
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Return the wrapped device
    pub fn release(self) -> T {
        self.0
    }
}

impl<T> SpiBus for EhSpi<T>
where
    T: embedded_hal::spi::SpiDevice,
{
    type Error = T::Error;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.0.transfer(read, write)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(buf)
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        self.0.transfer_in_place(data)
    }
}

//! Register-addressed bus seam for UART bridge chips
//!
//! The bridge chip does not expose a memory map; it exposes *registers*
//! reached through a bit-packed transaction address. [`RegisterBus`] is
//! that contract: read or write N bytes at one transaction address, as a
//! single atomic bus operation. The driver is written against this trait
//! and never sees whether the wires underneath are I2C or SPI.
//!
//! [`I2cTransport`] and [`SpiTransport`] map the contract onto the real
//! bus framings:
//!
//! - I2C: write is `[address, data...]`, read is a repeated-start
//!   write-then-read of the address byte.
//! - SPI: the address byte leads every frame, with bit 7 set for reads.

pub mod sc16is752;

pub use sc16is752::{transaction_address, Channel, UartBridgeChannel, FIFO_DEPTH};

use duart_hal::{I2cBus, SpiBus};

/// Read-direction flag in the SPI address byte
const SPI_READ: u8 = 0x80;

/// Errors from bridge register transactions
///
/// The driver performs no retries and no recovery; whatever the bus layer
/// reports comes straight back to the caller of the failing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError<E> {
    /// The underlying bus transaction failed (NACK, timeout, arbitration)
    Bus(E),
}

impl<E> From<E> for BridgeError<E> {
    fn from(error: E) -> Self {
        BridgeError::Bus(error)
    }
}

impl<E> embedded_io::Error for BridgeError<E>
where
    E: core::fmt::Debug,
{
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

/// Register-addressed bus transactions
///
/// Each call is one atomic bus operation from the driver's perspective.
/// Implementations must not retry internally; ordering across calls is
/// the caller's responsibility.
pub trait RegisterBus {
    /// Error type for bus transactions
    type Error;

    /// Read `buf.len()` bytes from the register at `address`
    ///
    /// A multi-byte read is a burst against a single register address
    /// (the chip drains its FIFO into the burst), not an address sweep.
    fn read(&mut self, device: u8, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` to the register at `address`
    fn write(&mut self, device: u8, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

// Reborrow impl so one bus handle can serve several channel handles in
// turn. Mutual exclusion across handles stays with the caller.
impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    type Error = T::Error;

    fn read(&mut self, device: u8, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(device, address, buf)
    }

    fn write(&mut self, device: u8, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(device, address, data)
    }
}

/// [`RegisterBus`] over an I2C master
///
/// Register reads of any length are a single repeated-start transaction.
/// Writes longer than the chip FIFO are split into FIFO-sized frames,
/// each re-sending the register address; the chip treats that identically
/// to one long frame.
pub struct I2cTransport<B> {
    bus: B,
}

impl<B> I2cTransport<B> {
    /// Wrap an I2C bus
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Return the wrapped bus
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> RegisterBus for I2cTransport<B> {
    type Error = B::Error;

    fn read(&mut self, device: u8, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.write_read(device, &[address], buf)
    }

    fn write(&mut self, device: u8, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut frame = [0u8; FIFO_DEPTH + 1];
        frame[0] = address;
        for chunk in data.chunks(FIFO_DEPTH) {
            frame[1..1 + chunk.len()].copy_from_slice(chunk);
            self.bus.write(device, &frame[..1 + chunk.len()])?;
        }
        Ok(())
    }
}

/// [`RegisterBus`] over an SPI master
///
/// The device address is ignored; chip select decides which chip listens.
/// Transfers are chunked at the chip FIFO depth because every frame
/// carries the address byte in front of the data.
pub struct SpiTransport<B> {
    bus: B,
}

impl<B> SpiTransport<B> {
    /// Wrap an SPI bus
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Return the wrapped bus
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: SpiBus> RegisterBus for SpiTransport<B> {
    type Error = B::Error;

    fn read(&mut self, _device: u8, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut tx = [0u8; FIFO_DEPTH + 1];
        let mut rx = [0u8; FIFO_DEPTH + 1];
        tx[0] = address | SPI_READ;
        for chunk in buf.chunks_mut(FIFO_DEPTH) {
            let n = chunk.len();
            self.bus.transfer(&mut rx[..n + 1], &tx[..n + 1])?;
            chunk.copy_from_slice(&rx[1..n + 1]);
        }
        Ok(())
    }

    fn write(&mut self, _device: u8, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut frame = [0u8; FIFO_DEPTH + 1];
        frame[0] = address;
        for chunk in data.chunks(FIFO_DEPTH) {
            frame[1..1 + chunk.len()].copy_from_slice(chunk);
            self.bus.write(&frame[..1 + chunk.len()])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use heapless::Vec;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum I2cOp {
        Write(u8, Vec<u8, 80>),
        WriteRead(u8, Vec<u8, 8>, usize),
    }

    #[derive(Default)]
    struct MockI2c {
        ops: std::vec::Vec<I2cOp>,
    }

    impl duart_hal::I2cBus for MockI2c {
        type Error = core::convert::Infallible;

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
            let mut bytes = Vec::new();
            bytes.extend_from_slice(data).unwrap();
            self.ops.push(I2cOp::Write(address, bytes));
            Ok(())
        }

        fn read(&mut self, _address: u8, _buf: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write_read(
            &mut self,
            address: u8,
            write_data: &[u8],
            read_buf: &mut [u8],
        ) -> Result<(), Self::Error> {
            let mut bytes = Vec::new();
            bytes.extend_from_slice(write_data).unwrap();
            self.ops.push(I2cOp::WriteRead(address, bytes, read_buf.len()));
            read_buf.fill(0xEE);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockSpi {
        frames: std::vec::Vec<std::vec::Vec<u8>>,
    }

    impl duart_hal::SpiBus for MockSpi {
        type Error = core::convert::Infallible;

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
            self.frames.push(write.to_vec());
            read.fill(0xEE);
            Ok(())
        }

        fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.frames.push(data.to_vec());
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
            buf.fill(0xEE);
            Ok(())
        }

        fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
            self.frames.push(data.to_vec());
            data.fill(0xEE);
            Ok(())
        }
    }

    #[test]
    fn test_i2c_write_frames_address_first() {
        let mut transport = I2cTransport::new(MockI2c::default());
        transport.write(0x48, 0x1A, &[0x55]).unwrap();

        let bus = transport.release();
        assert_eq!(bus.ops.len(), 1);
        match &bus.ops[0] {
            I2cOp::Write(device, bytes) => {
                assert_eq!(*device, 0x48);
                assert_eq!(bytes.as_slice(), &[0x1A, 0x55]);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_i2c_read_is_single_repeated_start() {
        let mut transport = I2cTransport::new(MockI2c::default());
        let mut buf = [0u8; 100];
        transport.read(0x48, 0x00, &mut buf).unwrap();

        let bus = transport.release();
        assert_eq!(bus.ops.len(), 1);
        match &bus.ops[0] {
            I2cOp::WriteRead(device, bytes, len) => {
                assert_eq!(*device, 0x48);
                assert_eq!(bytes.as_slice(), &[0x00]);
                assert_eq!(*len, 100);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_i2c_long_write_splits_at_fifo_depth() {
        let mut transport = I2cTransport::new(MockI2c::default());
        let data = [0xABu8; FIFO_DEPTH + 10];
        transport.write(0x48, 0x02, &data).unwrap();

        let bus = transport.release();
        assert_eq!(bus.ops.len(), 2);
        match (&bus.ops[0], &bus.ops[1]) {
            (I2cOp::Write(_, first), I2cOp::Write(_, second)) => {
                assert_eq!(first.len(), FIFO_DEPTH + 1);
                assert_eq!(first[0], 0x02);
                assert_eq!(second.len(), 11);
                assert_eq!(second[0], 0x02);
                assert!(second[1..].iter().all(|&b| b == 0xAB));
            }
            other => panic!("unexpected ops {:?}", other),
        }
    }

    #[test]
    fn test_spi_read_sets_direction_bit() {
        let mut transport = SpiTransport::new(MockSpi::default());
        let mut buf = [0u8; 4];
        transport.read(0x00, 0x1A, &mut buf).unwrap();

        let bus = transport.release();
        assert_eq!(bus.frames.len(), 1);
        assert_eq!(bus.frames[0][0], 0x1A | 0x80);
        assert_eq!(bus.frames[0].len(), 5);
    }

    #[test]
    fn test_spi_write_keeps_direction_bit_clear() {
        let mut transport = SpiTransport::new(MockSpi::default());
        transport.write(0x00, 0x1A, &[0x07]).unwrap();

        let bus = transport.release();
        assert_eq!(bus.frames.len(), 1);
        assert_eq!(bus.frames[0], &[0x1A, 0x07]);
    }

    #[test]
    fn test_reborrowed_bus_dispatches() {
        let mut transport = I2cTransport::new(MockI2c::default());
        {
            let mut lent: &mut dyn RegisterBus<Error = core::convert::Infallible> =
                &mut transport;
            lent.write(0x48, 0x08, &[0x01]).unwrap();
        }
        assert_eq!(transport.release().ops.len(), 1);
    }
}

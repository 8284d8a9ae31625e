//! SC16IS752 dual-channel UART bridge driver
//!
//! The SC16IS752 puts two independent 16C450-style UARTs plus an 8-bit
//! GPIO expander behind a single I2C or SPI slave. Each UART has its own
//! 64-byte transmit and receive FIFO; the host moves serial bytes by
//! reading and writing chip registers over the bus.
//!
//! # Register addressing
//!
//! The chip frames every bus transaction with a packed address byte:
//!
//! ```text
//! transaction_address = (register << 3) | (channel << 1)
//! ```
//!
//! Getting the shifts wrong does not fail loudly - it silently targets a
//! different register or the other channel's copy of the same register,
//! which shows up as corrupted serial data. [`transaction_address`] is
//! the single place this encoding lives.
//!
//! # Register aliasing
//!
//! Several addresses name different registers depending on direction and
//! mode: 0x00 is RHR on read and THR on write; 0x02 is IIR on read and
//! FCR on write; while LCR bit 7 (divisor latch enable) is set, 0x00 and
//! 0x01 become the baud-rate divisor latch DLL/DLH. The configuration
//! sequences below lean on this aliasing and restore LCR when done.
//!
//! # Baud rate divisors
//!
//! The caller supplies the divisor precomputed from the board's crystal
//! per the datasheet; with the common 1.8432 MHz reference:
//!
//! ```text
//! 2400   48
//! 4800   24
//! 9600   12
//! 19200   6
//! ```

use duart_core::serial::{LineConfig, Parity};

use super::{BridgeError, RegisterBus};

/// SC16IS752 register addresses
pub mod reg {
    /// Receive holding register (read direction)
    pub const RHR: u8 = 0x00;
    /// Transmit holding register (write direction, shares 0x00 with RHR)
    pub const THR: u8 = 0x00;
    /// Interrupt enable register
    pub const IER: u8 = 0x01;
    /// FIFO control register (write direction)
    pub const FCR: u8 = 0x02;
    /// Interrupt identification register (read direction, shares 0x02 with FCR)
    pub const IIR: u8 = 0x02;
    /// Line control register
    pub const LCR: u8 = 0x03;
    /// Modem control register
    pub const MCR: u8 = 0x04;
    /// Line status register
    pub const LSR: u8 = 0x05;
    /// Modem status register
    pub const MSR: u8 = 0x06;
    /// Transmission control register (aliases MSR in enhanced mode)
    pub const TCR: u8 = 0x06;
    /// Scratchpad register
    pub const SPR: u8 = 0x07;
    /// Trigger level register (aliases SPR in enhanced mode)
    pub const TLR: u8 = 0x07;
    /// Transmit FIFO level register (free slots, 0 = full)
    pub const TXLVL: u8 = 0x08;
    /// Receive FIFO level register (bytes buffered)
    pub const RXLVL: u8 = 0x09;
    /// GPIO direction register
    pub const IODIR: u8 = 0x0A;
    /// GPIO state register
    pub const IOSTATE: u8 = 0x0B;
    /// GPIO interrupt enable register
    pub const IOINTENA: u8 = 0x0C;
    /// GPIO control register (software reset, pin-function select)
    pub const IOCONTROL: u8 = 0x0E;
    /// Extra features control register
    pub const EFCR: u8 = 0x0F;
    /// Divisor latch LSB (aliases RHR/THR while LCR bit 7 is set)
    pub const DLL: u8 = 0x00;
    /// Divisor latch MSB (aliases IER while LCR bit 7 is set)
    pub const DLH: u8 = 0x01;
    /// Enhanced function register (aliases FCR/IIR while LCR is 0xBF)
    pub const EFR: u8 = 0x02;
}

/// Depth of each transmit and receive FIFO in bytes
pub const FIFO_DEPTH: usize = 64;

/// Byte echoed through the scratchpad register by the presence check
const PRESENCE_PROBE: u8 = 0x88;

/// LCR bit 7: remap 0x00/0x01 to the divisor latch while set
const LCR_DIVISOR_LATCH: u8 = 0x80;

/// IER bit 0: interrupt when receive data is available
const IER_RX_DATA: u8 = 0x01;

/// FCR bit 0: FIFO enable
const FCR_FIFO_ENABLE: u8 = 0x01;

/// FCR bit 1: receive FIFO reset strobe (self-clearing)
const FCR_RX_RESET: u8 = 0x02;

/// FCR bit 2: transmit FIFO reset strobe (self-clearing)
const FCR_TX_RESET: u8 = 0x04;

/// IOCONTROL bit 3: software reset of the whole chip
const IOCONTROL_SOFT_RESET: u8 = 0x08;

/// The two UART channels the chip multiplexes over one bus address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    /// Channel A (TXA/RXA pins)
    A = 0x00,
    /// Channel B (TXB/RXB pins)
    B = 0x01,
}

/// Compute the packed bus transaction address for a register access
///
/// This is the chip's address-framing convention and is reproduced
/// bit-exactly: register index in bits 6:3, channel select in bit 1.
pub fn transaction_address(register: u8, channel: Channel) -> u8 {
    (register << 3) | ((channel as u8) << 1)
}

/// Assemble a line control value from a prior LCR reading and a frame format
///
/// The top two bits (divisor latch enable, break control) are carried
/// over from `prior_lcr` untouched; the low six bits are rebuilt from
/// the requested format.
pub fn line_control_bits(prior_lcr: u8, line: &LineConfig) -> u8 {
    let mut lcr = prior_lcr & 0xC0;

    lcr |= match line.data_bits {
        5 => 0x00,
        6 => 0x01,
        7 => 0x02,
        // 8 data bits, also the documented fallback for out-of-range values
        _ => 0x03,
    };

    if line.stop_bits == 2 {
        lcr |= 0x04;
    }

    match line.parity {
        Parity::None => {}
        Parity::Odd => lcr |= 0x08,
        Parity::Even => lcr |= 0x18,
        // Mode 3 sets the 0x03 pattern, not the datasheet's forced-parity
        // field; the value is contractual, do not re-derive it
        Parity::ForcedOne => lcr |= 0x03,
        // Reserved mode leaves the parity field clear
        Parity::Reserved => {}
    }

    lcr
}

/// A handle to one UART channel of an SC16IS752
///
/// The handle is a stateless protocol translator: all durable state lives
/// in the chip, and every operation is one or more immediate, blocking
/// bus transactions. Construction performs no I/O.
///
/// # Bus sharing
///
/// The handle does no locking. Configuration operations are
/// read-modify-write sequences spanning several bus transactions, so the
/// caller must guarantee exclusive bus access for the duration of each
/// call - via `&mut` borrows in a single-threaded design, or an external
/// bus arbiter when other devices share the wires. `RegisterBus` is
/// implemented for `&mut T`, so two channel handles can take turns
/// borrowing one transport.
///
/// # Blocking behavior
///
/// [`write_byte`](Self::write_byte) busy-waits for transmit FIFO space
/// with no timeout: if the remote end never drains, it spins forever.
/// Callers needing bounded latency should poll
/// [`try_write_byte`](Self::try_write_byte) under their own deadline.
pub struct UartBridgeChannel<B> {
    bus: B,
    device_address: u8,
    channel: Channel,
}

impl<B: RegisterBus> UartBridgeChannel<B> {
    /// Bind a channel of the chip at `device_address`
    pub fn new(bus: B, device_address: u8, channel: Channel) -> Self {
        Self {
            bus,
            device_address,
            channel,
        }
    }

    /// The channel this handle is bound to
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The chip's bus address
    pub fn device_address(&self) -> u8 {
        self.device_address
    }

    /// Give the bus handle back
    pub fn release(self) -> B {
        self.bus
    }

    fn read_register(&mut self, register: u8) -> Result<u8, BridgeError<B::Error>> {
        let mut value = [0u8; 1];
        self.bus.read(
            self.device_address,
            transaction_address(register, self.channel),
            &mut value,
        )?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), BridgeError<B::Error>> {
        self.bus.write(
            self.device_address,
            transaction_address(register, self.channel),
            &[value],
        )?;
        Ok(())
    }

    /// Check whether the chip answers on the bus
    ///
    /// Writes a probe byte to the scratchpad register and reads it back;
    /// a failed transaction or a mismatched echo both mean "not
    /// connected", never an error. The previous scratchpad contents are
    /// overwritten.
    pub fn is_connected(&mut self) -> bool {
        if self.write_register(reg::SPR, PRESENCE_PROBE).is_err() {
            return false;
        }
        matches!(self.read_register(reg::SPR), Ok(PRESENCE_PROBE))
    }

    /// Number of bytes waiting in the receive FIFO (0-64)
    ///
    /// An exact count per the datasheet, not a "has data" flag.
    pub fn available(&mut self) -> Result<u8, BridgeError<B::Error>> {
        self.read_register(reg::RXLVL)
    }

    /// Number of free slots in the transmit FIFO (0 = full)
    pub fn tx_space(&mut self) -> Result<u8, BridgeError<B::Error>> {
        self.read_register(reg::TXLVL)
    }

    /// Read one byte from the receive FIFO
    ///
    /// The result is stale chip data if the FIFO is empty; check
    /// [`available`](Self::available) first.
    pub fn read_byte(&mut self) -> Result<u8, BridgeError<B::Error>> {
        self.read_register(reg::RHR)
    }

    /// Fill `buf` with one burst read from the receive FIFO
    ///
    /// Issues a single multi-byte bus read against the receive holding
    /// register, not `buf.len()` separate reads. Bytes beyond what
    /// [`available`](Self::available) reported are chip-defined garbage;
    /// consume only the known-valid prefix.
    pub fn read_buffer(&mut self, buf: &mut [u8]) -> Result<(), BridgeError<B::Error>> {
        self.bus.read(
            self.device_address,
            transaction_address(reg::RHR, self.channel),
            buf,
        )?;
        Ok(())
    }

    /// Write one byte, busy-waiting for transmit FIFO space
    ///
    /// Spins on the transmit level register until a slot frees up; there
    /// is no timeout (see the struct docs).
    pub fn write_byte(&mut self, byte: u8) -> Result<(), BridgeError<B::Error>> {
        while self.tx_space()? == 0 {}
        self.write_register(reg::THR, byte)
    }

    /// Write one byte only if the transmit FIFO has room
    ///
    /// Returns `Ok(false)` without touching the data register when the
    /// FIFO is full. The bounded companion to
    /// [`write_byte`](Self::write_byte).
    pub fn try_write_byte(&mut self, byte: u8) -> Result<bool, BridgeError<B::Error>> {
        if self.tx_space()? == 0 {
            return Ok(false);
        }
        self.write_register(reg::THR, byte)?;
        Ok(true)
    }

    /// Write a byte slice, blocking per byte
    ///
    /// Equivalent to [`write_byte`](Self::write_byte) in a loop, with the
    /// same unbounded-blocking caveat.
    pub fn write(&mut self, data: &[u8]) -> Result<(), BridgeError<B::Error>> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Drain the receive FIFO
    ///
    /// Loops until the level register reads zero. Not atomic against new
    /// arrivals: bytes that keep coming in keep the loop running until
    /// the producer pauses.
    pub fn flush(&mut self) -> Result<(), BridgeError<B::Error>> {
        while self.available()? > 0 {
            self.read_byte()?;
        }
        Ok(())
    }

    /// Program the baud rate divisor
    ///
    /// The divisor is precomputed by the caller from the reference
    /// crystal (see the module docs); no rate arithmetic happens here.
    /// The sequence sets LCR bit 7 to expose the divisor latch, writes
    /// both halves, then restores the LCR snapshot taken at entry with
    /// the latch bit cleared.
    pub fn set_baud_divisor(&mut self, divisor: u16) -> Result<(), BridgeError<B::Error>> {
        let lcr = self.read_register(reg::LCR)?;
        self.write_register(reg::LCR, lcr | LCR_DIVISOR_LATCH)?;
        self.write_register(reg::DLL, (divisor & 0xFF) as u8)?;
        self.write_register(reg::DLH, (divisor >> 8) as u8)?;
        // Restore from the snapshot, not a fresh read
        self.write_register(reg::LCR, lcr & !LCR_DIVISOR_LATCH)?;
        Ok(())
    }

    /// Program the frame format (data bits, parity, stop bits)
    ///
    /// Out-of-range data lengths fall back to 8 bits and the reserved
    /// parity mode is a no-op, per [`LineConfig`]'s contract. The top two
    /// LCR bits are never altered.
    ///
    /// As a side effect this call rewrites the interrupt enable register
    /// to fire the IRQ pin on receive-data-available only, disabling all
    /// other interrupt sources. The coupling is part of the contract, not
    /// independently controllable.
    pub fn set_line_format(&mut self, line: LineConfig) -> Result<(), BridgeError<B::Error>> {
        let prior = self.read_register(reg::LCR)?;
        self.write_register(reg::LCR, line_control_bits(prior, &line))?;
        self.write_register(reg::IER, IER_RX_DATA)
    }

    /// Enable or disable the channel's FIFOs
    ///
    /// Read-modify-write of FCR bit 0 only; trigger-level bits are left
    /// as the chip reports them. (In the read direction address 0x02 is
    /// IIR - the chip has no FCR readback - so "as reported" is the
    /// interrupt identification value, reproduced unmodified.)
    pub fn set_fifo_enabled(&mut self, enabled: bool) -> Result<(), BridgeError<B::Error>> {
        let fcr = self.read_register(reg::FCR)?;
        let fcr = if enabled {
            fcr | FCR_FIFO_ENABLE
        } else {
            fcr & !FCR_FIFO_ENABLE
        };
        self.write_register(reg::FCR, fcr)
    }

    /// Clear the receive and/or transmit FIFO
    ///
    /// Sets the self-clearing reset strobes in FCR, preserving the
    /// enable and trigger-level bits.
    pub fn reset_fifos(&mut self, rx: bool, tx: bool) -> Result<(), BridgeError<B::Error>> {
        let mut fcr = self.read_register(reg::FCR)?;
        if rx {
            fcr |= FCR_RX_RESET;
        }
        if tx {
            fcr |= FCR_TX_RESET;
        }
        self.write_register(reg::FCR, fcr)
    }

    /// Request a software reset of the whole chip (both channels)
    ///
    /// Best-effort: known unreliable on some chip revisions and wirings,
    /// and a clean return does not guarantee the chip actually reset.
    /// Callers may ignore the result.
    pub fn reset_device(&mut self) -> Result<(), BridgeError<B::Error>> {
        let control = self.read_register(reg::IOCONTROL)?;
        self.write_register(reg::IOCONTROL, control | IOCONTROL_SOFT_RESET)
    }

    /// Set the GPIO expander pin directions (1 = output)
    ///
    /// The GPIO block is device-global: both channel handles reach the
    /// same eight pins. The channel bits this handle packs into the
    /// transaction address are ignored by the chip for these registers.
    pub fn gpio_set_direction(&mut self, mask: u8) -> Result<(), BridgeError<B::Error>> {
        self.write_register(reg::IODIR, mask)
    }

    /// Drive the GPIO expander output pins
    pub fn gpio_write(&mut self, state: u8) -> Result<(), BridgeError<B::Error>> {
        self.write_register(reg::IOSTATE, state)
    }

    /// Read the GPIO expander pin states
    pub fn gpio_read(&mut self) -> Result<u8, BridgeError<B::Error>> {
        self.read_register(reg::IOSTATE)
    }

    /// Select which GPIO pins fire the IRQ line on input change
    pub fn gpio_set_interrupt_mask(&mut self, mask: u8) -> Result<(), BridgeError<B::Error>> {
        self.write_register(reg::IOINTENA, mask)
    }
}

impl<B: RegisterBus> embedded_io::ErrorType for UartBridgeChannel<B>
where
    B::Error: core::fmt::Debug,
{
    type Error = BridgeError<B::Error>;
}

impl<B: RegisterBus> embedded_io::Read for UartBridgeChannel<B>
where
    B::Error: core::fmt::Debug,
{
    /// Busy-waits until at least one byte is buffered, then burst-reads
    /// the valid prefix.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut count = self.available()?;
        while count == 0 {
            count = self.available()?;
        }
        let n = (count as usize).min(buf.len());
        self.read_buffer(&mut buf[..n])?;
        Ok(n)
    }
}

impl<B: RegisterBus> embedded_io::Write for UartBridgeChannel<B>
where
    B::Error: core::fmt::Debug,
{
    /// Busy-waits for transmit space, then writes at most one FIFO's
    /// worth of bytes.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut space = self.tx_space()?;
        while space == 0 {
            space = self.tx_space()?;
        }
        let n = (space as usize).min(buf.len());
        for &byte in &buf[..n] {
            self.write_register(reg::THR, byte)?;
        }
        Ok(n)
    }

    /// Busy-waits until the transmit FIFO reports every slot free.
    ///
    /// Distinct from the inherent [`flush`](UartBridgeChannel::flush),
    /// which drains the *receive* FIFO. Dot-syntax calls resolve to the
    /// inherent method; this one is reached through the trait.
    fn flush(&mut self) -> Result<(), Self::Error> {
        while (self.tx_space()? as usize) < FIFO_DEPTH {}
        Ok(())
    }
}

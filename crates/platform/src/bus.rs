//! Register-addressed control bus abstraction
//!
//! Codec control cores talk to their chip through [`RegisterBus`]: one
//! 8-bit register address, one 8-bit value, nothing else. How that pair is
//! framed on the wire is the transport's business; [`I2cRegisterBus`] is the
//! I2C transport, including the address-flag framing some chips use to
//! select auto-incrementing access.

use embedded_hal::i2c::I2c;

/// Byte-wide register transport.
///
/// All calls are synchronous and may block for the duration of the bus
/// transfer. Timeouts and retries, if any, belong to the implementation and
/// surface as `Self::Error`.
pub trait RegisterBus {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read one register.
    fn read(&mut self, reg: u8) -> Result<u8, Self::Error>;

    /// Write one register.
    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    type Error = T::Error;

    fn read(&mut self, reg: u8) -> Result<u8, Self::Error> {
        T::read(self, reg)
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        T::write(self, reg, value)
    }
}

/// Bits OR-ed into the register address byte on the wire.
///
/// These are transport framing, never part of a logical register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusFraming {
    /// Mask applied to the address byte of a read.
    pub read_flag_mask: u8,
    /// Mask applied to the address byte of a write.
    pub write_flag_mask: u8,
}

impl BusFraming {
    /// No framing: the address byte goes out unchanged.
    pub const PLAIN: Self = Self {
        read_flag_mask: 0,
        write_flag_mask: 0,
    };

    /// Same `mask` on reads and writes.
    pub const fn symmetric(mask: u8) -> Self {
        Self {
            read_flag_mask: mask,
            write_flag_mask: mask,
        }
    }
}

/// [`RegisterBus`] over a blocking `embedded_hal::i2c::I2c` peripheral.
///
/// A read is a single `write_read` transaction (address byte out, one data
/// byte in). A write is a single two-byte `write` of `[address, value]`.
pub struct I2cRegisterBus<I> {
    i2c: I,
    address: u8,
    framing: BusFraming,
}

impl<I: I2c> I2cRegisterBus<I> {
    /// Create a bus for the chip at 7-bit `address`.
    pub fn new(i2c: I, address: u8, framing: BusFraming) -> Self {
        Self {
            i2c,
            address,
            framing,
        }
    }

    /// 7-bit device address this bus targets.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the I2C peripheral back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterBus for I2cRegisterBus<I> {
    type Error = I::Error;

    fn read(&mut self, reg: u8) -> Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.i2c.write_read(
            self.address,
            &[reg | self.framing.read_flag_mask],
            &mut value,
        )?;
        let [byte] = value;
        Ok(byte)
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c
            .write(self.address, &[reg | self.framing.write_flag_mask, value])
    }
}

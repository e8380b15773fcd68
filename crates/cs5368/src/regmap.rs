//! Register store: write-back cache in front of the control bus
//!
//! The store owns the bus and a cache slot for every register. Two flags
//! drive its behaviour:
//!
//! - `cache_only`: no bus traffic at all. Writes land in the cache and mark
//!   the store dirty; non-volatile reads come from the cache. Used while the
//!   chip is unpowered.
//! - `dirty`: the chip may not hold what the cache says. The next resync
//!   (explicit, or triggered by the first non-volatile access once
//!   `cache_only` drops) writes every cached value that differs from the
//!   power-on default, in ascending address order.
//!
//! Volatile registers bypass the cache entirely.

use platform::RegisterBus;

use crate::error::{Error, Result};
use crate::registers::Register;

/// Cached view of the CS5368 register file.
pub struct RegisterCache<B> {
    bus: B,
    values: [u8; Register::COUNT],
    cache_only: bool,
    dirty: bool,
}

impl<B: RegisterBus> RegisterCache<B> {
    /// Create a store with every register at its power-on default.
    ///
    /// No bus traffic is issued.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            values: Register::ALL.map(Register::default_value),
            cache_only: false,
            dirty: false,
        }
    }

    /// Read `addr`.
    ///
    /// Volatile registers are always read from the bus. Everything else
    /// comes from the cache, after a pending resync if the store is dirty
    /// and not cache-only.
    pub fn read(&mut self, addr: u8) -> Result<u8, B::Error> {
        let reg = Register::from_addr(addr)
            .filter(|reg| reg.is_readable())
            .ok_or(Error::InvalidAddress(addr))?;

        if reg.is_volatile() {
            trace!("bus read of volatile register {:#x}", addr);
            return self.bus.read(addr).map_err(Error::Transport);
        }

        if self.dirty && !self.cache_only {
            self.resync()?;
        }
        Ok(self.cached_value(reg))
    }

    /// Write `value` to `addr`.
    ///
    /// The cache is always updated. In cache-only mode the bus write is
    /// deferred and the store marked dirty; otherwise a pending resync runs
    /// first and the value goes out once, either with the resync or after it.
    pub fn write(&mut self, addr: u8, value: u8) -> Result<(), B::Error> {
        let reg = Register::from_addr(addr)
            .filter(|reg| reg.is_writable())
            .ok_or(Error::InvalidAddress(addr))?;

        self.set_cached_value(reg, value);
        if self.cache_only {
            self.dirty = true;
            return Ok(());
        }

        if self.dirty {
            self.resync()?;
            // The resync already pushed every non-default value.
            if value != reg.default_value() {
                return Ok(());
            }
        }
        self.bus.write(addr, value).map_err(Error::Transport)
    }

    /// Read-modify-write of the bits in `mask`.
    ///
    /// Returns `true` if the register value changed. An unchanged value is
    /// not written.
    pub fn write_bits(&mut self, addr: u8, mask: u8, value: u8) -> Result<bool, B::Error> {
        if !crate::registers::is_writable(addr) {
            return Err(Error::InvalidAddress(addr));
        }

        let old = self.read(addr)?;
        let new = (old & !mask) | (value & mask);
        if new == old {
            return Ok(false);
        }
        self.write(addr, new)?;
        Ok(true)
    }

    /// Apply `writes` in order. Stops at the first failure.
    pub fn multi_write(&mut self, writes: &[(Register, u8)]) -> Result<(), B::Error> {
        for &(reg, value) in writes {
            self.write(reg.addr(), value)?;
        }
        Ok(())
    }

    /// Enter or leave cache-only mode. Issues no bus traffic.
    pub fn set_cache_only(&mut self, enable: bool) {
        self.cache_only = enable;
    }

    /// Declare that the chip lost its register contents.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Push the cache to the chip.
    ///
    /// Writes every writable, non-volatile register whose cached value
    /// differs from its power-on default, in ascending address order, and
    /// returns the number of bus writes issued. Does nothing while clean or
    /// while cache-only. On failure the store stays dirty.
    pub fn resync(&mut self) -> Result<usize, B::Error> {
        if !self.dirty || self.cache_only {
            return Ok(0);
        }

        let mut written = 0usize;
        for reg in Register::ALL {
            if !reg.is_writable() || reg.is_volatile() {
                continue;
            }
            let value = self.cached_value(reg);
            if value == reg.default_value() {
                continue;
            }
            self.bus
                .write(reg.addr(), value)
                .map_err(Error::Transport)?;
            written = written.saturating_add(1);
        }

        self.dirty = false;
        debug!("register resync wrote {} registers", written);
        Ok(written)
    }

    /// Cached value of `addr` without any bus traffic.
    ///
    /// `None` for reserved and out-of-range addresses.
    pub fn cached(&self, addr: u8) -> Option<u8> {
        Register::from_addr(addr).map(|reg| self.cached_value(reg))
    }

    /// `true` while in cache-only mode.
    pub fn is_cache_only(&self) -> bool {
        self.cache_only
    }

    /// `true` while a resync is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Borrow the bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the bus, bypassing the cache.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the bus back.
    pub fn release(self) -> B {
        self.bus
    }

    // `Register::index` is always below `Register::COUNT`.
    #[allow(clippy::indexing_slicing)]
    fn cached_value(&self, reg: Register) -> u8 {
        self.values[reg.index()]
    }

    #[allow(clippy::indexing_slicing)]
    fn set_cached_value(&mut self, reg: Register, value: u8) {
        self.values[reg.index()] = value;
    }
}

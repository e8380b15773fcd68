//! Host-side stand-ins for the control bus and the supply rails
//!
//! Record every call for assertion in tests. No allocation: the transfer log
//! is a fixed-capacity `heapless::Vec` and silently stops recording when full,
//! so the module builds on `no_std` and downstream crates can test against it
//! without extra features.

use platform::{RegisterBus, RegulatorBulk};

use crate::registers::Register;

/// Transfer log capacity.
pub const LOG_CAPACITY: usize = 64;

/// One recorded bus transfer. Addresses are logical (no framing flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    /// Register read.
    Read(u8),
    /// Register write.
    Write(u8, u8),
}

/// Error reported by [`MockBus`] when a fault is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBusError {
    /// Device did not acknowledge.
    Nak,
}

/// In-memory register file standing in for the chip.
pub struct MockBus {
    registers: [u8; 16],
    log: heapless::Vec<BusOp, LOG_CAPACITY>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockBus {
    /// Register file at power-on defaults, empty log, no faults.
    pub fn new() -> Self {
        let mut registers = [0u8; 16];
        for reg in Register::ALL {
            if let Some(slot) = registers.get_mut(usize::from(reg.addr())) {
                *slot = reg.default_value();
            }
        }
        Self {
            registers,
            log: heapless::Vec::new(),
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Value currently held by the simulated chip.
    pub fn register(&self, addr: u8) -> u8 {
        self.registers
            .get(usize::from(addr))
            .copied()
            .unwrap_or(0)
    }

    /// Change a register behind the driver's back (e.g. latch an overflow).
    pub fn set_register(&mut self, addr: u8, value: u8) {
        if let Some(slot) = self.registers.get_mut(usize::from(addr)) {
            *slot = value;
        }
    }

    /// Simulate a power cycle: every register back to its default.
    pub fn power_cycle(&mut self) {
        let log = core::mem::take(&mut self.log);
        *self = Self {
            log,
            fail_reads: self.fail_reads,
            fail_writes: self.fail_writes,
            ..Self::new()
        };
    }

    /// Recorded transfers, oldest first.
    pub fn log(&self) -> &[BusOp] {
        &self.log
    }

    /// Recorded writes only.
    pub fn writes(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.log.iter().filter_map(|op| match *op {
            BusOp::Write(addr, value) => Some((addr, value)),
            BusOp::Read(_) => None,
        })
    }

    /// Forget recorded transfers.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Make every following read fail.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every following write fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn record(&mut self, op: BusOp) {
        let _ = self.log.push(op);
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for MockBus {
    type Error = MockBusError;

    fn read(&mut self, reg: u8) -> Result<u8, Self::Error> {
        if self.fail_reads {
            return Err(MockBusError::Nak);
        }
        self.record(BusOp::Read(reg));
        Ok(self.register(reg))
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockBusError::Nak);
        }
        self.record(BusOp::Write(reg, value));
        self.set_register(reg, value);
        Ok(())
    }
}

/// Error reported by [`MockRegulators`] when a fault is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockRegulatorError;

/// Supply rails that count transitions.
#[derive(Debug, Default)]
pub struct MockRegulators {
    /// Whether the rails are currently on.
    pub enabled: bool,
    /// Successful `enable` calls.
    pub enable_count: usize,
    /// Successful `disable` calls.
    pub disable_count: usize,
    /// Next `enable` calls fail while set.
    pub fail_enable: bool,
    /// Next `disable` calls fail while set.
    pub fail_disable: bool,
}

impl MockRegulators {
    /// Rails off, no faults.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegulatorBulk for MockRegulators {
    type Error = MockRegulatorError;

    fn enable(&mut self) -> Result<(), Self::Error> {
        if self.fail_enable {
            return Err(MockRegulatorError);
        }
        self.enabled = true;
        self.enable_count = self.enable_count.saturating_add(1);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        if self.fail_disable {
            return Err(MockRegulatorError);
        }
        self.enabled = false;
        self.disable_count = self.disable_count.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bus_starts_at_register_defaults() {
        let bus = MockBus::new();
        assert_eq!(bus.register(0x00), 0x80);
        assert_eq!(bus.register(0x02), 0xFF);
        assert_eq!(bus.register(0x03), 0xFF);
        assert_eq!(bus.register(0x01), 0x00);
    }

    #[test]
    fn bus_records_and_applies_writes() {
        let mut bus = MockBus::new();
        bus.write(0x04, 0x12).unwrap();
        assert_eq!(bus.read(0x04).unwrap(), 0x12);
        assert_eq!(bus.log(), [BusOp::Write(0x04, 0x12), BusOp::Read(0x04)]);
        assert_eq!(bus.writes().collect::<Vec<_>>(), [(0x04, 0x12)]);
    }

    #[test]
    fn power_cycle_restores_defaults_but_keeps_log() {
        let mut bus = MockBus::new();
        bus.write(0x01, 0x8B).unwrap();
        bus.power_cycle();
        assert_eq!(bus.register(0x01), 0x00);
        assert_eq!(bus.log().len(), 1);
    }

    #[test]
    fn injected_faults_are_reported_and_not_logged() {
        let mut bus = MockBus::new();
        bus.fail_writes(true);
        assert_eq!(bus.write(0x04, 1), Err(MockBusError::Nak));
        assert!(bus.log().is_empty());
    }

    #[test]
    fn regulators_count_transitions() {
        let mut rails = MockRegulators::new();
        rails.enable().unwrap();
        rails.disable().unwrap();
        rails.fail_enable = true;
        assert!(rails.enable().is_err());
        assert_eq!((rails.enable_count, rails.disable_count), (1, 1));
        assert!(!rails.enabled);
    }
}

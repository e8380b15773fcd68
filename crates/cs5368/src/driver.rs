//! CS5368 device instance
//!
//! One [`Cs5368`] owns everything belonging to one chip: the register
//! store, the reset line, the supply rails and the negotiated stream
//! configuration. Every operation takes `&mut self`; callers serialise
//! access to an instance, the driver does no locking of its own.
//!
//! Power sequencing lives in [`crate::power`], interface negotiation in
//! [`crate::dai`]. This module covers attach, mixer controls and converter
//! power.

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use platform::{
    DaiDriverInfo, I2cRegisterBus, PowerState, RegisterBus, RegulatorBulk, ResetLine,
};

use crate::config::Cs5368Config;
use crate::controls::{self, SwitchControl};
use crate::error::{Error, PowerStep, Result, SequenceFault};
use crate::registers::{Register, BUS_FRAMING, INIT_SEQUENCE};
use crate::regmap::RegisterCache;
use crate::routing::{ConverterSet, NodeId, RoutingGraph};

/// CS5368 control core.
///
/// - `B`: control bus
/// - `RST`: reset GPIO
/// - `REG`: supply rails
pub struct Cs5368<B, RST, REG> {
    pub(crate) regmap: RegisterCache<B>,
    pub(crate) reset: ResetLine<RST>,
    pub(crate) regulators: REG,
    pub(crate) state: PowerState,
    pub(crate) mclk_freq: u32,
    pub(crate) tdm: bool,
    graph: RoutingGraph,
}

impl<B, RST, REG> Cs5368<B, RST, REG>
where
    B: RegisterBus,
    RST: OutputPin,
    REG: RegulatorBulk,
{
    /// Bring up the control core for a chip that is not yet powered.
    ///
    /// The register store starts at power-on defaults and goes cache-only;
    /// the initialisation sequence is queued in the cache for the first
    /// resume to replay. The reset line is asserted. No bus traffic is
    /// issued and the rails are left alone, so the device starts
    /// [`PowerState::Suspended`].
    pub fn attach(bus: B, mut reset: ResetLine<RST>, regulators: REG) -> Result<Self, B::Error> {
        let mut regmap = RegisterCache::new(bus);
        regmap.set_cache_only(true);
        regmap.multi_write(&INIT_SEQUENCE)?;

        if reset.assert().is_err() {
            error!("failed to assert reset line");
            return Err(Error::sequence(
                PowerStep::AssertReset,
                SequenceFault::ResetLine,
            ));
        }

        info!("cs5368 attached, held in reset");
        Ok(Self {
            regmap,
            reset,
            regulators,
            state: PowerState::Suspended,
            mclk_freq: 0,
            tdm: false,
            graph: RoutingGraph::cs5368(),
        })
    }

    /// Current power state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Master clock frequency from the last accepted
    /// [`set_master_clock`](Self::set_master_clock), 0 before that.
    pub fn master_clock_frequency(&self) -> u32 {
        self.mclk_freq
    }

    /// `true` once a TDM slot geometry has been accepted.
    pub fn tdm_enabled(&self) -> bool {
        self.tdm
    }

    /// Register store.
    pub fn registers(&self) -> &RegisterCache<B> {
        &self.regmap
    }

    /// Register store, mutable. Access rules still apply.
    pub fn registers_mut(&mut self) -> &mut RegisterCache<B> {
        &mut self.regmap
    }

    /// Reset line.
    pub fn reset_line(&self) -> &ResetLine<RST> {
        &self.reset
    }

    /// Supply rails.
    pub fn regulators(&self) -> &REG {
        &self.regulators
    }

    /// Supply rails, mutable.
    pub fn regulators_mut(&mut self) -> &mut REG {
        &mut self.regulators
    }

    /// Capture routing topology.
    pub fn routing(&self) -> &RoutingGraph {
        &self.graph
    }

    /// DAI descriptor registered with the framework.
    pub fn dai_driver(&self) -> DaiDriverInfo {
        crate::dai::DAI_DRIVER
    }

    /// Tear down and hand back bus, reset pin and rails.
    pub fn release(self) -> (B, RST, REG) {
        (self.regmap.release(), self.reset.into_inner(), self.regulators)
    }

    // ---------------------------------------------------------------------
    // Mixer controls
    // ---------------------------------------------------------------------

    /// All sixteen mixer switches.
    pub fn controls(&self) -> impl Iterator<Item = &'static SwitchControl> {
        controls::all()
    }

    /// Mixer switch by name.
    pub fn find_control(&self, name: &str) -> Option<&'static SwitchControl> {
        controls::find(name)
    }

    /// Current state of a mixer switch.
    pub fn get_switch(&mut self, control: &SwitchControl) -> Result<bool, B::Error> {
        let value = self.regmap.read(control.reg.addr())?;
        Ok(control.decode(value))
    }

    /// Set a mixer switch. Returns `true` if the backing bit changed.
    pub fn set_switch(&mut self, control: &SwitchControl, on: bool) -> Result<bool, B::Error> {
        let changed =
            self.regmap
                .write_bits(control.reg.addr(), control.mask(), control.encode(on))?;
        if changed {
            debug!("{} -> {}", control.name, on);
        }
        Ok(changed)
    }

    /// Open or close the capture switch widget `switch` of the routing graph.
    pub fn set_capture_path(&mut self, switch: NodeId, open: bool) -> Result<bool, B::Error> {
        let (reg, shift) = self.graph.switch_bit(switch)?;
        let control = controls::CAPTURE_SWITCHES
            .iter()
            .find(|ctl| ctl.reg == reg && ctl.shift == shift)
            .ok_or(Error::InvalidAddress(reg.addr()))?;
        self.set_switch(control, open)
    }

    // ---------------------------------------------------------------------
    // Converter power
    // ---------------------------------------------------------------------

    /// Power a converter pair up or down. Returns `true` if the PDN bit
    /// changed.
    pub fn set_converter_powered(&mut self, converter: NodeId, on: bool) -> Result<bool, B::Error> {
        let (reg, shift) = self.graph.converter_power_bit(converter)?;
        let mask = 1u8.wrapping_shl(u32::from(shift));
        // PDN bits are power-down: powered means clear.
        let value = if on { 0 } else { mask };
        self.regmap.write_bits(reg.addr(), mask, value)
    }

    /// Power exactly the converters the given capture streams depend on.
    ///
    /// Returns the number of converters whose power state changed.
    pub fn apply_capture_power(&mut self, active_streams: &[NodeId]) -> Result<usize, B::Error> {
        let mut needed = ConverterSet::new();
        for &stream in active_streams {
            for converter in self.graph.power_dependencies(stream)? {
                if !needed.contains(&converter) {
                    // Capacity equals the converter count of the graph, and
                    // duplicates are filtered above.
                    let _ = needed.push(converter);
                }
            }
        }

        let graph = self.graph;
        let mut changed = 0usize;
        for converter in graph.converters() {
            if self.set_converter_powered(converter, needed.contains(&converter))? {
                changed = changed.saturating_add(1);
            }
        }
        debug!(
            "capture power: {} converters needed, {} changed",
            needed.len(),
            changed
        );
        Ok(changed)
    }

    /// Overflow flags, one bit per channel. Always read from the chip.
    pub fn overflow_status(&mut self) -> Result<u8, B::Error> {
        self.regmap.read(Register::OverflowStatus.addr())
    }
}

impl<I, RST, REG> Cs5368<I2cRegisterBus<I>, RST, REG>
where
    I: I2c,
    RST: OutputPin,
    REG: RegulatorBulk,
{
    /// [`attach`](Self::attach) over I2C, wiring address, framing and reset
    /// polarity from `config`.
    pub fn attach_i2c(
        i2c: I,
        reset_pin: RST,
        regulators: REG,
        config: Cs5368Config,
    ) -> Result<Self, I::Error> {
        let bus = I2cRegisterBus::new(i2c, config.i2c_address, BUS_FRAMING);
        let reset = ResetLine::new(reset_pin, config.reset_polarity);
        Self::attach(bus, reset, regulators)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{MockBus, MockRegulators};
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTx};
    use platform::Polarity;

    type Device = Cs5368<MockBus, PinMock, MockRegulators>;

    fn attached(extra: &[PinTx]) -> Device {
        let mut expected = vec![PinTx::set(State::Low)];
        expected.extend_from_slice(extra);
        let pin = PinMock::new(&expected);
        Cs5368::attach(
            MockBus::new(),
            ResetLine::new(pin, Polarity::ActiveLow),
            MockRegulators::new(),
        )
        .unwrap()
    }

    fn finish(dev: Device) {
        let (_, mut pin, _) = dev.release();
        pin.done();
    }

    #[test]
    fn attach_queues_init_sequence_without_bus_traffic() {
        let dev = attached(&[]);
        let regs = dev.registers();
        assert!(regs.is_cache_only());
        assert!(regs.is_dirty());
        assert_eq!(regs.cached(0x01), Some(0x8B));
        assert_eq!(regs.cached(0x03), Some(0x00));
        assert_eq!(regs.cached(0x0A), Some(0x0A));
        assert!(regs.bus().log().is_empty());
        assert_eq!(dev.state(), PowerState::Suspended);
        assert!(dev.reset_line().is_asserted());
        assert_eq!(dev.master_clock_frequency(), 0);
        assert!(!dev.tdm_enabled());
        finish(dev);
    }

    #[test]
    fn attach_reports_reset_failure() {
        use embedded_hal_mock::eh1::MockError;

        let mut pin = PinMock::new(&[PinTx::set(State::Low)
            .with_error(MockError::Io(std::io::ErrorKind::NotConnected))]);
        let result = Cs5368::attach(
            MockBus::new(),
            ResetLine::new(pin.clone(), Polarity::ActiveLow),
            MockRegulators::new(),
        );
        assert!(matches!(
            result,
            Err(Error::Sequence {
                step: PowerStep::AssertReset,
                fault: SequenceFault::ResetLine
            })
        ));
        pin.done();
    }

    #[test]
    fn switches_write_through_cache_while_suspended() {
        let mut dev = attached(&[]);
        let ctl = *dev.find_control("AIN3 Capture Switch").unwrap();

        assert!(dev.get_switch(&ctl).unwrap());
        assert!(dev.set_switch(&ctl, false).unwrap());
        assert!(!dev.set_switch(&ctl, false).unwrap());
        assert!(!dev.get_switch(&ctl).unwrap());
        assert_eq!(dev.registers().cached(0x08), Some(0x04));
        assert!(dev.registers().bus().log().is_empty());
        finish(dev);
    }

    #[test]
    fn converter_power_is_inverted_pdn_bit() {
        let mut dev = attached(&[]);
        let adc = dev.routing().find("AIN56").unwrap();

        assert!(dev.set_converter_powered(adc, false).unwrap());
        assert_eq!(dev.registers().cached(0x06), Some(0x04));
        assert!(dev.set_converter_powered(adc, true).unwrap());
        assert_eq!(dev.registers().cached(0x06), Some(0x00));

        let input = dev.routing().find("AIN5").unwrap();
        assert!(matches!(
            dev.set_converter_powered(input, true),
            Err(Error::Routing(_))
        ));
        finish(dev);
    }

    #[test]
    fn capture_power_follows_active_streams() {
        let mut dev = attached(&[]);
        let g = *dev.routing();
        let tdm1 = g.find("TDM1").unwrap();
        let tdm2 = g.find("TDM2").unwrap();
        let tdm8 = g.find("TDM8").unwrap();

        // AIN12 and AIN78 stay on, AIN34 and AIN56 go down.
        assert_eq!(dev.apply_capture_power(&[tdm1, tdm2, tdm8]).unwrap(), 2);
        assert_eq!(dev.registers().cached(0x06), Some(0b0110));

        assert_eq!(dev.apply_capture_power(&[]).unwrap(), 2);
        assert_eq!(dev.registers().cached(0x06), Some(0b1111));
        finish(dev);
    }

    #[test]
    fn capture_path_maps_switch_widget_to_mute_bit() {
        let mut dev = attached(&[]);
        let sw = dev.routing().find("AIN7 Capture").unwrap();
        assert!(dev.set_capture_path(sw, false).unwrap());
        assert_eq!(dev.registers().cached(0x08), Some(0x40));
        finish(dev);
    }

    #[test]
    fn overflow_status_reads_the_chip() {
        let mut dev = attached(&[]);
        dev.registers_mut().bus_mut().set_register(0x02, 0x81);
        assert_eq!(dev.overflow_status().unwrap(), 0x81);
        finish(dev);
    }
}

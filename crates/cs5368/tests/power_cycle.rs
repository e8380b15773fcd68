//! Suspend/resume behaviour against the in-memory chip model.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cs5368::mock::{BusOp, MockBus, MockRegulators};
use cs5368::{Cs5368, Register};
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use platform::{Polarity, PowerState, PowerTransition, ResetLine, RuntimePm};

type Device = Cs5368<MockBus, PinMock, MockRegulators>;

/// Attach, then expect the reset edges of `resumes` resumes interleaved
/// with `suspends` suspends.
fn device(resumes: usize, suspends: usize) -> (Device, PinMock) {
    let mut edges = vec![PinTransaction::set(State::Low)];
    for i in 0..resumes.max(suspends) {
        if i < resumes {
            edges.push(PinTransaction::set(State::High));
        }
        if i < suspends {
            edges.push(PinTransaction::set(State::Low));
        }
    }
    let pin = PinMock::new(&edges);
    let dev = Cs5368::attach(
        MockBus::new(),
        ResetLine::new(pin.clone(), Polarity::ActiveLow),
        MockRegulators::new(),
    )
    .unwrap();
    (dev, pin)
}

fn cache_snapshot(dev: &Device) -> Vec<(Register, Option<u8>)> {
    Register::ALL
        .iter()
        .filter(|reg| **reg != Register::RevisionId)
        .map(|&reg| (reg, dev.registers().cached(reg.addr())))
        .collect()
}

#[test]
fn round_trip_restores_post_init_cache() {
    let (mut dev, mut pin) = device(2, 1);
    dev.resume().unwrap();
    let after_init = cache_snapshot(&dev);

    dev.suspend().unwrap();
    dev.registers_mut().bus_mut().power_cycle();
    dev.resume().unwrap();

    assert_eq!(cache_snapshot(&dev), after_init);
    // And the chip holds it again.
    let bus = dev.registers().bus();
    assert_eq!(bus.register(0x01), 0x8B);
    assert_eq!(bus.register(0x03), 0x00);
    assert_eq!(bus.register(0x0A), 0x0A);

    drop(dev);
    pin.done();
}

#[test]
fn every_resume_replays_the_full_non_default_state() {
    let (mut dev, mut pin) = device(2, 1);
    dev.resume().unwrap();
    let hpf = *dev.find_control("AIN1 High-Pass Filter Switch").unwrap();
    dev.set_switch(&hpf, false).unwrap();
    dev.suspend().unwrap();
    dev.registers_mut().bus_mut().clear_log();

    dev.resume().unwrap();
    let writes: Vec<_> = dev.registers().bus().writes().collect();
    assert_eq!(writes, [(0x01, 0x8B), (0x03, 0x00), (0x04, 0x01), (0x0A, 0x0A)]);

    drop(dev);
    pin.done();
}

#[test]
fn redundant_resume_touches_nothing() {
    let (mut dev, mut pin) = device(1, 0);
    dev.runtime_resume().unwrap();
    dev.registers_mut().bus_mut().clear_log();
    let before = cache_snapshot(&dev);

    let t = dev.runtime_resume().unwrap();
    assert_eq!(t, PowerTransition::Unchanged(PowerState::Active));
    assert_eq!(t.state(), PowerState::Active);
    assert!(dev.registers().bus().log().is_empty());
    assert_eq!(cache_snapshot(&dev), before);
    assert_eq!(dev.regulators().enable_count, 1);

    drop(dev);
    pin.done();
}

#[test]
fn suspended_device_issues_no_bus_traffic() {
    let (mut dev, mut pin) = device(1, 1);
    dev.resume().unwrap();
    dev.suspend().unwrap();
    dev.registers_mut().bus_mut().clear_log();

    let ctl = *dev.find_control("AIN4 Capture Switch").unwrap();
    dev.set_switch(&ctl, false).unwrap();
    assert!(!dev.get_switch(&ctl).unwrap());
    let adc = dev.routing().find("AIN78").unwrap();
    dev.set_converter_powered(adc, false).unwrap();

    assert!(dev.registers().bus().log().is_empty());
    assert!(dev.registers().is_dirty());

    drop(dev);
    pin.done();
}

#[test]
fn overflow_status_is_read_even_while_suspended() {
    let (mut dev, mut pin) = device(0, 0);
    dev.registers_mut().bus_mut().set_register(0x02, 0x10);

    assert_eq!(dev.overflow_status().unwrap(), 0x10);
    assert_eq!(dev.registers().bus().log(), [BusOp::Read(0x02)]);

    drop(dev);
    pin.done();
}

#[test]
fn runtime_pm_trait_reports_state() {
    let (mut dev, mut pin) = device(1, 1);
    assert_eq!(dev.power_state(), PowerState::Suspended);
    assert_eq!(
        dev.runtime_resume().unwrap(),
        PowerTransition::Completed(PowerState::Active)
    );
    assert_eq!(
        dev.runtime_suspend().unwrap(),
        PowerTransition::Completed(PowerState::Suspended)
    );
    assert_eq!(dev.regulators().disable_count, 1);
    assert!(!dev.regulators().enabled);

    drop(dev);
    pin.done();
}

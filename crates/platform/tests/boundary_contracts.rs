//! Contract tests for the hardware and framework boundary types.
//! Checked against embedded-hal-mock so pin levels and bus bytes are exact.

#![allow(clippy::unwrap_used)]

use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use platform::{
    BusFraming, HwParams, I2cRegisterBus, PcmStreamCaps, Polarity, RegisterBus, RegulatorBulk,
    ResetLine, SampleFormat, StreamMismatch,
};

// ── I2cRegisterBus ───────────────────────────────────────────────────────────

#[test]
fn framing_masks_only_touch_the_address_byte() {
    let framing = BusFraming {
        read_flag_mask: 0x40,
        write_flag_mask: 0x80,
    };
    let mut i2c = I2cMock::new(&[
        I2cTransaction::write_read(0x4C, vec![0x42], vec![0x80]),
        I2cTransaction::write(0x4C, vec![0x81, 0x7F]),
    ]);
    let mut bus = I2cRegisterBus::new(i2c.clone(), 0x4C, framing);

    assert_eq!(bus.read(0x02).unwrap(), 0x80);
    bus.write(0x01, 0x7F).unwrap();
    assert_eq!(bus.address(), 0x4C);

    drop(bus);
    i2c.done();
}

#[test]
fn plain_framing_sends_the_address_unchanged() {
    let mut i2c = I2cMock::new(&[I2cTransaction::write(0x1A, vec![0x05, 0x00])]);
    let mut bus = I2cRegisterBus::new(i2c.clone(), 0x1A, BusFraming::PLAIN);
    bus.write(0x05, 0x00).unwrap();
    i2c = bus.release();
    i2c.done();
}

// ── ResetLine ────────────────────────────────────────────────────────────────

#[test]
fn active_low_reset_drives_low_to_assert() {
    let mut pin = PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]);
    let mut rst = ResetLine::new(pin.clone(), Polarity::ActiveLow);
    assert!(!rst.is_asserted(), "a fresh line has not been driven");

    rst.assert().unwrap();
    assert!(rst.is_asserted());
    rst.release().unwrap();
    assert!(!rst.is_asserted());

    drop(rst);
    pin.done();
}

#[test]
fn active_high_reset_is_mirrored() {
    let mut pin = PinMock::new(&[
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
    ]);
    let mut rst = ResetLine::new(pin.clone(), Polarity::ActiveHigh);
    rst.assert().unwrap();
    rst.release().unwrap();
    assert_eq!(rst.polarity(), Polarity::ActiveHigh);

    pin = rst.into_inner();
    pin.done();
}

// ── GpioSupplies ─────────────────────────────────────────────────────────────

#[test]
fn supplies_switch_every_rail() {
    let mut rails = [
        PinMock::new(&[PinTransaction::set(State::High), PinTransaction::set(State::Low)]),
        PinMock::new(&[PinTransaction::set(State::High), PinTransaction::set(State::Low)]),
    ];
    let mut supplies = platform::GpioSupplies::new(rails.clone());
    supplies.enable().unwrap();
    supplies.disable().unwrap();

    drop(supplies);
    for rail in &mut rails {
        rail.done();
    }
}

#[test]
fn always_on_never_fails() {
    let mut supplies = platform::AlwaysOn;
    assert!(supplies.enable().is_ok());
    assert!(supplies.disable().is_ok());
}

// ── PcmStreamCaps ────────────────────────────────────────────────────────────

const CAPS: PcmStreamCaps = PcmStreamCaps {
    stream_name: "Capture",
    channels_min: 2,
    channels_max: 8,
    rate_min: 2_000,
    rate_max: 216_000,
    format: SampleFormat::S32Le,
    sig_bits: 24,
};

#[test]
fn caps_accept_the_inclusive_bounds() {
    assert_eq!(CAPS.check(&HwParams::s32(2_000, 2)), Ok(()));
    assert_eq!(CAPS.check(&HwParams::s32(216_000, 8)), Ok(()));
}

#[test]
fn caps_report_the_first_mismatch() {
    assert_eq!(
        CAPS.check(&HwParams::s32(1_999, 2)),
        Err(StreamMismatch::Rate(1_999))
    );
    assert_eq!(
        CAPS.check(&HwParams::s32(48_000, 1)),
        Err(StreamMismatch::Channels(1))
    );
    let s16 = HwParams {
        format: SampleFormat::S16Le,
        ..HwParams::s32(48_000, 2)
    };
    assert_eq!(CAPS.check(&s16), Err(StreamMismatch::Format(SampleFormat::S16Le)));
}

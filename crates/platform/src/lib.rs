//! Hardware and framework boundary contracts for codec control drivers
//!
//! This crate provides the trait-based seams a codec driver is written
//! against, so the same control logic runs on a microcontroller, inside a
//! host test harness, or behind an emulated bus.
//!
//! # Architecture Layers
//!
//! ```text
//! Audio routing framework (stream lifecycle, mixer, DAPM)
//!         ↓ DaiOps / CodecComponent / RuntimePm
//! Codec control core (cs5368 crate)
//!         ↓ RegisterBus / ResetLine / RegulatorBulk
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! embedded-hal implementations (I2C peripheral, GPIO, PMIC)
//! ```
//!
//! # Modules
//!
//! - [`bus`] - Register-addressed control bus and its I2C framing
//! - [`gpio`] - Polarity-aware reset line
//! - [`power`] - Regulator bulk control and runtime power-management hooks
//! - [`dai`] - Digital audio interface negotiation types and hooks
//!
//! # Features
//!
//! - `std`: Enable standard library support (for testing)
//! - `defmt`: Enable defmt `Format` derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod bus;
pub mod dai;
pub mod gpio;
pub mod power;

pub use bus::{BusFraming, I2cRegisterBus, RegisterBus};
pub use dai::{
    ClockDirection, ClockInversion, ClockRole, CodecComponent, DaiDriverInfo, DaiFmt, DaiFormat,
    DaiOps, HwParams, PcmStreamCaps, SampleFormat, StreamMismatch, TdmSlots,
};
pub use gpio::{Polarity, ResetLine};
pub use power::{AlwaysOn, GpioSupplies, PowerState, PowerTransition, RegulatorBulk, RuntimePm};

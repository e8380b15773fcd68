//! Cirrus Logic CS5368 control core
//!
//! Control-plane driver for the CS5368 8-channel audio ADC on an I2C
//! control port and a TDM serial link. It brings the chip into a known
//! register state, negotiates the interface format and MCLK divider with
//! the bus master, exposes the per-channel HPF and capture switches,
//! describes the capture routing, and sequences runtime suspend/resume.
//!
//! # Architecture
//!
//! ```text
//! Audio routing framework
//!         ↓ DaiOps / CodecComponent / RuntimePm / routing queries
//! Cs5368 (driver, dai, power, controls, routing)
//!         ↓
//! RegisterCache (regmap) ── cache-only / dirty / resync
//!         ↓ RegisterBus / ResetLine / RegulatorBulk
//! platform crate → embedded-hal implementations
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cs5368::{Cs5368, Cs5368Config};
//! use platform::{DaiFmt, DaiFormat, ClockRole, ClockDirection, HwParams, TdmSlots};
//!
//! let mut adc = Cs5368::attach_i2c(i2c, reset_pin, rails, Cs5368Config::default())?;
//! adc.set_master_clock(24_576_000, ClockDirection::In)?;
//! adc.negotiate_format(DaiFormat::DspA, ClockRole::BcFc)?;
//! adc.negotiate_tdm(0xFF, 0xFF, 8, 32)?;
//! adc.resume()?;
//! adc.compute_clock_divider(48_000)?;
//! ```
//!
//! # Features
//!
//! - `defmt` - log through defmt (target builds)
//! - `tracing` - log through tracing (host builds)
//! - `std` - link the standard library (host tools)

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
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controls;
pub mod dai;
pub mod driver;
pub mod error;
pub mod mock;
pub mod power;
pub mod registers;
pub mod regmap;
pub mod routing;

pub use config::{Cs5368Config, DRIVER_NAME, OF_COMPATIBLE, SUPPLY_NAMES};
pub use controls::SwitchControl;
pub use dai::{clock_divider, ClockDivider, CAPTURE_CAPS, DAI_DRIVER};
pub use driver::Cs5368;
pub use error::{Error, PowerStep, Result, SequenceFault};
pub use registers::Register;
pub use regmap::RegisterCache;
pub use routing::{NodeId, RoutingError, RoutingGraph, Widget, WidgetKind};

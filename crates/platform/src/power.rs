//! Power management abstraction
//!
//! Provides the supply-rail interface a codec driver sequences against, and
//! the runtime power-management hooks the audio framework calls when a
//! device goes idle or becomes needed again.

use embedded_hal::digital::OutputPin;

/// A set of supply rails switched together.
///
/// Implementations must leave the rails in a consistent state on failure:
/// a failed `enable` rolls back the rails it already turned on, a failed
/// `disable` turns back on the rails it already turned off.
pub trait RegulatorBulk {
    /// Error type
    type Error: core::fmt::Debug;

    /// Turn every rail on.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Turn every rail off.
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Rails that are hard-wired on. Both operations succeed without effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysOn;

impl RegulatorBulk for AlwaysOn {
    type Error = core::convert::Infallible;

    fn enable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Rails switched by load-switch enable pins (active high), one per supply.
///
/// Rails are enabled in array order and disabled in reverse order.
pub struct GpioSupplies<P, const N: usize> {
    pins: [P; N],
}

impl<P: OutputPin, const N: usize> GpioSupplies<P, N> {
    /// Take ownership of the enable pins.
    pub fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    /// Give the pins back.
    pub fn into_inner(self) -> [P; N] {
        self.pins
    }
}

impl<P: OutputPin, const N: usize> RegulatorBulk for GpioSupplies<P, N> {
    type Error = P::Error;

    fn enable(&mut self) -> Result<(), Self::Error> {
        for done in 0..N {
            let Some((pin, before)) = self.pins.get_mut(..=done).and_then(<[P]>::split_last_mut)
            else {
                break;
            };
            if let Err(err) = pin.set_high() {
                for rail in before.iter_mut().rev() {
                    // Best effort: the first error is the one reported.
                    let _ = rail.set_low();
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        for start in (0..N).rev() {
            let Some((pin, after)) = self.pins.get_mut(start..).and_then(<[P]>::split_first_mut)
            else {
                break;
            };
            if let Err(err) = pin.set_low() {
                for rail in after.iter_mut() {
                    let _ = rail.set_high();
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Runtime power state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Rails off (or reset held); register traffic is cached only.
    #[default]
    Suspended,
    /// Rails on, reset released, registers in sync with the cache.
    Active,
}

/// Outcome of a runtime power hook that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerTransition {
    /// The device moved to the requested state.
    Completed(PowerState),
    /// The device was already in the requested state; nothing was touched.
    Unchanged(PowerState),
}

impl PowerTransition {
    /// State the device is in after the call.
    pub fn state(self) -> PowerState {
        match self {
            Self::Completed(state) | Self::Unchanged(state) => state,
        }
    }
}

/// Runtime power-management hooks invoked by the framework.
///
/// The framework serialises calls per device; implementations do no locking.
pub trait RuntimePm {
    /// Error type
    type Error: core::fmt::Debug;

    /// Device went idle: drop to the lowest power state.
    fn runtime_suspend(&mut self) -> Result<PowerTransition, Self::Error>;

    /// Device is needed: power up and restore register state.
    fn runtime_resume(&mut self) -> Result<PowerTransition, Self::Error>;

    /// Current power state.
    fn power_state(&self) -> PowerState;
}

//! Reset line abstraction
//!
//! Codec reset pins are usually active-low, but boards invert them through
//! level shifters often enough that the driver must not care. [`ResetLine`]
//! speaks in logical terms (asserted / released) and maps them onto the
//! electrical level through a [`Polarity`].

use embedded_hal::digital::{OutputPin, PinState};

/// Electrical level that holds the chip in reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Reset is asserted by driving the pin high.
    ActiveHigh,
    /// Reset is asserted by driving the pin low.
    #[default]
    ActiveLow,
}

impl Polarity {
    /// Electrical level for the logical `asserted` state.
    pub fn level(self, asserted: bool) -> PinState {
        match (self, asserted) {
            (Self::ActiveHigh, true) | (Self::ActiveLow, false) => PinState::High,
            (Self::ActiveHigh, false) | (Self::ActiveLow, true) => PinState::Low,
        }
    }
}

/// Reset output pin driven in logical terms.
pub struct ResetLine<P> {
    pin: P,
    polarity: Polarity,
    asserted: bool,
}

impl<P: OutputPin> ResetLine<P> {
    /// Wrap `pin`. The pin is not driven until the first [`assert`](Self::assert)
    /// or [`release`](Self::release).
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self {
            pin,
            polarity,
            asserted: false,
        }
    }

    /// Hold the chip in reset.
    pub fn assert(&mut self) -> Result<(), P::Error> {
        self.set(true)
    }

    /// Let the chip out of reset.
    pub fn release(&mut self) -> Result<(), P::Error> {
        self.set(false)
    }

    /// Drive the logical state. The cached state only changes once the pin
    /// accepted the new level.
    pub fn set(&mut self, asserted: bool) -> Result<(), P::Error> {
        self.pin.set_state(self.polarity.level(asserted))?;
        self.asserted = asserted;
        Ok(())
    }

    /// Last successfully driven logical state.
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Configured polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Give the pin back.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as MockState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::MockError;
    use std::io::ErrorKind;

    #[test]
    fn active_low_asserts_by_driving_low() {
        let mut pin = PinMock::new(&[
            PinTransaction::set(MockState::Low),
            PinTransaction::set(MockState::High),
        ]);
        let mut reset = ResetLine::new(pin.clone(), Polarity::ActiveLow);

        assert!(reset.assert().is_ok());
        assert!(reset.is_asserted());
        assert!(reset.release().is_ok());
        assert!(!reset.is_asserted());
        pin.done();
    }

    #[test]
    fn active_high_asserts_by_driving_high() {
        let mut pin = PinMock::new(&[PinTransaction::set(MockState::High)]);
        let mut reset = ResetLine::new(pin.clone(), Polarity::ActiveHigh);

        assert!(reset.assert().is_ok());
        assert!(reset.is_asserted());
        pin.done();
    }

    #[test]
    fn failed_drive_keeps_previous_state() {
        let mut pin = PinMock::new(&[
            PinTransaction::set(MockState::Low),
            PinTransaction::set(MockState::High)
                .with_error(MockError::Io(ErrorKind::NotConnected)),
        ]);
        let mut reset = ResetLine::new(pin.clone(), Polarity::ActiveLow);

        assert!(reset.assert().is_ok());
        assert!(reset.release().is_err());
        assert!(reset.is_asserted(), "state must not change on a failed drive");
        pin.done();
    }

    #[test]
    fn default_polarity_is_active_low() {
        assert_eq!(Polarity::default(), Polarity::ActiveLow);
        assert_eq!(Polarity::ActiveLow.level(true), PinState::Low);
        assert_eq!(Polarity::ActiveHigh.level(false), PinState::Low);
    }
}

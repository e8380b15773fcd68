//! Runtime power sequencing
//!
//! ```text
//!            resume: rails on → reset off → live → resync
//! Suspended ───────────────────────────────────────────────▶ Active
//!           ◀───────────────────────────────────────────────
//!            suspend: cache-only → reset on → rails off
//! ```
//!
//! Each step runs only if the previous one succeeded. A failure stops the
//! sequence where it is: nothing is rolled back, because a half-sequenced
//! chip cannot be put back reliably from here. The state only changes once
//! the last step succeeded, so a failed transition can be retried.

use embedded_hal::digital::OutputPin;
use platform::{PowerState, PowerTransition, RegisterBus, RegulatorBulk, RuntimePm};

use crate::driver::Cs5368;
use crate::error::{Error, PowerStep, Result, SequenceFault};

impl<B, RST, REG> Cs5368<B, RST, REG>
where
    B: RegisterBus,
    RST: OutputPin,
    REG: RegulatorBulk,
{
    /// Take an active chip down.
    ///
    /// The register store goes cache-only before the rails drop, so writes
    /// made while suspended are kept for the next resume. On a regulator
    /// failure the chip is left in reset with its rails still on, and the
    /// device stays [`PowerState::Active`].
    pub fn suspend(&mut self) -> Result<PowerTransition, B::Error> {
        if self.state == PowerState::Suspended {
            warn!("suspend requested while already suspended");
            return Ok(PowerTransition::Unchanged(self.state));
        }
        debug!("suspending");

        self.regmap.set_cache_only(true);

        if self.reset.assert().is_err() {
            error!("failed to assert reset line");
            return Err(Error::sequence(
                PowerStep::AssertReset,
                SequenceFault::ResetLine,
            ));
        }

        if self.regulators.disable().is_err() {
            error!("regulator bulk disable failed");
            return Err(Error::sequence(
                PowerStep::DisableRegulators,
                SequenceFault::Regulator,
            ));
        }

        self.state = PowerState::Suspended;
        info!("suspended");
        Ok(PowerTransition::Completed(self.state))
    }

    /// Bring a suspended chip up and replay the register cache to it.
    ///
    /// The replay includes the initialisation sequence and anything written
    /// while suspended.
    pub fn resume(&mut self) -> Result<PowerTransition, B::Error> {
        if self.state == PowerState::Active {
            warn!("resume requested while already active");
            return Ok(PowerTransition::Unchanged(self.state));
        }
        debug!("resuming");

        if self.regulators.enable().is_err() {
            error!("regulator bulk enable failed");
            return Err(Error::sequence(
                PowerStep::EnableRegulators,
                SequenceFault::Regulator,
            ));
        }

        if self.reset.release().is_err() {
            error!("failed to release reset line");
            return Err(Error::sequence(
                PowerStep::ReleaseReset,
                SequenceFault::ResetLine,
            ));
        }

        self.regmap.set_cache_only(false);
        self.regmap.mark_dirty();
        let written = match self.regmap.resync() {
            Ok(written) => written,
            Err(Error::Transport(err)) => {
                error!("register resync failed");
                return Err(Error::sequence(
                    PowerStep::Resync,
                    SequenceFault::Transport(err),
                ));
            }
            Err(other) => return Err(other),
        };

        self.state = PowerState::Active;
        info!("resumed, {} registers restored", written);
        Ok(PowerTransition::Completed(self.state))
    }
}

impl<B, RST, REG> RuntimePm for Cs5368<B, RST, REG>
where
    B: RegisterBus,
    RST: OutputPin,
    REG: RegulatorBulk,
{
    type Error = Error<B::Error>;

    fn runtime_suspend(&mut self) -> core::result::Result<PowerTransition, Self::Error> {
        self.suspend()
    }

    fn runtime_resume(&mut self) -> core::result::Result<PowerTransition, Self::Error> {
        self.resume()
    }

    fn power_state(&self) -> PowerState {
        self.state
    }
}

//! Error types
//!
//! Every failure is returned to the immediate caller. Nothing here is
//! retried: a failed bus transfer or power step is reported as-is and the
//! hardware is left in whatever state the last attempted step produced.

use platform::{ClockDirection, ClockRole, DaiFormat};
use thiserror_no_std::Error;

use crate::routing::RoutingError;

/// Step of a power transition, in the order the sequencer runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerStep {
    /// Drive the reset line to its asserted level.
    AssertReset,
    /// Turn the supply rails off.
    DisableRegulators,
    /// Turn the supply rails on.
    EnableRegulators,
    /// Let the chip out of reset.
    ReleaseReset,
    /// Replay the register cache to the chip.
    Resync,
}

impl core::fmt::Display for PowerStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::AssertReset => "assert reset",
            Self::DisableRegulators => "disable regulators",
            Self::EnableRegulators => "enable regulators",
            Self::ReleaseReset => "release reset",
            Self::Resync => "register resync",
        };
        f.write_str(name)
    }
}

/// What failed inside a power step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceFault<E> {
    /// The reset GPIO rejected the new level.
    #[error("reset line did not accept the new level")]
    ResetLine,
    /// The regulator bulk operation failed.
    #[error("regulator bulk operation failed")]
    Regulator,
    /// A register write of the resync failed.
    #[error("register write failed: {0:?}")]
    Transport(E),
}

/// Errors returned by the codec core. `E` is the control-bus error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Reserved, out-of-range, or access-protected register.
    #[error("register {0:#04x} is not accessible for this operation")]
    InvalidAddress(u8),
    /// Control-bus transfer failed.
    #[error("control bus transfer failed: {0:?}")]
    Transport(E),
    /// Interface format other than I2S or DSP_A.
    #[error("unsupported interface format {0:?}, only I2S or DSP_A TDM formats")]
    UnsupportedFormat(DaiFormat),
    /// The codec was asked to provide bit or frame clock.
    #[error("unsupported clock role {0:?}, codec only consumes bit and frame clock")]
    UnsupportedClockRole(ClockRole),
    /// The codec was asked to generate its master clock.
    #[error("unsupported clock direction {0:?}, master clock must be an input")]
    UnsupportedClockDirection(ClockDirection),
    /// TDM slot count other than 2, 4 or 8.
    #[error("unsupported TDM slot count {0}, codec requires 8, 4 or 2 slots")]
    UnsupportedSlotCount(u32),
    /// TDM slot width other than 32 bits.
    #[error("unsupported TDM slot width {0}, codec requires 32-bit slots")]
    UnsupportedSlotWidth(u32),
    /// MCLK / rate / LRCK ratio has no divider code.
    #[error("unsupported master clock divider {0}")]
    UnsupportedClockDivider(u32),
    /// Routing query named the wrong kind of widget.
    #[error("routing query failed: {0}")]
    Routing(#[from] RoutingError),
    /// A power transition stopped partway.
    #[error("power sequence aborted at {step}: {fault}")]
    Sequence {
        /// Step that failed; later steps were not attempted.
        step: PowerStep,
        /// Failure detail.
        fault: SequenceFault<E>,
    },
}

impl<E> Error<E> {
    pub(crate) fn sequence(step: PowerStep, fault: SequenceFault<E>) -> Self {
        Self::Sequence { step, fault }
    }
}

/// Result alias for codec operations.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

//! Board configuration and driver identity constants
//!
//! How a board finds these values (device tree, a const in the BSP, a
//! settings file) is up to the integrator; this module only fixes their
//! shape and the values that hold for the reference wiring.

use platform::Polarity;

/// Driver name registered with the audio framework.
pub const DRIVER_NAME: &str = "cs5368";

/// Device-tree compatible string.
pub const OF_COMPATIBLE: &str = "cirrus,cs5368";

/// Supply rails, in the order the regulator bulk is built.
pub const SUPPLY_NAMES: [&str; 5] = ["va", "vd", "vlc", "vls", "vx"];

/// CS5368 7-bit I2C addresses.
///
/// The upper five bits are fixed at `0b10011`; the AD1/AD0 strap pins
/// select the low two.
pub struct I2cAddresses;

impl I2cAddresses {
    /// AD1 = 0, AD0 = 0.
    pub const AD_00: u8 = 0x4C;
    /// AD1 = 0, AD0 = 1.
    pub const AD_01: u8 = 0x4D;
    /// AD1 = 1, AD0 = 0.
    pub const AD_10: u8 = 0x4E;
    /// AD1 = 1, AD0 = 1.
    pub const AD_11: u8 = 0x4F;

    /// `true` if `addr` is one the strap pins can select.
    pub const fn is_valid(addr: u8) -> bool {
        addr & !0x03 == Self::AD_00
    }
}

/// Per-board wiring of one CS5368.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cs5368Config {
    /// 7-bit I2C address.
    pub i2c_address: u8,
    /// Electrical level that holds the chip in reset.
    pub reset_polarity: Polarity,
}

impl Default for Cs5368Config {
    /// Both address straps low, `RST` wired straight to a GPIO.
    fn default() -> Self {
        Self {
            i2c_address: I2cAddresses::AD_00,
            reset_polarity: Polarity::ActiveLow,
        }
    }
}

//! CS5368 register map
//!
//! Source: Cirrus Logic CS5368 / CS5366 datasheet, "Register Map" section.
//!
//! Eight registers live at 0x00–0x0A; 0x05, 0x07 and 0x09 are reserved and
//! must never be accessed. Access rules are expressed as `const fn` matches
//! over [`Register`] so they cannot drift from the map at runtime.
//!
//! # Control bus framing
//!
//! The chip keeps its address pointer after a transfer unless the `INCR`
//! bit (address bit 7) is set, so every address byte goes out with 0x80
//! OR-ed in. See [`BUS_FRAMING`].
//!
//! # Global Control (0x01)
//!
//! | Bits | Field   | Value used |
//! |------|---------|------------|
//! | 7    | CP-EN   | 1, control-port mode |
//! | 6    | CLKMODE | 0 |
//! | 5:4  | MDIV    | set per stream from the MCLK/LRCK ratio |
//! | 3:2  | DIF     | 0b10, TDM |
//! | 1:0  | MODE    | 0b11, follower (slave) clocking |

use platform::BusFraming;

/// Highest valid register address.
pub const MAX_REG: u8 = 0x0A;

/// Address flag that selects auto-incrementing access.
pub const REG_INCR: u8 = 0x80;

/// Transport framing for the CS5368 control port.
pub const BUS_FRAMING: BusFraming = BusFraming::symmetric(REG_INCR);

/// The addressable (non-reserved) registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Revision ID (REVI), read-only.
    RevisionId = 0x00,
    /// Global Control (GCTL).
    GlobalControl = 0x01,
    /// Overflow Status (OVFL), read-only and volatile.
    OverflowStatus = 0x02,
    /// Overflow Mask (OVFM).
    OverflowMask = 0x03,
    /// High-Pass Filter disable (HPF), one bit per channel.
    HighPassFilter = 0x04,
    /// Power-Down (PDN), one bit per converter pair.
    PowerDown = 0x06,
    /// Mute (MUTE), one bit per channel.
    Mute = 0x08,
    /// Serial Data Enable (SDEN), one bit per output pin.
    SerialDataEnable = 0x0A,
}

impl Register {
    /// Number of addressable registers.
    pub const COUNT: usize = 8;

    /// Every addressable register in ascending address order.
    pub const ALL: [Register; Self::COUNT] = [
        Register::RevisionId,
        Register::GlobalControl,
        Register::OverflowStatus,
        Register::OverflowMask,
        Register::HighPassFilter,
        Register::PowerDown,
        Register::Mute,
        Register::SerialDataEnable,
    ];

    /// Register for `addr`, or `None` for reserved and out-of-range addresses.
    pub const fn from_addr(addr: u8) -> Option<Self> {
        match addr {
            0x00 => Some(Self::RevisionId),
            0x01 => Some(Self::GlobalControl),
            0x02 => Some(Self::OverflowStatus),
            0x03 => Some(Self::OverflowMask),
            0x04 => Some(Self::HighPassFilter),
            0x06 => Some(Self::PowerDown),
            0x08 => Some(Self::Mute),
            0x0A => Some(Self::SerialDataEnable),
            _ => None,
        }
    }

    /// Bus address.
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Position in [`Register::ALL`]; used as the cache slot.
    pub const fn index(self) -> usize {
        match self {
            Self::RevisionId => 0,
            Self::GlobalControl => 1,
            Self::OverflowStatus => 2,
            Self::OverflowMask => 3,
            Self::HighPassFilter => 4,
            Self::PowerDown => 5,
            Self::Mute => 6,
            Self::SerialDataEnable => 7,
        }
    }

    /// Power-on value.
    ///
    /// REVI assumes revision A until the chip is read.
    pub const fn default_value(self) -> u8 {
        match self {
            Self::RevisionId => 0x80,
            Self::OverflowStatus | Self::OverflowMask => 0xFF,
            Self::GlobalControl
            | Self::HighPassFilter
            | Self::PowerDown
            | Self::Mute
            | Self::SerialDataEnable => 0x00,
        }
    }

    /// Every addressable register is readable.
    pub const fn is_readable(self) -> bool {
        true
    }

    /// REVI and OVFL are read-only.
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::RevisionId | Self::OverflowStatus)
    }

    /// OVFL latches overflow events in hardware; its cached value is never trusted.
    pub const fn is_volatile(self) -> bool {
        matches!(self, Self::OverflowStatus)
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        reg.addr()
    }
}

/// `true` if `addr` may be read.
pub const fn is_readable(addr: u8) -> bool {
    match Register::from_addr(addr) {
        Some(reg) => reg.is_readable(),
        None => false,
    }
}

/// `true` if `addr` may be written.
pub const fn is_writable(addr: u8) -> bool {
    match Register::from_addr(addr) {
        Some(reg) => reg.is_writable(),
        None => false,
    }
}

/// `true` if `addr` must always be read from the bus.
pub const fn is_volatile(addr: u8) -> bool {
    match Register::from_addr(addr) {
        Some(reg) => reg.is_volatile(),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Global Control fields
// ---------------------------------------------------------------------------

/// GCTL: control-port mode enable.
pub const GCTL_CP_EN: u8 = 1 << 7;

/// GCTL: DIF = TDM.
pub const GCTL_DIF_TDM: u8 = 0b10 << 2;

/// GCTL: MODE = follower clocking.
pub const GCTL_MODE_SLAVE: u8 = 0b11;

/// GCTL: MCLK divider field.
pub const GCTL_MDIV_MASK: u8 = 0x30;

/// GCTL: MCLK divider field position.
pub const GCTL_MDIV_SHIFT: u8 = 4;

// ---------------------------------------------------------------------------
// Initialisation sequence
// ---------------------------------------------------------------------------

/// Register writes applied once at attach and replayed by every resync.
pub const INIT_SEQUENCE: [(Register, u8); 3] = [
    // CP-EN, TDM format, follower clocking
    (
        Register::GlobalControl,
        GCTL_CP_EN | GCTL_DIF_TDM | GCTL_MODE_SLAVE,
    ),
    // Unmask every overflow
    (Register::OverflowMask, 0x00),
    // Only the TDM and TDM-bar pins drive data
    (Register::SerialDataEnable, 0x0A),
];

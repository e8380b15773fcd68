//! Mixer controls exposed to the audio framework
//!
//! Sixteen boolean switches, one HPF and one capture switch per input. Both
//! banks are inverted: the register bit disables the feature, the switch
//! reports it enabled.

use crate::registers::Register;

/// A single-bit boolean control backed by a register bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchControl {
    /// Control name as registered with the mixer.
    pub name: &'static str,
    /// Register holding the bit.
    pub reg: Register,
    /// Bit position.
    pub shift: u8,
    /// Switch on means bit clear.
    pub invert: bool,
}

impl SwitchControl {
    const fn inverted(name: &'static str, reg: Register, shift: u8) -> Self {
        Self {
            name,
            reg,
            shift,
            invert: true,
        }
    }

    /// Register mask of the backing bit.
    pub const fn mask(&self) -> u8 {
        1u8.wrapping_shl(self.shift as u32)
    }

    /// Switch state for a register value.
    pub const fn decode(&self, reg_value: u8) -> bool {
        let bit = reg_value & self.mask() != 0;
        bit != self.invert
    }

    /// Register bits (under [`mask`](Self::mask)) for a switch state.
    pub const fn encode(&self, on: bool) -> u8 {
        if on == self.invert {
            0
        } else {
            self.mask()
        }
    }
}

/// Per-channel high-pass filter switches (HPF register, 0x04).
pub static HPF_SWITCHES: [SwitchControl; 8] = [
    SwitchControl::inverted("AIN1 High-Pass Filter Switch", Register::HighPassFilter, 0),
    SwitchControl::inverted("AIN2 High-Pass Filter Switch", Register::HighPassFilter, 1),
    SwitchControl::inverted("AIN3 High-Pass Filter Switch", Register::HighPassFilter, 2),
    SwitchControl::inverted("AIN4 High-Pass Filter Switch", Register::HighPassFilter, 3),
    SwitchControl::inverted("AIN5 High-Pass Filter Switch", Register::HighPassFilter, 4),
    SwitchControl::inverted("AIN6 High-Pass Filter Switch", Register::HighPassFilter, 5),
    SwitchControl::inverted("AIN7 High-Pass Filter Switch", Register::HighPassFilter, 6),
    SwitchControl::inverted("AIN8 High-Pass Filter Switch", Register::HighPassFilter, 7),
];

/// Per-channel capture switches (MUTE register, 0x08). These gate the
/// routing graph's switch widgets.
pub static CAPTURE_SWITCHES: [SwitchControl; 8] = [
    SwitchControl::inverted("AIN1 Capture Switch", Register::Mute, 0),
    SwitchControl::inverted("AIN2 Capture Switch", Register::Mute, 1),
    SwitchControl::inverted("AIN3 Capture Switch", Register::Mute, 2),
    SwitchControl::inverted("AIN4 Capture Switch", Register::Mute, 3),
    SwitchControl::inverted("AIN5 Capture Switch", Register::Mute, 4),
    SwitchControl::inverted("AIN6 Capture Switch", Register::Mute, 5),
    SwitchControl::inverted("AIN7 Capture Switch", Register::Mute, 6),
    SwitchControl::inverted("AIN8 Capture Switch", Register::Mute, 7),
];

/// Every control, HPF bank first.
pub fn all() -> impl Iterator<Item = &'static SwitchControl> {
    HPF_SWITCHES.iter().chain(CAPTURE_SWITCHES.iter())
}

/// Look a control up by its mixer name.
pub fn find(name: &str) -> Option<&'static SwitchControl> {
    all().find(|ctl| ctl.name == name)
}

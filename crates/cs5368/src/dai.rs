//! Interface format and clock negotiation
//!
//! The codec is always a clock follower on a TDM link. Negotiation only
//! validates; the one register it touches is the MCLK divider field of
//! Global Control, chosen per stream from the sample rate and the master
//! clock announced earlier.

use embedded_hal::digital::OutputPin;
use platform::{
    ClockDirection, ClockRole, CodecComponent, DaiDriverInfo, DaiFmt, DaiFormat, DaiOps,
    HwParams, PcmStreamCaps, RegisterBus, RegulatorBulk, SampleFormat, TdmSlots,
};

use crate::driver::Cs5368;
use crate::error::{Error, Result};
use crate::registers::{Register, GCTL_MDIV_MASK, GCTL_MDIV_SHIFT};

/// Name of the capture PCM stream.
pub const CAPTURE_STREAM: &str = "Capture";

/// Capture capabilities: 2 to 8 channels, continuous 2 kHz to 216 kHz,
/// 24 significant bits in 32-bit little-endian containers.
pub const CAPTURE_CAPS: PcmStreamCaps = PcmStreamCaps {
    stream_name: CAPTURE_STREAM,
    channels_min: 2,
    channels_max: 8,
    rate_min: 2_000,
    rate_max: 216_000,
    format: SampleFormat::S32Le,
    sig_bits: 24,
};

/// Capture-only DAI descriptor.
pub const DAI_DRIVER: DaiDriverInfo = DaiDriverInfo {
    name: crate::config::DRIVER_NAME,
    capture: Some(CAPTURE_CAPS),
    playback: None,
};

/// TDM slot counts the serial port can frame.
pub const SUPPORTED_SLOT_COUNTS: [u32; 3] = [2, 4, 8];

/// TDM slot width in bits.
pub const SLOT_WIDTH: u32 = 32;

/// Outcome of the MCLK divider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivider {
    /// MCLK cycles per LRCK period at the divided clock.
    pub lrck_speed: u32,
    /// MCLK / (rate * lrck_speed).
    pub mclk_div: u32,
    /// Value of the GCTL MDIV field.
    pub code: u8,
}

/// LRCK ratio for the speed band `sample_rate` falls in.
///
/// Single speed (< 54 kHz) runs at 256x, double speed (< 108 kHz) at 128x,
/// quad speed at 64x.
pub const fn lrck_speed(sample_rate: u32) -> u32 {
    if sample_rate < 54_000 {
        256
    } else if sample_rate < 108_000 {
        128
    } else {
        64
    }
}

/// Pick the divider for `mclk_freq` and `sample_rate`.
///
/// Only MCLK/1, /2 and /4 exist, coded 0, 1 and 3; code 2 is never used.
/// `Err` carries the unsupported `mclk_div` (0 for a zero sample rate).
pub const fn clock_divider(
    mclk_freq: u32,
    sample_rate: u32,
) -> core::result::Result<ClockDivider, u32> {
    let lrck_speed = lrck_speed(sample_rate);
    let Some(per_frame) = mclk_freq.checked_div(sample_rate) else {
        return Err(0);
    };
    let Some(mclk_div) = per_frame.checked_div(lrck_speed) else {
        return Err(0);
    };
    let code = match mclk_div {
        1 => 0,
        2 => 1,
        4 => 3,
        other => return Err(other),
    };
    Ok(ClockDivider {
        lrck_speed,
        mclk_div,
        code,
    })
}

impl<B, RST, REG> Cs5368<B, RST, REG>
where
    B: RegisterBus,
    RST: OutputPin,
    REG: RegulatorBulk,
{
    /// Record the master clock frequency. The codec cannot drive MCLK, so
    /// only [`ClockDirection::In`] is accepted.
    pub fn set_master_clock(
        &mut self,
        frequency: u32,
        direction: ClockDirection,
    ) -> Result<(), B::Error> {
        if direction != ClockDirection::In {
            error!("driver currently only supports clock input");
            return Err(Error::UnsupportedClockDirection(direction));
        }
        self.mclk_freq = frequency;
        debug!("mclk = {} Hz", frequency);
        Ok(())
    }

    /// Accept I2S or DSP_A framing with the codec as bit and frame clock
    /// consumer. Nothing is stored.
    pub fn negotiate_format(
        &mut self,
        format: DaiFormat,
        clock_role: ClockRole,
    ) -> Result<(), B::Error> {
        if !matches!(format, DaiFormat::I2s | DaiFormat::DspA) {
            error!("codec only supports I2S or DSP_A TDM formats");
            return Err(Error::UnsupportedFormat(format));
        }
        if clock_role != ClockRole::BcFc {
            error!("driver currently only supports clock slave mode");
            return Err(Error::UnsupportedClockRole(clock_role));
        }
        Ok(())
    }

    /// Accept a TDM geometry of 2, 4 or 8 slots of 32 bits. The slot masks
    /// are not checked. Once accepted, TDM stays enabled.
    pub fn negotiate_tdm(
        &mut self,
        tx_mask: u32,
        rx_mask: u32,
        slot_count: u32,
        slot_width: u32,
    ) -> Result<(), B::Error> {
        if !SUPPORTED_SLOT_COUNTS.contains(&slot_count) {
            error!("codec requires 8, 4 or 2 TDM slots, got {}", slot_count);
            return Err(Error::UnsupportedSlotCount(slot_count));
        }
        if slot_width != SLOT_WIDTH {
            error!("codec requires 32-bit TDM slot width, got {}", slot_width);
            return Err(Error::UnsupportedSlotWidth(slot_width));
        }
        trace!("tdm masks tx={:#x} rx={:#x}", tx_mask, rx_mask);
        self.tdm = true;
        Ok(())
    }

    /// Select the MCLK divider for `sample_rate` and program it into GCTL.
    ///
    /// Goes through the register store, so while suspended the code is only
    /// cached and reaches the chip on the next resume.
    pub fn compute_clock_divider(&mut self, sample_rate: u32) -> Result<ClockDivider, B::Error> {
        let divider = clock_divider(self.mclk_freq, sample_rate).map_err(|mclk_div| {
            error!("unknown mclk divider {}", mclk_div);
            Error::UnsupportedClockDivider(mclk_div)
        })?;

        let field = divider.code.wrapping_shl(u32::from(GCTL_MDIV_SHIFT));
        if let Err(err) =
            self.regmap
                .write_bits(Register::GlobalControl.addr(), GCTL_MDIV_MASK, field)
        {
            error!("failed to set mclk divider");
            return Err(err);
        }

        debug!(
            "rate {} Hz: lrck x{}, mclk/{}, code {}",
            sample_rate,
            divider.lrck_speed,
            divider.mclk_div,
            divider.code
        );
        Ok(divider)
    }
}

impl<B, RST, REG> CodecComponent for Cs5368<B, RST, REG>
where
    B: RegisterBus,
    RST: OutputPin,
    REG: RegulatorBulk,
{
    type Error = Error<B::Error>;

    fn set_sysclk(
        &mut self,
        _clk_id: u32,
        _source: u32,
        freq: u32,
        dir: ClockDirection,
    ) -> core::result::Result<(), Self::Error> {
        self.set_master_clock(freq, dir)
    }
}

impl<B, RST, REG> DaiOps for Cs5368<B, RST, REG>
where
    B: RegisterBus,
    RST: OutputPin,
    REG: RegulatorBulk,
{
    type Error = Error<B::Error>;

    fn hw_params(&mut self, params: &HwParams) -> core::result::Result<(), Self::Error> {
        self.compute_clock_divider(params.rate).map(|_| ())
    }

    fn set_fmt(&mut self, fmt: DaiFmt) -> core::result::Result<(), Self::Error> {
        self.negotiate_format(fmt.format, fmt.clock_role)
    }

    fn set_tdm_slot(&mut self, slots: TdmSlots) -> core::result::Result<(), Self::Error> {
        self.negotiate_tdm(slots.tx_mask, slots.rx_mask, slots.slots, slots.slot_width)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn divider_for_48k_from_24_576_mhz() {
        let div = clock_divider(24_576_000, 48_000).unwrap();
        assert_eq!(
            div,
            ClockDivider {
                lrck_speed: 256,
                mclk_div: 2,
                code: 1
            }
        );
    }

    #[test]
    fn divider_for_96k_from_24_576_mhz() {
        let div = clock_divider(24_576_000, 96_000).unwrap();
        assert_eq!((div.lrck_speed, div.mclk_div, div.code), (128, 2, 1));
    }

    #[test]
    fn divider_for_44k1_from_11_2896_mhz() {
        let div = clock_divider(11_289_600, 44_100).unwrap();
        assert_eq!((div.lrck_speed, div.mclk_div, div.code), (256, 1, 0));
    }

    #[test]
    fn divider_by_four_uses_code_three() {
        let div = clock_divider(49_152_000, 48_000).unwrap();
        assert_eq!((div.mclk_div, div.code), (4, 3));
    }

    #[test]
    fn divider_rejects_three_and_zero() {
        // 36.864 MHz / 48 kHz / 256 = 3
        assert_eq!(clock_divider(36_864_000, 48_000), Err(3));
        // No MCLK announced yet
        assert_eq!(clock_divider(0, 48_000), Err(0));
        assert_eq!(clock_divider(24_576_000, 0), Err(0));
    }

    #[test]
    fn speed_band_edges() {
        assert_eq!(lrck_speed(53_999), 256);
        assert_eq!(lrck_speed(54_000), 128);
        assert_eq!(lrck_speed(107_999), 128);
        assert_eq!(lrck_speed(108_000), 64);
        assert_eq!(lrck_speed(192_000), 64);
    }

    #[test]
    fn descriptor_is_capture_only() {
        assert_eq!(DAI_DRIVER.name, "cs5368");
        assert!(DAI_DRIVER.playback.is_none());
        let caps = DAI_DRIVER.capture.unwrap();
        assert_eq!(caps.stream_name, "Capture");
        assert_eq!((caps.channels_min, caps.channels_max), (2, 8));
        assert_eq!(caps.sig_bits, 24);
    }
}

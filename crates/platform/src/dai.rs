//! Digital audio interface (DAI) negotiation types and hooks
//!
//! The audio framework negotiates a stream with a codec in a fixed order:
//! master clock announcement ([`CodecComponent::set_sysclk`]), interface
//! format ([`DaiOps::set_fmt`]), optional TDM slot geometry
//! ([`DaiOps::set_tdm_slot`]), then per-stream parameters
//! ([`DaiOps::hw_params`]). The codec rejects anything it cannot do; the
//! framework is responsible for trying something else.

/// Serial audio frame format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DaiFormat {
    /// Philips I2S: data delayed one bit clock after the frame edge.
    I2s,
    /// Right justified.
    RightJ,
    /// Left justified.
    LeftJ,
    /// DSP mode A: short frame pulse, data one bit clock after the pulse.
    DspA,
    /// DSP mode B: short frame pulse, data on the pulse.
    DspB,
    /// AC'97 link.
    Ac97,
    /// Pulse-density modulation.
    Pdm,
}

/// Which side provides bit clock and frame clock, from the codec's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRole {
    /// Codec consumes both bit clock and frame clock (bus controller clocks).
    BcFc,
    /// Codec provides bit clock, consumes frame clock.
    BpFc,
    /// Codec consumes bit clock, provides frame clock.
    BcFp,
    /// Codec provides both bit clock and frame clock.
    BpFp,
}

/// Clock edge / frame polarity inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockInversion {
    /// Normal bit clock and frame.
    #[default]
    NbNf,
    /// Normal bit clock, inverted frame.
    NbIf,
    /// Inverted bit clock, normal frame.
    IbNf,
    /// Inverted bit clock and frame.
    IbIf,
}

/// Direction of a system clock relative to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDirection {
    /// Clock is supplied to the codec.
    In,
    /// Clock is generated by the codec.
    Out,
}

/// Complete interface format request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiFmt {
    /// Frame format.
    pub format: DaiFormat,
    /// Clock provider/consumer roles.
    pub clock_role: ClockRole,
    /// Clock inversion.
    pub inversion: ClockInversion,
}

impl DaiFmt {
    /// Format with normal clock polarity.
    pub const fn new(format: DaiFormat, clock_role: ClockRole) -> Self {
        Self {
            format,
            clock_role,
            inversion: ClockInversion::NbNf,
        }
    }
}

/// TDM slot geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TdmSlots {
    /// Active transmit slots bitmap.
    pub tx_mask: u32,
    /// Active receive slots bitmap.
    pub rx_mask: u32,
    /// Slots per frame.
    pub slots: u32,
    /// Bits per slot.
    pub slot_width: u32,
}

/// PCM sample format on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleFormat {
    /// Signed 16-bit little endian.
    S16Le,
    /// Signed 24-bit in 32-bit container, little endian.
    S24Le,
    /// Signed 32-bit little endian.
    S32Le,
}

/// Per-stream hardware parameters passed to [`DaiOps::hw_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HwParams {
    /// Frame rate in Hz.
    pub rate: u32,
    /// Channels per frame.
    pub channels: u8,
    /// Sample format.
    pub format: SampleFormat,
}

impl HwParams {
    /// 32-bit samples at `rate` with `channels` channels.
    pub const fn s32(rate: u32, channels: u8) -> Self {
        Self {
            rate,
            channels,
            format: SampleFormat::S32Le,
        }
    }
}

/// Reason a [`HwParams`] falls outside a [`PcmStreamCaps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamMismatch {
    /// Rate outside `rate_min..=rate_max`.
    Rate(u32),
    /// Channel count outside `channels_min..=channels_max`.
    Channels(u8),
    /// Sample format not offered.
    Format(SampleFormat),
}

/// Capabilities of one stream direction of a DAI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PcmStreamCaps {
    /// Stream name the routing graph binds interface widgets to.
    pub stream_name: &'static str,
    /// Minimum channels.
    pub channels_min: u8,
    /// Maximum channels.
    pub channels_max: u8,
    /// Minimum rate in Hz (rates are continuous in between).
    pub rate_min: u32,
    /// Maximum rate in Hz.
    pub rate_max: u32,
    /// Offered sample format.
    pub format: SampleFormat,
    /// Significant bits per sample.
    pub sig_bits: u8,
}

impl PcmStreamCaps {
    /// Check `params` against these capabilities.
    pub fn check(&self, params: &HwParams) -> Result<(), StreamMismatch> {
        if !(self.rate_min..=self.rate_max).contains(&params.rate) {
            return Err(StreamMismatch::Rate(params.rate));
        }
        if !(self.channels_min..=self.channels_max).contains(&params.channels) {
            return Err(StreamMismatch::Channels(params.channels));
        }
        if params.format != self.format {
            return Err(StreamMismatch::Format(params.format));
        }
        Ok(())
    }
}

/// Static description of a DAI registered with the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiDriverInfo {
    /// DAI name.
    pub name: &'static str,
    /// Capture direction; `None` if the DAI cannot capture.
    pub capture: Option<PcmStreamCaps>,
    /// Playback direction; `None` if the DAI cannot play back.
    pub playback: Option<PcmStreamCaps>,
}

/// Stream negotiation hooks of a DAI.
pub trait DaiOps {
    /// Error type
    type Error: core::fmt::Debug;

    /// Apply per-stream parameters.
    fn hw_params(&mut self, params: &HwParams) -> Result<(), Self::Error>;

    /// Accept or reject an interface format.
    fn set_fmt(&mut self, fmt: DaiFmt) -> Result<(), Self::Error>;

    /// Accept or reject a TDM slot geometry.
    fn set_tdm_slot(&mut self, slots: TdmSlots) -> Result<(), Self::Error>;
}

/// Component-level hooks (not tied to a single DAI).
pub trait CodecComponent {
    /// Error type
    type Error: core::fmt::Debug;

    /// Announce a system clock frequency and its direction.
    fn set_sysclk(
        &mut self,
        clk_id: u32,
        source: u32,
        freq: u32,
        dir: ClockDirection,
    ) -> Result<(), Self::Error>;
}

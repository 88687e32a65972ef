use crate::constants::{PCM_SAMPLE_RATE, RECORDING_SAMPLES};
use crate::error::ConfigError;

/// Divider applied to the PDM module clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivider {
    Div1 = 1,
    Div2 = 2,
    Div3 = 3,
    Div4 = 4,
}

/// Clock driven onto the microphone's CLK pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdmClock {
    Mhz12,
    Mhz6,
    Mhz3,
    Mhz1_5,
    Khz750,
    Khz375,
    Khz187_5,
}

impl PdmClock {
    pub const fn hz(self) -> u32 {
        match self {
            PdmClock::Mhz12 => 12_000_000,
            PdmClock::Mhz6 => 6_000_000,
            PdmClock::Mhz3 => 3_000_000,
            PdmClock::Mhz1_5 => 1_500_000,
            PdmClock::Khz750 => 750_000,
            PdmClock::Khz375 => 375_000,
            PdmClock::Khz187_5 => 187_500,
        }
    }
}

/// Channel gain in tenths of a dB.
///
/// The hardware supports -12.0 dB to +40.5 dB in 1.5 dB steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gain(i16);

impl Gain {
    pub const MIN: Gain = Gain(-120);
    pub const ZERO: Gain = Gain(0);
    pub const MAX: Gain = Gain(405);

    pub const fn from_tenths_db(tenths: i16) -> Self {
        Gain(tenths)
    }

    pub const fn tenths_db(self) -> i16 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::MIN.0 && self.0 <= Self::MAX.0 && self.0 % 15 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channels {
    Left,
    Right,
    Stereo,
}

/// PDM front-end and capture configuration.
///
/// Defaults: 1.5 MHz mic clock, decimation 48, +40.5 dB on both channels,
/// left channel only, packed 16-bit output, 16 kHz PCM, one recording window
/// of [`RECORDING_SAMPLES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdmConfig {
    pub clock_divider: ClockDivider,
    pub left_gain: Gain,
    pub right_gain: Gain,
    pub decimation_rate: u32,
    pub high_pass: bool,
    /// High-pass corner as a 4-bit hardware code.
    pub high_pass_cutoff: u8,
    pub clock: PdmClock,
    pub channels: Channels,
    /// Two 16-bit samples per DMA word instead of one.
    pub data_packing: bool,
    pub sample_rate: u32,
    /// Samples to capture before the driver stops re-arming DMA.
    pub recording_samples: usize,
}

impl PdmConfig {
    pub const fn new() -> Self {
        PdmConfig {
            clock_divider: ClockDivider::Div1,
            left_gain: Gain::MAX,
            right_gain: Gain::MAX,
            decimation_rate: 48,
            high_pass: false,
            high_pass_cutoff: 0xB,
            clock: PdmClock::Mhz1_5,
            channels: Channels::Left,
            data_packing: true,
            sample_rate: PCM_SAMPLE_RATE,
            recording_samples: RECORDING_SAMPLES,
        }
    }

    pub const fn with_gain(mut self, left: Gain, right: Gain) -> Self {
        self.left_gain = left;
        self.right_gain = right;
        self
    }

    pub const fn with_clock(mut self, clock: PdmClock, divider: ClockDivider) -> Self {
        self.clock = clock;
        self.clock_divider = divider;
        self
    }

    pub const fn with_decimation_rate(mut self, rate: u32) -> Self {
        self.decimation_rate = rate;
        self
    }

    pub const fn with_high_pass(mut self, cutoff: u8) -> Self {
        self.high_pass = true;
        self.high_pass_cutoff = cutoff;
        self
    }

    pub const fn with_channels(mut self, channels: Channels) -> Self {
        self.channels = channels;
        self
    }

    pub const fn with_data_packing(mut self, packed: bool) -> Self {
        self.data_packing = packed;
        self
    }

    pub const fn with_sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate = hz;
        self
    }

    pub const fn with_recording_samples(mut self, samples: usize) -> Self {
        self.recording_samples = samples;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=63).contains(&self.decimation_rate) {
            return Err(ConfigError::DecimationOutOfRange(self.decimation_rate));
        }
        if self.high_pass_cutoff > 0xF {
            return Err(ConfigError::HighPassCutoffOutOfRange(self.high_pass_cutoff));
        }
        for gain in [self.left_gain, self.right_gain] {
            if !gain.is_valid() {
                return Err(ConfigError::InvalidGain(gain.tenths_db()));
            }
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.recording_samples == 0 {
            return Err(ConfigError::EmptyRecordingWindow);
        }
        Ok(())
    }

    /// PCM rate the decimator actually produces for this clock setup.
    pub const fn output_rate_hz(&self) -> u32 {
        self.clock.hz() / self.clock_divider as u32 / (2 * self.decimation_rate)
    }
}

impl Default for PdmConfig {
    fn default() -> Self {
        PdmConfig::new()
    }
}

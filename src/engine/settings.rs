//! Engine output settings
//!
//! A plain-data snapshot of the engine's output configuration. The loader
//! copies one into every [`crate::LoadedModule`], so format, length and seek
//! math never read shared engine state.

use bitflags::bitflags;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Engine processing flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EngineFlags: u32 {
        /// Oversample the mix
        const OVERSAMPLING = 0x01;
        /// Low-pass noise reduction
        const NOISE_REDUCTION = 0x02;
        /// Reverb effect
        const REVERB = 0x04;
        /// Bass expansion
        const MEGABASS = 0x08;
        /// Surround effect
        const SURROUND = 0x10;
    }
}

/// Sample interpolation used when resampling instruments
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResamplingMode {
    /// No interpolation
    Nearest = 0,
    /// Linear interpolation
    Linear = 1,
    /// Cubic spline interpolation
    #[default]
    Spline = 2,
    /// 8-tap windowed FIR
    Fir = 3,
}

impl ResamplingMode {
    /// Decode the numeric mode used by C engines.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::from_u32(raw)
    }
}

/// Output configuration of a decoding engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Processing flags
    pub flags: EngineFlags,
    /// Output channel count (1 or 2 are representable by the host)
    pub channels: u32,
    /// Bits per sample (8 or 16 are representable by the host)
    pub bits: u32,
    /// Output sample rate in Hz
    pub frequency: u32,
    /// Instrument interpolation
    pub resampling_mode: ResamplingMode,
    /// Extra loops after the end of the song; `0` plays once, `-1` forever
    pub loop_count: i32,
    /// Output gain on the 0..=512 scale
    pub master_volume: u32,
}

impl Default for EngineSettings {
    /// 16-bit stereo at 44.1 kHz, oversampled with noise reduction and
    /// spline interpolation, played once.
    fn default() -> Self {
        Self {
            flags: EngineFlags::OVERSAMPLING | EngineFlags::NOISE_REDUCTION,
            channels: 2,
            bits: 16,
            frequency: 44_100,
            resampling_mode: ResamplingMode::Spline,
            loop_count: 0,
            master_volume: 128,
        }
    }
}

impl EngineSettings {
    /// Bytes in one interleaved frame (all channels of one sample).
    pub fn frame_bytes(&self) -> u32 {
        self.bits / 8 * self.channels
    }

    /// Output buffer size for one tenth of a second.
    pub fn minimum_output_buffer_size(&self) -> usize {
        (u64::from(self.frame_bytes()) * u64::from(self.frequency) / 10) as usize
    }
}

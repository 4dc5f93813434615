//! Audio Format Translation
//!
//! Pure mapping from an [`EngineSettings`] snapshot to the host's sound and
//! channel enumerations, plus the sample/millisecond arithmetic the host
//! callbacks need.
//!
//! Values without a host counterpart are reported as
//! [`PluginError::UnrepresentableFormat`]; no enumerator slot is overloaded
//! with an out-of-range integer.

use crate::{EngineSettings, PluginError, Result};

/// Host sample format (values match the host ABI)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundFormat {
    /// 8 bit per sample native-endian PCM
    Bits8 = 8,
    /// 16 bit per sample native-endian PCM
    Bits16 = 16,
    /// 32 bit IEEE float PCM
    IeeeFloat = 17,
}

/// Host channel layout (values match the host ABI)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelFormat {
    /// Unknown layout
    Invalid = 0,
    /// One channel
    Mono = 1,
    /// Two interleaved channels
    Stereo = 2,
}

/// Complete output format of a loaded module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Sample encoding
    pub sound: SoundFormat,
    /// Channel layout
    pub channels: ChannelFormat,
}

impl AudioFormat {
    /// Translate a settings snapshot.
    pub fn from_settings(settings: &EngineSettings) -> Result<Self> {
        Ok(Self {
            sample_rate: sample_rate(settings),
            sound: sound_format(settings.bits)?,
            channels: channel_format(settings.channels)?,
        })
    }
}

/// Map an engine bit depth to the host sample format.
pub fn sound_format(bits: u32) -> Result<SoundFormat> {
    match bits {
        8 => Ok(SoundFormat::Bits8),
        16 => Ok(SoundFormat::Bits16),
        _ => Err(PluginError::UnrepresentableFormat {
            what: "bit depth",
            value: bits,
        }),
    }
}

/// Map an engine channel count to the host channel layout.
pub fn channel_format(channels: u32) -> Result<ChannelFormat> {
    match channels {
        1 => Ok(ChannelFormat::Mono),
        2 => Ok(ChannelFormat::Stereo),
        _ => Err(PluginError::UnrepresentableFormat {
            what: "channel count",
            value: channels,
        }),
    }
}

/// Sample rate passthrough.
#[inline]
pub fn sample_rate(settings: &EngineSettings) -> u32 {
    settings.frequency
}

/// Song length in samples, rounding the millisecond length to the nearest
/// whole second first (half up).
pub fn length_in_samples(length_ms: u32, sample_rate: u32) -> u32 {
    let seconds = (u64::from(length_ms) + 500) / 1000;
    u32::try_from(seconds * u64::from(sample_rate)).unwrap_or(u32::MAX)
}

/// Convert a sample offset into a millisecond position.
pub fn seek_position_ms(sample: u32, sample_rate: u32) -> u32 {
    if sample_rate == 0 {
        return 0;
    }
    let ms = u64::from(sample) * 1000 / u64::from(sample_rate);
    u32::try_from(ms).unwrap_or(u32::MAX)
}

//! Loaded module handle

use crate::format::{self, AudioFormat, ChannelFormat, SoundFormat};
use crate::{EngineSettings, ModuleDecoder};

/// A decoder together with the settings snapshot it was loaded under.
///
/// Every format, length and seek computation reads this snapshot, so modules
/// loaded under different settings coexist safely. Dropping the handle
/// unloads the decoder.
#[derive(Debug)]
pub struct LoadedModule<D> {
    decoder: D,
    settings: EngineSettings,
    format: AudioFormat,
}

impl<D: ModuleDecoder> LoadedModule<D> {
    /// Assemble a handle; `format` must be the translation of `settings`.
    pub(crate) fn new(decoder: D, settings: EngineSettings, format: AudioFormat) -> Self {
        Self {
            decoder,
            settings,
            format,
        }
    }

    /// The engine decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The engine decoder, mutably.
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Unwrap the decoder.
    pub fn into_decoder(self) -> D {
        self.decoder
    }

    /// Settings snapshot taken at load time.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Output format.
    pub fn audio_format(&self) -> AudioFormat {
        self.format
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    /// Output sample encoding.
    pub fn sound_format(&self) -> SoundFormat {
        self.format.sound
    }

    /// Output channel layout.
    pub fn channel_format(&self) -> ChannelFormat {
        self.format.channels
    }

    /// Song title, if the module stores one.
    pub fn title(&self) -> Option<&str> {
        self.decoder.name()
    }

    /// Song length in samples (length rounded to whole seconds).
    pub fn length_in_samples(&self) -> u32 {
        format::length_in_samples(self.decoder.length_ms(), self.format.sample_rate)
    }

    /// Output buffer size able to hold a tenth of a second.
    pub fn minimum_output_buffer_size(&self) -> usize {
        self.settings.minimum_output_buffer_size()
    }

    /// Render into `buf`. Returns the bytes written and whether the song has
    /// ended (a non-empty buffer received nothing).
    pub fn decode(&mut self, buf: &mut [u8]) -> (usize, bool) {
        if buf.is_empty() {
            return (0, false);
        }
        let written = self.decoder.read(buf).min(buf.len());
        (written, written == 0)
    }

    /// Continue rendering from `sample`.
    pub fn seek_to_sample(&mut self, sample: u32) {
        let position_ms = format::seek_position_ms(sample, self.format.sample_rate);
        self.decoder.seek_ms(position_ms);
    }
}

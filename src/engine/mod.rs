//! Decoding Engine Domain
//!
//! The tracker decoder is an external library. Everything this crate needs
//! from it is expressed by two traits:
//!
//! - [`ModuleEngine`]: the engine-wide part (settings, the load primitive)
//! - [`ModuleDecoder`]: one parsed module (name, length, rendering, seeking)
//!
//! Engines bind to the library of their choice and are handed to
//! [`crate::ModuleLoader`] or [`crate::export_plugin!`].

mod settings;

pub use settings::{EngineFlags, EngineSettings, ResamplingMode};

/// A tracker-music decoding engine.
///
/// Settings applied here are the defaults that every subsequent load
/// snapshots; a loaded module never observes later changes.
pub trait ModuleEngine {
    /// Decoder produced by [`ModuleEngine::load`].
    type Decoder: ModuleDecoder;

    /// Current output configuration.
    fn settings(&self) -> EngineSettings;

    /// Replace the output configuration used by future loads.
    fn apply_settings(&mut self, settings: &EngineSettings);

    /// Parse a complete module held in memory.
    ///
    /// Returns `None` when the data is not a module this engine understands.
    fn load(&self, data: &[u8]) -> Option<Self::Decoder>;
}

/// One loaded module, ready to render.
pub trait ModuleDecoder {
    /// Song name stored in the module, if any.
    fn name(&self) -> Option<&str>;

    /// Song length in milliseconds.
    fn length_ms(&self) -> u32;

    /// Render PCM into `buf` in the snapshot's format.
    ///
    /// Returns the number of bytes written; `0` once the song has ended.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Jump to a position in milliseconds.
    fn seek_ms(&mut self, position_ms: u32);

    /// Set output gain on the engine's 0..=512 scale.
    fn set_master_volume(&mut self, volume: u32);
}

impl<D: ModuleDecoder + ?Sized> ModuleDecoder for Box<D> {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn length_ms(&self) -> u32 {
        (**self).length_ms()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        (**self).read(buf)
    }

    fn seek_ms(&mut self, position_ms: u32) {
        (**self).seek_ms(position_ms)
    }

    fn set_master_volume(&mut self, volume: u32) {
        (**self).set_master_volume(volume)
    }
}

//! Archive-aware module loader
//!
//! Turns a path or a byte source into one contiguous buffer, hands it to the
//! engine's load primitive and normalizes the result.

use super::LoadedModule;
use crate::byte_source::{load_whole, ByteSource, FileByteSource, SourceCapabilities};
use crate::{archive, AudioFormat, ModuleDecoder, ModuleEngine, PluginError, Result};
use std::io::SeekFrom;
use std::path::Path;

/// Highest value of the engine's 0..=512 master volume scale.
///
/// Engines default to a much lower gain than other local-file plugins play
/// at, so every loaded module is set to this level.
pub const MASTER_VOLUME_MAX: u32 = 512;

/// Loads modules through a borrowed engine
pub struct ModuleLoader<'e, E> {
    engine: &'e E,
}

impl<'e, E: ModuleEngine> ModuleLoader<'e, E> {
    /// Create a loader for `engine`.
    pub fn new(engine: &'e E) -> Self {
        Self { engine }
    }

    /// Load a module file, extracting entry 0 first for zipped modules.
    ///
    /// The extension alone decides the branch: `mdz`/`s3z`/`xmz`/`itz` (any
    /// case) are always treated as archives, everything else as a raw module.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedModule<E::Decoder>> {
        let data = read_module_bytes(path.as_ref())?;
        self.load_bytes(&data)
    }

    /// Like [`ModuleLoader::load_path`], reporting failure as `None` plus a
    /// logged diagnostic.
    pub fn load_module(&self, path: impl AsRef<Path>) -> Option<LoadedModule<E::Decoder>> {
        let path = path.as_ref();
        match self.load_path(path) {
            Ok(module) => Some(module),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load module");
                None
            }
        }
    }

    /// Load a raw module from a byte source.
    ///
    /// The source must support both length queries and seeking; it is
    /// rewound and read whole. The source stays owned by the caller; the
    /// payload is copied, so the decoder never borrows from it.
    pub fn load_source<S: ByteSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<LoadedModule<E::Decoder>> {
        let caps = source.capabilities();
        if !caps.contains(SourceCapabilities::LENGTH) {
            return Err(PluginError::UnsupportedCapability("length query"));
        }
        if !caps.contains(SourceCapabilities::SEEK) {
            return Err(PluginError::UnsupportedCapability("seek"));
        }

        source.seek(SeekFrom::Start(0))?;
        let data = load_whole(source)?;
        self.load_bytes(&data)
    }

    /// Decode a module already held in memory and normalize it.
    ///
    /// The engine's current settings are validated and snapshotted first;
    /// an unrepresentable output format fails before the engine is called.
    pub fn load_bytes(&self, data: &[u8]) -> Result<LoadedModule<E::Decoder>> {
        let mut settings = self.engine.settings();
        let format = AudioFormat::from_settings(&settings)?;

        let mut decoder = self.engine.load(data).ok_or(PluginError::DecodeRejected)?;

        decoder.set_master_volume(MASTER_VOLUME_MAX);
        settings.master_volume = MASTER_VOLUME_MAX;

        tracing::debug!(
            bytes = data.len(),
            title = decoder.name().unwrap_or(""),
            length_ms = decoder.length_ms(),
            "module loaded"
        );

        Ok(LoadedModule::new(decoder, settings, format))
    }
}

/// Read the module payload named by `path` into memory.
///
/// Zipped modules yield their first archive entry; raw modules are read
/// whole, sized by `stat`. Nothing is decoded.
pub fn read_module_bytes(path: &Path) -> Result<Vec<u8>> {
    if archive::is_archived_path(path) {
        tracing::debug!(path = %path.display(), "reading zipped module");
        return archive::extract_first_entry(path);
    }

    let mut source = FileByteSource::open(path)?;
    load_whole(&mut source)
}

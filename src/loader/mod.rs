//! Module Loader Domain
//!
//! Handles getting module data from wherever it lives into the decoding
//! engine: raw files, zipped modules and byte sources, followed by
//! post-load normalization.

mod module;
mod module_loader;

pub use module::LoadedModule;
pub use module_loader::{read_module_bytes, ModuleLoader, MASTER_VOLUME_MAX};

use crate::ModuleEngine;
use std::path::Path;

/// Convenience function to load a module file with `engine`
pub fn load_file<E: ModuleEngine>(
    engine: &E,
    path: impl AsRef<Path>,
) -> crate::Result<LoadedModule<E::Decoder>> {
    ModuleLoader::new(engine).load_path(path)
}

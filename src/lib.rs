//! Local-file playback plugin for tracker modules
//!
//! Adapts a tracker-module decoding engine (MOD, S3M, XM, IT and friends) to
//! a host application's "local file playback plugin" C ABI. The engine itself
//! is external and plugs in through [`ModuleEngine`]; this crate owns the
//! glue around it:
//!
//! - [`byte_source`]: capability-based byte inputs (files, memory, streams,
//!   host-provided inputs)
//! - [`archive`]: recognition and extraction of zipped modules (first entry)
//! - [`loader`]: archive-aware loading into a [`LoadedModule`] with a
//!   per-instance settings snapshot
//! - [`metadata`]: the two-phase, length-then-copy field protocol
//! - [`format`]: translation of engine settings into host audio formats
//! - [`ffi`]: `#[repr(C)]` host tables, callbacks and [`export_plugin!`]
//!
//! # Crate feature flags
//! - `archive` (default): extract zipped modules (`mdz`, `s3z`, `xmz`, `itz`)
//!   through the `zip` crate. Without it those extensions fail cleanly.
//!
//! # Quick start
//! ```ignore
//! use tracker_plugin::{ModuleLoader, metadata::FieldKind};
//!
//! let loader = ModuleLoader::new(&engine);
//! let module = loader.load_path("song.xmz")?;
//! println!("{} Hz, {} samples", module.sample_rate(), module.length_in_samples());
//!
//! let mut len = 0;
//! tracker_plugin::metadata::read_field(&module, FieldKind::Title as u32, None, &mut len);
//! ```
//!
//! # Exporting the plugin
//! ```ignore
//! tracker_plugin::export_plugin!(MyEngine::new());
//! ```

#![warn(missing_docs)]

pub mod archive; // Zipped module recognition and extraction
pub mod byte_source; // Byte inputs
pub mod config; // Plugin configuration file
pub mod engine; // Decoding engine seam
pub mod ffi; // Host C ABI
pub mod format; // Audio format translation
pub mod loader; // Archive-aware module loading
pub mod logging; // Diagnostics
pub mod metadata; // Field protocol

/// Error types for plugin operations
#[derive(thiserror::Error, Debug)]
pub enum PluginError {
    /// The path or archive could not be opened
    #[error("Cannot open '{target}': {reason}")]
    CannotOpen {
        /// Path (or archive member) that failed to open
        target: String,
        /// Underlying reason
        reason: String,
    },

    /// Fewer bytes were readable than the declared size
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Declared size (file stat or archive entry metadata)
        expected: u64,
        /// Bytes actually read before end of input
        actual: u64,
    },

    /// The payload buffer could not be allocated
    #[error("Failed to allocate {size} bytes")]
    AllocationFailure {
        /// Requested buffer size
        size: u64,
    },

    /// A required byte source or build capability is absent
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(&'static str),

    /// The engine refused the payload (malformed or unrecognized module)
    #[error("Decoder rejected the module data")]
    DecodeRejected,

    /// A settings value has no counterpart in the host's enumerations
    #[error("Unrepresentable {what}: {value}")]
    UnrepresentableFormat {
        /// Which setting ("bit depth", "channel count")
        what: &'static str,
        /// Offending value
        value: u32,
    },

    /// Only song index 0 exists in a module file
    #[error("Invalid song index {0} (modules contain a single song)")]
    InvalidSongIndex(i32),

    /// IO error from a file or byte source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid plugin configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<String> for PluginError {
    /// Converts a String into `PluginError::Config`.
    ///
    /// Only configuration code builds errors from free-form messages; every
    /// other failure has a dedicated variant.
    fn from(msg: String) -> Self {
        PluginError::Config(msg)
    }
}

impl From<&str> for PluginError {
    fn from(msg: &str) -> Self {
        PluginError::Config(msg.to_string())
    }
}

/// Result type for plugin operations
pub type Result<T> = std::result::Result<T, PluginError>;

// Public API exports
pub use byte_source::{
    load_whole, ByteSource, FileByteSource, MemoryByteSource, SourceCapabilities,
    StreamByteSource,
};
pub use config::PluginConfig;
pub use engine::{EngineFlags, EngineSettings, ModuleDecoder, ModuleEngine, ResamplingMode};
pub use format::{AudioFormat, ChannelFormat, SoundFormat};
pub use loader::{LoadedModule, ModuleLoader, MASTER_VOLUME_MAX};
pub use metadata::{copy_field, has_field, read_field, FieldKind};

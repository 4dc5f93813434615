//! `#[repr(C)]` mirror of the host's local-file plugin API (version 7)
//!
//! Every function slot is an `Option` so a null pointer from either side is
//! representable. Host enums that arrive as arguments are taken as `c_int`
//! and decoded explicitly; a newer host may send values unknown here.

use crate::format::{ChannelFormat, SoundFormat};
use std::os::raw::{c_char, c_int, c_long, c_uint, c_void};

/// Host boolean
pub type SpBool = u8;
/// Host `false`
pub const SP_FALSE: SpBool = 0;
/// Host `true`
pub const SP_TRUE: SpBool = 1;

/// Byte offset within a host input
pub type SppbOffset = c_long;
/// Signed byte count returned by host reads
pub type SppbSsize = c_long;

/// API version this plugin is built against
pub const SPPB_API_VERSION: c_uint = 7;

/// `whence`: from the start of the input
pub const SPPB_START: c_int = 0;
/// `whence`: from the current position
pub const SPPB_CURRENT: c_int = 1;
/// `whence`: from the end of the input
pub const SPPB_END: c_int = 2;

/// Raw data container handed over by the host.
///
/// `get_length` and `seek` may be null when the transport cannot provide
/// them. Functions return `-1` on error; `read` returns `0` only at end of
/// input. The host owns the input and destroys it after the plugin context
/// built from it.
#[repr(C)]
#[derive(Debug)]
pub struct SppbByteInput {
    /// Close the input and free its resources
    pub destroy: Option<unsafe extern "C" fn(input: *mut SppbByteInput)>,
    /// Total length in bytes
    pub get_length: Option<unsafe extern "C" fn(input: *mut SppbByteInput) -> SppbOffset>,
    /// Read up to `size` bytes into `buf`
    pub read: Option<
        unsafe extern "C" fn(input: *mut SppbByteInput, buf: *mut c_void, size: usize) -> SppbSsize,
    >,
    /// Reposition; returns the new offset from the start
    pub seek: Option<
        unsafe extern "C" fn(
            input: *mut SppbByteInput,
            offset: SppbOffset,
            whence: c_int,
        ) -> SppbOffset,
    >,
}

/// Context constructor shared by the parser and playback tables
pub type CreateFn = unsafe extern "C" fn(
    plugin: *mut SppbPluginDescription,
    input: *mut SppbByteInput,
    song_index: c_int,
) -> *mut c_void;

/// Context destructor
pub type DestroyFn = unsafe extern "C" fn(plugin: *mut SppbPluginDescription, context: *mut c_void);

/// Getter returning an unsigned value for a context
pub type UintGetterFn =
    unsafe extern "C" fn(plugin: *mut SppbPluginDescription, context: *mut c_void) -> c_uint;

/// Metadata extraction table
#[repr(C)]
#[derive(Debug, Default)]
pub struct SppbParserPlugin {
    /// Create a parsing context for `input`
    pub create: Option<CreateFn>,
    /// Destroy a context from `create`
    pub destroy: Option<DestroyFn>,
    /// Number of songs in the file
    pub get_song_count: Option<UintGetterFn>,
    /// Channel layout the metadata reports
    pub get_channel_format: Option<
        unsafe extern "C" fn(
            plugin: *mut SppbPluginDescription,
            context: *mut c_void,
        ) -> ChannelFormat,
    >,
    /// Sample rate the metadata reports
    pub get_sample_rate: Option<UintGetterFn>,
    /// Length the metadata reports
    pub get_length_in_samples: Option<UintGetterFn>,
    /// Whether a field exists
    pub has_field: Option<
        unsafe extern "C" fn(
            plugin: *mut SppbPluginDescription,
            context: *mut c_void,
            field: c_int,
        ) -> SpBool,
    >,
    /// Two-phase string field read
    pub read_field: Option<
        unsafe extern "C" fn(
            plugin: *mut SppbPluginDescription,
            context: *mut c_void,
            field: c_int,
            dest: *mut c_char,
            length: *mut usize,
        ) -> SpBool,
    >,
    /// Optional metadata editing; null when unsupported
    pub write_field: Option<
        unsafe extern "C" fn(
            plugin: *mut SppbPluginDescription,
            context: *mut c_void,
            field: c_int,
            src: *const c_char,
            write_length: usize,
        ) -> SpBool,
    >,
}

/// Decoding table
#[repr(C)]
#[derive(Debug, Default)]
pub struct SppbPlaybackPlugin {
    /// Create a playback context for `input`
    pub create: Option<CreateFn>,
    /// Destroy a context from `create`
    pub destroy: Option<DestroyFn>,
    /// Decode at most `*destlen` bytes; set `*destlen` and `*final`
    pub decode: Option<
        unsafe extern "C" fn(
            plugin: *mut SppbPluginDescription,
            context: *mut c_void,
            dest: *mut u8,
            destlen: *mut usize,
            final_: *mut SpBool,
        ) -> SpBool,
    >,
    /// Continue decoding from a sample offset
    pub seek: Option<
        unsafe extern "C" fn(
            plugin: *mut SppbPluginDescription,
            context: *mut c_void,
            sample: c_uint,
        ) -> SpBool,
    >,
    /// Smallest useful `decode` buffer in bytes
    pub get_minimum_output_buffer_size: Option<
        unsafe extern "C" fn(plugin: *mut SppbPluginDescription, context: *mut c_void) -> usize,
    >,
    /// Length as determined by the decoder
    pub get_length_in_samples: Option<UintGetterFn>,
    /// Output format of `decode`
    pub get_audio_format: Option<
        unsafe extern "C" fn(
            plugin: *mut SppbPluginDescription,
            context: *mut c_void,
            samplerate: *mut c_uint,
            format: *mut SoundFormat,
            channels: *mut ChannelFormat,
        ),
    >,
}

/// The plugin as a whole, returned from the exported entry point
#[repr(C)]
#[derive(Debug)]
pub struct SppbPluginDescription {
    /// Always [`SPPB_API_VERSION`]
    pub api_version: c_uint,
    /// User-visible name (heap-allocated, NUL-terminated)
    pub plugin_name: *mut c_char,
    /// Plugin version
    pub plugin_version: c_uint,
    /// NULL-terminated list of extensions without the dot
    pub file_extensions: *const *const c_char,
    /// Plugin-owned state: the engine
    pub plugin_context: *mut c_void,
    /// Decoding table
    pub playback: SppbPlaybackPlugin,
    /// Metadata table
    pub parser: SppbParserPlugin,
}

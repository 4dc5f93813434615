//! Host C ABI
//!
//! Exposes a [`ModuleEngine`] as a local-file playback plugin: a
//! [`SppbPluginDescription`] with a parser table (metadata) and a playback
//! table (decoding). Both tables share one context type, so a context built
//! by either `create` works with every callback.
//!
//! A cdylib exports the entry point with [`crate::export_plugin!`]:
//!
//! ```ignore
//! tracker_plugin::export_plugin!(MyEngine::new());
//! ```

mod context;
mod host_input;
mod parser;
mod playback;
mod types;

pub use host_input::HostByteSource;
pub use types::*;

use crate::archive::RAW_EXTENSIONS;
use crate::{logging, ModuleEngine, ModuleLoader, PluginConfig, PluginError};
use context::{guard, EngineContext, ModuleContext};
use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;

/// User-visible plugin name
pub const PLUGIN_NAME: &str = "Tracker Modules";

/// Plugin version reported to the host
pub const PLUGIN_VERSION: u32 = 1;

/// An engine that can sit behind the host ABI.
///
/// The host may call in from any thread, so the engine is shared and each
/// decoder may move between threads (one at a time, behind its lock).
pub trait PluginEngine: ModuleEngine + Send + Sync + 'static {}

impl<E> PluginEngine for E
where
    E: ModuleEngine + Send + Sync + 'static,
    E::Decoder: Send,
{
}

/// NULL-terminated extension list handed to the host
struct ExtensionTable([*const c_char; RAW_EXTENSIONS.len() + 1]);

// SAFETY: the pointers reference immutable `'static` C string literals
unsafe impl Sync for ExtensionTable {}

// Host inputs carry no file name, so zipped modules cannot be recognized
// behind this ABI; only raw extensions are advertised.
static EXTENSIONS: ExtensionTable = ExtensionTable([
    c"mod".as_ptr(),
    c"s3m".as_ptr(),
    c"xm".as_ptr(),
    c"it".as_ptr(),
    c"669".as_ptr(),
    c"amf".as_ptr(),
    c"ams".as_ptr(),
    c"dbm".as_ptr(),
    c"dmf".as_ptr(),
    c"dsm".as_ptr(),
    c"far".as_ptr(),
    c"mdl".as_ptr(),
    c"med".as_ptr(),
    c"mtm".as_ptr(),
    c"okt".as_ptr(),
    c"ptm".as_ptr(),
    c"stm".as_ptr(),
    c"ult".as_ptr(),
    c"umx".as_ptr(),
    c"mt2".as_ptr(),
    c"psm".as_ptr(),
    ptr::null(),
]);

/// Build the description for `engine` as-is.
///
/// Reads no configuration and installs no subscriber; see
/// [`create_plugin_description`] for the exported entry point. Free the
/// result with [`release_plugin_description`].
pub fn plugin_description<E: PluginEngine>(engine: E) -> *mut SppbPluginDescription {
    let plugin_name = CString::new(PLUGIN_NAME)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut());

    Box::into_raw(Box::new(SppbPluginDescription {
        api_version: SPPB_API_VERSION,
        plugin_name,
        plugin_version: PLUGIN_VERSION,
        file_extensions: EXTENSIONS.0.as_ptr(),
        plugin_context: EngineContext::into_raw(engine),
        playback: playback::table::<E>(),
        parser: parser::table::<E>(),
    }))
}

/// Entry point body: configure logging and `engine`, then build the
/// description.
///
/// The configuration file named by [`crate::config::CONFIG_ENV`] is
/// optional; an unreadable or invalid one is reported and defaults are used.
pub fn create_plugin_description<E: PluginEngine>(mut engine: E) -> *mut SppbPluginDescription {
    guard("create_plugin_description", ptr::null_mut(), move || {
        let config = PluginConfig::from_env();
        let log_filter = config
            .as_ref()
            .ok()
            .and_then(|config| config.log_filter.clone());
        logging::init(log_filter.as_deref());

        let config = config.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring plugin configuration");
            PluginConfig::default()
        });

        engine.apply_settings(&config.settings);
        tracing::info!(
            name = PLUGIN_NAME,
            version = PLUGIN_VERSION,
            frequency = config.settings.frequency,
            "plugin created"
        );
        plugin_description(engine)
    })
}

/// Free a description from [`plugin_description`] and its engine.
///
/// # Safety
/// `description` is null or came from [`plugin_description`] (or
/// [`create_plugin_description`]) with the same `E`, and no context created
/// through it is still alive.
pub unsafe fn release_plugin_description<E: PluginEngine>(
    description: *mut SppbPluginDescription,
) {
    if description.is_null() {
        return;
    }
    let description = unsafe { Box::from_raw(description) };
    if !description.plugin_name.is_null() {
        drop(unsafe { CString::from_raw(description.plugin_name) });
    }
    unsafe { EngineContext::<E>::destroy(description.plugin_context) };
}

/// Shared `create` for both tables: load the module behind `input`.
unsafe extern "C" fn create<E: PluginEngine>(
    plugin: *mut SppbPluginDescription,
    input: *mut SppbByteInput,
    song_index: c_int,
) -> *mut c_void {
    guard("create", ptr::null_mut(), || {
        if song_index != 0 {
            tracing::warn!(%song_index, error = %PluginError::InvalidSongIndex(song_index), "create refused");
            return ptr::null_mut();
        }
        if plugin.is_null() {
            return ptr::null_mut();
        }

        // SAFETY: the host passes back the description we returned
        let Some(engine) = (unsafe { EngineContext::<E>::engine((*plugin).plugin_context) })
        else {
            return ptr::null_mut();
        };
        // SAFETY: the host keeps `input` alive until after `destroy`
        let Some(mut source) = (unsafe { HostByteSource::new(input) }) else {
            tracing::warn!("create called without an input");
            return ptr::null_mut();
        };

        match ModuleLoader::new(engine).load_source(&mut source) {
            Ok(module) => ModuleContext::into_raw(module),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load module from host input");
                ptr::null_mut()
            }
        }
    })
}

unsafe extern "C" fn destroy<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
) {
    guard("destroy", (), || unsafe {
        ModuleContext::<E::Decoder>::destroy(context)
    })
}

/// Export `SpotifyLocalFilePlaybackPluginCreate` for the given engine.
///
/// The expression is evaluated once per call of the entry point.
#[macro_export]
macro_rules! export_plugin {
    ($engine:expr) => {
        #[allow(non_snake_case)]
        #[no_mangle]
        pub extern "C" fn SpotifyLocalFilePlaybackPluginCreate(
        ) -> *mut $crate::ffi::SppbPluginDescription {
            $crate::ffi::create_plugin_description($engine)
        }
    };
}

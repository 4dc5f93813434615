//! Opaque handles passed through the host
//!
//! The host stores our state as `void*`. Both handle types start with a tag
//! so a pointer of the wrong kind is refused instead of reinterpreted.

use crate::LoadedModule;
use parking_lot::Mutex;
use std::os::raw::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};

const ENGINE_TAG: u32 = u32::from_be_bytes(*b"TPEN");
const MODULE_TAG: u32 = u32::from_be_bytes(*b"TPMD");

/// Engine stored in the plugin description's `plugin_context`
#[repr(C)]
pub(crate) struct EngineContext<E> {
    tag: u32,
    engine: E,
}

impl<E> EngineContext<E> {
    pub(crate) fn into_raw(engine: E) -> *mut c_void {
        Box::into_raw(Box::new(Self {
            tag: ENGINE_TAG,
            engine,
        }))
        .cast()
    }

    /// # Safety
    /// `raw` is null or came from [`EngineContext::into_raw`] with the same
    /// `E` and has not been destroyed.
    pub(crate) unsafe fn engine<'a>(raw: *mut c_void) -> Option<&'a E> {
        let context = unsafe { tagged::<Self>(raw, ENGINE_TAG)? };
        Some(&context.engine)
    }

    /// # Safety
    /// As for [`EngineContext::engine`]; `raw` must not be used afterwards.
    pub(crate) unsafe fn destroy(raw: *mut c_void) {
        if unsafe { tagged::<Self>(raw, ENGINE_TAG) }.is_some() {
            drop(unsafe { Box::from_raw(raw.cast::<Self>()) });
        }
    }
}

/// One loaded module, locked so host calls from several threads serialize
#[repr(C)]
pub(crate) struct ModuleContext<D> {
    tag: u32,
    module: Mutex<LoadedModule<D>>,
}

impl<D> ModuleContext<D> {
    pub(crate) fn into_raw(module: LoadedModule<D>) -> *mut c_void {
        Box::into_raw(Box::new(Self {
            tag: MODULE_TAG,
            module: Mutex::new(module),
        }))
        .cast()
    }

    /// Run `f` on the module behind `raw`; `None` for a null or foreign
    /// pointer.
    ///
    /// # Safety
    /// `raw` is null, a live pointer from [`ModuleContext::into_raw`] with the
    /// same `D`, or a pointer to some other tagged context.
    pub(crate) unsafe fn with<T>(
        raw: *mut c_void,
        f: impl FnOnce(&mut LoadedModule<D>) -> T,
    ) -> Option<T> {
        let context = unsafe { tagged::<Self>(raw, MODULE_TAG)? };
        let mut module = context.module.lock();
        Some(f(&mut module))
    }

    /// # Safety
    /// As for [`ModuleContext::with`]; `raw` must not be used afterwards.
    pub(crate) unsafe fn destroy(raw: *mut c_void) {
        if unsafe { tagged::<Self>(raw, MODULE_TAG) }.is_some() {
            drop(unsafe { Box::from_raw(raw.cast::<Self>()) });
        }
    }
}

/// Reinterpret `raw` as `T` if its leading `u32` equals `tag`.
///
/// # Safety
/// `raw` is null or points to a live `#[repr(C)]` value whose first field
/// is a `u32` tag.
unsafe fn tagged<'a, T>(raw: *mut c_void, tag: u32) -> Option<&'a T> {
    if raw.is_null() || unsafe { raw.cast::<u32>().read() } != tag {
        tracing::warn!(?raw, "rejected null or foreign plugin context");
        return None;
    }
    Some(unsafe { &*raw.cast::<T>() })
}

/// Run a host callback body, turning a panic into `fallback`.
pub(crate) fn guard<T>(callback: &'static str, fallback: T, body: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!(callback, "panic inside plugin callback");
            fallback
        }
    }
}

//! Metadata callbacks

use super::context::{guard, ModuleContext};
use super::types::{SpBool, SppbParserPlugin, SppbPluginDescription, SP_FALSE, SP_TRUE};
use super::{create, destroy, PluginEngine};
use crate::format::ChannelFormat;
use crate::metadata;
use std::os::raw::{c_char, c_int, c_uint, c_void};

/// Parser table for engine `E`.
pub(crate) fn table<E: PluginEngine>() -> SppbParserPlugin {
    SppbParserPlugin {
        create: Some(create::<E>),
        destroy: Some(destroy::<E>),
        get_song_count: Some(get_song_count),
        get_channel_format: Some(get_channel_format::<E>),
        get_sample_rate: Some(get_sample_rate::<E>),
        get_length_in_samples: Some(get_length_in_samples::<E>),
        has_field: Some(has_field),
        read_field: Some(read_field::<E>),
        write_field: None,
    }
}

unsafe extern "C" fn get_song_count(_: *mut SppbPluginDescription, _: *mut c_void) -> c_uint {
    1
}

unsafe extern "C" fn get_channel_format<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
) -> ChannelFormat {
    guard("get_channel_format", ChannelFormat::Invalid, || {
        unsafe { ModuleContext::<E::Decoder>::with(context, |m| m.channel_format()) }
            .unwrap_or(ChannelFormat::Invalid)
    })
}

unsafe extern "C" fn get_sample_rate<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
) -> c_uint {
    guard("get_sample_rate", 0, || {
        unsafe { ModuleContext::<E::Decoder>::with(context, |m| m.sample_rate()) }.unwrap_or(0)
    })
}

unsafe extern "C" fn get_length_in_samples<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
) -> c_uint {
    guard("get_length_in_samples", 0, || {
        unsafe { ModuleContext::<E::Decoder>::with(context, |m| m.length_in_samples()) }
            .unwrap_or(0)
    })
}

unsafe extern "C" fn has_field(
    _: *mut SppbPluginDescription,
    _: *mut c_void,
    field: c_int,
) -> SpBool {
    let present = u32::try_from(field).is_ok_and(metadata::has_field);
    tracing::debug!(field, present, "has_field");
    if present {
        SP_TRUE
    } else {
        SP_FALSE
    }
}

unsafe extern "C" fn read_field<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
    field: c_int,
    dest: *mut c_char,
    length: *mut usize,
) -> SpBool {
    guard("read_field", SP_FALSE, || {
        if length.is_null() {
            return SP_FALSE;
        }
        // SAFETY: non-null, provided by the host for the duration of the call
        let length = unsafe { &mut *length };

        let Ok(kind) = u32::try_from(field) else {
            *length = 0;
            return SP_FALSE;
        };

        let dest = if dest.is_null() {
            None
        } else {
            // SAFETY: the host passes a buffer of at least `*length` bytes
            Some(unsafe { std::slice::from_raw_parts_mut(dest.cast::<u8>(), *length) })
        };

        let copied = unsafe {
            ModuleContext::<E::Decoder>::with(context, |m| {
                metadata::read_field(m, kind, dest, &mut *length)
            })
        };

        match copied {
            Some(true) => SP_TRUE,
            Some(false) => SP_FALSE,
            None => {
                *length = 0;
                SP_FALSE
            }
        }
    })
}

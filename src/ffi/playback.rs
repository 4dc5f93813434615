//! Decoding callbacks

use super::context::{guard, ModuleContext};
use super::types::{SpBool, SppbPlaybackPlugin, SppbPluginDescription, SP_FALSE, SP_TRUE};
use super::{create, destroy, PluginEngine};
use crate::format::{ChannelFormat, SoundFormat};
use std::os::raw::{c_uint, c_void};

/// Playback table for engine `E`.
pub(crate) fn table<E: PluginEngine>() -> SppbPlaybackPlugin {
    SppbPlaybackPlugin {
        create: Some(create::<E>),
        destroy: Some(destroy::<E>),
        decode: Some(decode::<E>),
        seek: Some(seek::<E>),
        get_minimum_output_buffer_size: Some(get_minimum_output_buffer_size::<E>),
        get_length_in_samples: Some(get_length_in_samples::<E>),
        get_audio_format: Some(get_audio_format::<E>),
    }
}

unsafe extern "C" fn decode<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
    dest: *mut u8,
    destlen: *mut usize,
    final_: *mut SpBool,
) -> SpBool {
    guard("decode", SP_FALSE, || {
        if dest.is_null() || destlen.is_null() || final_.is_null() {
            return SP_FALSE;
        }
        // SAFETY: non-null pointers provided by the host for this call; `dest`
        // holds `*destlen` bytes
        let (destlen, final_) = unsafe { (&mut *destlen, &mut *final_) };
        let buf = unsafe { std::slice::from_raw_parts_mut(dest, *destlen) };

        let decoded = unsafe { ModuleContext::<E::Decoder>::with(context, |m| m.decode(buf)) };
        match decoded {
            Some((written, ended)) => {
                *destlen = written;
                *final_ = if ended { SP_TRUE } else { SP_FALSE };
                SP_TRUE
            }
            None => SP_FALSE,
        }
    })
}

unsafe extern "C" fn seek<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
    sample: c_uint,
) -> SpBool {
    guard("seek", SP_FALSE, || {
        tracing::debug!(sample, "seek");
        match unsafe { ModuleContext::<E::Decoder>::with(context, |m| m.seek_to_sample(sample)) } {
            Some(()) => SP_TRUE,
            None => SP_FALSE,
        }
    })
}

unsafe extern "C" fn get_minimum_output_buffer_size<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
) -> usize {
    guard("get_minimum_output_buffer_size", 0, || {
        unsafe { ModuleContext::<E::Decoder>::with(context, |m| m.minimum_output_buffer_size()) }
            .unwrap_or(0)
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

unsafe extern "C" fn get_audio_format<E: PluginEngine>(
    _: *mut SppbPluginDescription,
    context: *mut c_void,
    samplerate: *mut c_uint,
    format: *mut SoundFormat,
    channels: *mut ChannelFormat,
) {
    guard("get_audio_format", (), || {
        let Some(audio) = (unsafe { ModuleContext::<E::Decoder>::with(context, |m| m.audio_format()) })
        else {
            if !channels.is_null() {
                // SAFETY: non-null host out-parameter
                unsafe { channels.write(ChannelFormat::Invalid) };
            }
            return;
        };

        // SAFETY: non-null host out-parameters
        unsafe {
            if !samplerate.is_null() {
                samplerate.write(audio.sample_rate);
            }
            if !format.is_null() {
                format.write(audio.sound);
            }
            if !channels.is_null() {
                channels.write(audio.channels);
            }
        }
    })
}

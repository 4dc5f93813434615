//! In-memory engine used by the integration tests.
//!
//! A module is `TMOD`, the length in milliseconds (u32 LE), a title length
//! byte, the title, then arbitrary padding. The decoder renders `0x11` bytes
//! at the snapshot's byte rate until the song length is reached.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use tracker_plugin::{EngineSettings, ModuleDecoder, ModuleEngine};

pub const MAGIC: &[u8; 4] = b"TMOD";

/// Build a module payload.
pub fn module_bytes(title: &str, length_ms: u32, total_len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(total_len);
    data.extend_from_slice(MAGIC);
    data.extend_from_slice(&length_ms.to_le_bytes());
    data.push(title.len() as u8);
    data.extend_from_slice(title.as_bytes());
    if data.len() < total_len {
        data.resize(total_len, 0xAA);
    }
    data
}

/// Counters shared between an engine and its decoders
#[derive(Debug, Default)]
pub struct Stats {
    pub loads: AtomicUsize,
    pub volume_calls: AtomicUsize,
    pub last_volume: AtomicU32,
    pub last_seek_ms: AtomicU32,
    pub drops: AtomicUsize,
    pub last_load_len: AtomicUsize,
}

impl Stats {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn volume_calls(&self) -> usize {
        self.volume_calls.load(Ordering::SeqCst)
    }

    pub fn last_volume(&self) -> u32 {
        self.last_volume.load(Ordering::SeqCst)
    }

    pub fn last_seek_ms(&self) -> u32 {
        self.last_seek_ms.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    pub fn last_load_len(&self) -> usize {
        self.last_load_len.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct FakeEngine {
    pub settings: EngineSettings,
    pub stats: Arc<Stats>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            settings,
            stats: Arc::default(),
        }
    }
}

impl ModuleEngine for FakeEngine {
    type Decoder = FakeDecoder;

    fn settings(&self) -> EngineSettings {
        self.settings
    }

    fn apply_settings(&mut self, settings: &EngineSettings) {
        self.settings = *settings;
    }

    fn load(&self, data: &[u8]) -> Option<FakeDecoder> {
        self.stats.last_load_len.store(data.len(), Ordering::SeqCst);
        if data.len() < 9 || &data[..4] != MAGIC {
            return None;
        }
        let length_ms = u32::from_le_bytes(data[4..8].try_into().ok()?);
        let title_len = usize::from(data[8]);
        let title = data.get(9..9 + title_len)?;
        let title = String::from_utf8(title.to_vec()).ok()?;

        self.stats.loads.fetch_add(1, Ordering::SeqCst);
        let byte_rate =
            u64::from(self.settings.frame_bytes()) * u64::from(self.settings.frequency);
        Some(FakeDecoder {
            title: (!title.is_empty()).then_some(title),
            length_ms,
            byte_rate,
            remaining: u64::from(length_ms) * byte_rate / 1000,
            stats: Arc::clone(&self.stats),
        })
    }
}

#[derive(Debug)]
pub struct FakeDecoder {
    title: Option<String>,
    length_ms: u32,
    byte_rate: u64,
    remaining: u64,
    stats: Arc<Stats>,
}

impl FakeDecoder {
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl ModuleDecoder for FakeDecoder {
    fn name(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn length_ms(&self) -> u32 {
        self.length_ms
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = usize::try_from(self.remaining)
            .unwrap_or(usize::MAX)
            .min(buf.len());
        buf[..n].fill(0x11);
        self.remaining -= n as u64;
        n
    }

    fn seek_ms(&mut self, position_ms: u32) {
        self.stats.last_seek_ms.store(position_ms, Ordering::SeqCst);
        let left_ms = u64::from(self.length_ms.saturating_sub(position_ms));
        self.remaining = left_ms * self.byte_rate / 1000;
    }

    fn set_master_volume(&mut self, volume: u32) {
        self.stats.volume_calls.fetch_add(1, Ordering::SeqCst);
        self.stats.last_volume.store(volume, Ordering::SeqCst);
    }
}

impl Drop for FakeDecoder {
    fn drop(&mut self) {
        self.stats.drops.fetch_add(1, Ordering::SeqCst);
    }
}

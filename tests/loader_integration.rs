mod common;

use std::io::SeekFrom;
use std::path::Path;

use common::{module_bytes, FakeEngine};
use tracker_plugin::loader::load_file;
use tracker_plugin::{
    ByteSource, ChannelFormat, EngineSettings, MemoryByteSource, ModuleEngine, ModuleLoader,
    PluginError, SoundFormat, SourceCapabilities, StreamByteSource, MASTER_VOLUME_MAX,
};

fn write_file(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

#[cfg(feature = "archive")]
fn write_zip(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> std::path::PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (entry, data) in entries {
        writer
            .start_file(*entry, zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, data).unwrap();
    }
    writer.finish().unwrap();
    path
}

#[test]
fn test_raw_module_from_path() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "song.xm", &module_bytes("Test Song", 125_400, 4096));

    let engine = FakeEngine::new();
    let module = ModuleLoader::new(&engine).load_path(&path)?;

    assert_eq!(engine.stats.last_load_len(), 4096);
    assert_eq!(module.title(), Some("Test Song"));
    assert_eq!(module.sample_rate(), 44_100);
    assert_eq!(module.sound_format(), SoundFormat::Bits16);
    assert_eq!(module.channel_format(), ChannelFormat::Stereo);
    // 125.4 s rounds to 125 s
    assert_eq!(module.length_in_samples(), 125 * 44_100);
    assert_eq!(module.minimum_output_buffer_size(), 17_640);
    Ok(())
}

#[cfg(feature = "archive")]
#[test]
fn test_zipped_module_uses_first_entry() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let payload = module_bytes("Zipped", 60_000, 4096);
    let path = write_zip(
        dir.path(),
        "song.XMZ",
        &[("song.xm", payload.as_slice()), ("readme.txt", b"not a module".as_slice())],
    );

    let engine = FakeEngine::new();
    let module = ModuleLoader::new(&engine).load_path(&path)?;

    assert_eq!(engine.stats.last_load_len(), 4096);
    assert_eq!(module.title(), Some("Zipped"));
    assert_eq!(module.length_in_samples(), 60 * 44_100);
    Ok(())
}

#[cfg(feature = "archive")]
#[test]
fn test_first_entry_is_used_even_if_not_a_module() {
    let dir = tempfile::tempdir().unwrap();
    let payload = module_bytes("Second", 1_000, 64);
    let path = write_zip(
        dir.path(),
        "pack.mdz",
        &[("info.txt", b"hello".as_slice()), ("song.mod", payload.as_slice())],
    );

    let engine = FakeEngine::new();
    let err = ModuleLoader::new(&engine).load_path(&path).unwrap_err();
    assert!(matches!(err, PluginError::DecodeRejected));
    assert_eq!(engine.stats.last_load_len(), 5);
}

#[cfg(feature = "archive")]
#[test]
fn test_archived_extension_is_never_loaded_raw() {
    let dir = tempfile::tempdir().unwrap();
    // A valid raw module misnamed as a zipped one
    let path = write_file(dir.path(), "song.itz", &module_bytes("Raw", 1_000, 256));

    let engine = FakeEngine::new();
    let err = ModuleLoader::new(&engine).load_path(&path).unwrap_err();
    assert!(matches!(err, PluginError::CannotOpen { .. }));
    assert_eq!(engine.stats.loads(), 0);
}

#[cfg(feature = "archive")]
#[test]
fn test_archive_entry_shorter_than_declared() {
    let payload = module_bytes("Truncated", 1_000, 100);
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    writer.start_file("song.xm", options).unwrap();
    std::io::Write::write_all(&mut writer, &payload).unwrap();
    let mut zip = writer.finish().unwrap().into_inner();

    // Declare 4096 uncompressed bytes in the local header and the central
    // directory; the stored data stays 100 bytes long.
    let declared = 4096u32.to_le_bytes();
    assert_eq!(&zip[..4], b"PK\x03\x04");
    zip[22..26].copy_from_slice(&declared);
    let central = zip
        .windows(4)
        .position(|w| w == b"PK\x01\x02")
        .unwrap();
    zip[central + 24..central + 28].copy_from_slice(&declared);

    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "song.xmz", &zip);

    let engine = FakeEngine::new();
    let err = ModuleLoader::new(&engine).load_path(&path).unwrap_err();
    assert!(
        matches!(
            err,
            PluginError::ShortRead {
                expected: 4096,
                actual: 100
            }
        ),
        "got {err:?}"
    );
    assert_eq!(engine.stats.loads(), 0);
    assert_eq!(engine.stats.last_load_len(), 0);
}

#[cfg(not(feature = "archive"))]
#[test]
fn test_archived_extension_without_archive_support() {
    let dir = tempfile::tempdir().unwrap();
    // A valid raw module: it must still not be decoded under an archived name
    let path = write_file(dir.path(), "x.itz", &module_bytes("Raw", 1_000, 256));

    let engine = FakeEngine::new();
    let err = ModuleLoader::new(&engine).load_path(&path).unwrap_err();
    assert!(matches!(err, PluginError::UnsupportedCapability(_)));
    assert_eq!(engine.stats.last_load_len(), 0);
}

#[test]
fn test_load_file_convenience() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "song.S3M", &module_bytes("Convenient", 3_600, 512));

    let engine = FakeEngine::new();
    let module = load_file(&engine, &path).unwrap();
    assert_eq!(module.title(), Some("Convenient"));
    assert_eq!(module.length_in_samples(), 4 * 44_100);
}

#[test]
fn test_missing_file() {
    let engine = FakeEngine::new();
    let loader = ModuleLoader::new(&engine);

    let err = loader.load_path("/nonexistent/song.mod").unwrap_err();
    assert!(matches!(err, PluginError::CannotOpen { .. }));
    assert!(loader.load_module("/nonexistent/song.s3m").is_none());
}

#[test]
fn test_rejected_module_sets_no_volume() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "noise.mod", &[0x55; 128]);

    let engine = FakeEngine::new();
    let err = ModuleLoader::new(&engine).load_path(&path).unwrap_err();

    assert!(matches!(err, PluginError::DecodeRejected));
    assert_eq!(engine.stats.volume_calls(), 0);
}

#[test]
fn test_master_volume_set_once_to_max() {
    let engine = FakeEngine::new();
    let module = ModuleLoader::new(&engine)
        .load_bytes(&module_bytes("Loud", 10_000, 64))
        .unwrap();

    assert_eq!(engine.stats.volume_calls(), 1);
    assert_eq!(engine.stats.last_volume(), MASTER_VOLUME_MAX);
    assert_eq!(module.settings().master_volume, MASTER_VOLUME_MAX);
    // The engine-wide default is untouched
    assert_eq!(engine.settings.master_volume, 128);
}

#[test]
fn test_unrepresentable_settings_fail_before_decoding() {
    for (bits, channels) in [(32, 2), (16, 4), (24, 1), (8, 0)] {
        let engine = FakeEngine::with_settings(EngineSettings {
            bits,
            channels,
            ..EngineSettings::default()
        });
        let err = ModuleLoader::new(&engine)
            .load_bytes(&module_bytes("x", 1_000, 64))
            .unwrap_err();
        assert!(
            matches!(err, PluginError::UnrepresentableFormat { .. }),
            "{bits} bits / {channels} channels"
        );
        assert_eq!(engine.stats.last_load_len(), 0);
    }
}

#[test]
fn test_settings_snapshot_per_module() {
    let mut engine = FakeEngine::new();
    let data = module_bytes("Snap", 2_400, 64);

    let first = ModuleLoader::new(&engine).load_bytes(&data).unwrap();

    engine.apply_settings(&EngineSettings {
        bits: 8,
        channels: 1,
        frequency: 22_050,
        ..EngineSettings::default()
    });
    let second = ModuleLoader::new(&engine).load_bytes(&data).unwrap();

    assert_eq!(first.sample_rate(), 44_100);
    assert_eq!(first.sound_format(), SoundFormat::Bits16);
    assert_eq!(first.length_in_samples(), 2 * 44_100);
    assert_eq!(first.minimum_output_buffer_size(), 17_640);

    assert_eq!(second.sample_rate(), 22_050);
    assert_eq!(second.sound_format(), SoundFormat::Bits8);
    assert_eq!(second.channel_format(), ChannelFormat::Mono);
    assert_eq!(second.length_in_samples(), 2 * 22_050);
    assert_eq!(second.minimum_output_buffer_size(), 2_205);
}

#[test]
fn test_decode_until_end() {
    let engine = FakeEngine::with_settings(EngineSettings {
        frequency: 1_000,
        ..EngineSettings::default()
    });
    // 1000 Hz, 4 bytes per frame: 4000 bytes per second
    let mut module = ModuleLoader::new(&engine)
        .load_bytes(&module_bytes("Short", 1_000, 64))
        .unwrap();

    let mut buf = vec![0u8; 1_500];
    let mut total = 0;
    loop {
        let (written, ended) = module.decode(&mut buf);
        if ended {
            assert_eq!(written, 0);
            break;
        }
        assert!(buf[..written].iter().all(|&b| b == 0x11));
        total += written;
    }
    assert_eq!(total, 4_000);
}

#[test]
fn test_seek_converts_samples_to_ms() {
    let engine = FakeEngine::new();
    let mut module = ModuleLoader::new(&engine)
        .load_bytes(&module_bytes("Seek", 10_000, 64))
        .unwrap();

    module.seek_to_sample(66_150);
    assert_eq!(engine.stats.last_seek_ms(), 1_500);
    assert_eq!(module.decoder().remaining(), 8_500 * 176_400 / 1000);
}

#[test]
fn test_dropping_module_unloads_decoder() {
    let engine = FakeEngine::new();
    let module = ModuleLoader::new(&engine)
        .load_bytes(&module_bytes("Drop", 1_000, 64))
        .unwrap();
    assert_eq!(engine.stats.drops(), 0);
    drop(module);
    assert_eq!(engine.stats.drops(), 1);
}

/// Claims more bytes than it holds
struct LyingSource {
    inner: MemoryByteSource,
    claimed: u64,
}

impl ByteSource for LyingSource {
    fn capabilities(&self) -> SourceCapabilities {
        self.inner.capabilities()
    }

    fn length(&mut self) -> tracker_plugin::Result<u64> {
        Ok(self.claimed)
    }

    fn read(&mut self, buf: &mut [u8]) -> tracker_plugin::Result<usize> {
        self.inner.read(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> tracker_plugin::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn test_truncated_source_is_short_read() {
    let engine = FakeEngine::new();
    let mut source = LyingSource {
        inner: MemoryByteSource::new(module_bytes("Cut", 1_000, 100)),
        claimed: 4096,
    };

    let err = ModuleLoader::new(&engine).load_source(&mut source).unwrap_err();
    assert!(matches!(
        err,
        PluginError::ShortRead {
            expected: 4096,
            actual: 100
        }
    ));
    assert_eq!(engine.stats.loads(), 0);
}

#[test]
fn test_source_is_rewound_before_reading() {
    let engine = FakeEngine::new();
    let mut source = MemoryByteSource::new(module_bytes("Rewind", 3_000, 512));
    source.seek(SeekFrom::Start(200)).unwrap();

    let module = ModuleLoader::new(&engine).load_source(&mut source).unwrap();
    assert_eq!(module.title(), Some("Rewind"));
    assert_eq!(engine.stats.last_load_len(), 512);
}

#[test]
fn test_source_without_capabilities_is_unsupported() {
    let engine = FakeEngine::new();
    let data = module_bytes("Stream", 1_000, 64);
    let mut source = StreamByteSource::new(std::io::Cursor::new(data));

    let err = ModuleLoader::new(&engine).load_source(&mut source).unwrap_err();
    assert!(matches!(err, PluginError::UnsupportedCapability(_)));
}

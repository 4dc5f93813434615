mod common;

use common::{module_bytes, FakeEngine};
use tracker_plugin::{has_field, read_field, FieldKind, ModuleLoader};

#[test]
fn test_title_two_phase_read() {
    let engine = FakeEngine::new();
    let module = ModuleLoader::new(&engine)
        .load_bytes(&module_bytes("Test Song", 1_000, 64))
        .unwrap();
    let title = FieldKind::Title as u32;

    let mut len = 0;
    assert!(read_field(&module, title, None, &mut len));
    assert_eq!(len, 9);

    let mut buf = [0u8; 9];
    let mut len = buf.len();
    assert!(read_field(&module, title, Some(&mut buf[..]), &mut len));
    assert_eq!(len, 9);
    assert_eq!(&buf, b"Test Song");

    let mut small = [0u8; 5];
    let mut len = small.len();
    assert!(read_field(&module, title, Some(&mut small[..]), &mut len));
    assert_eq!(len, 5);
    assert_eq!(&small, b"Test ");
}

#[test]
fn test_length_query_is_idempotent() {
    let engine = FakeEngine::new();
    let module = ModuleLoader::new(&engine)
        .load_bytes(&module_bytes("Again", 1_000, 64))
        .unwrap();

    for _ in 0..3 {
        let mut len = 0;
        assert!(read_field(&module, FieldKind::Title as u32, None, &mut len));
        assert_eq!(len, 5);
    }
}

#[test]
fn test_other_fields_are_absent() {
    let engine = FakeEngine::new();
    let module = ModuleLoader::new(&engine)
        .load_bytes(&module_bytes("Only Title", 1_000, 64))
        .unwrap();

    for kind in [
        FieldKind::Invalid,
        FieldKind::Artist,
        FieldKind::Album,
        FieldKind::Comment,
        FieldKind::Year,
    ] {
        assert!(!has_field(kind as u32));

        let mut buf = [0xEEu8; 8];
        let mut len = buf.len();
        assert!(!read_field(&module, kind as u32, Some(&mut buf[..]), &mut len));
        assert_eq!(len, 0);
        assert_eq!(buf, [0xEE; 8]);
    }

    let mut len = 7;
    assert!(!read_field(&module, 1_000, None, &mut len));
    assert_eq!(len, 0);
}

#[test]
fn test_untitled_module_has_no_title_value() {
    let engine = FakeEngine::new();
    let module = ModuleLoader::new(&engine)
        .load_bytes(&module_bytes("", 1_000, 64))
        .unwrap();

    assert!(has_field(FieldKind::Title as u32));
    let mut len = 3;
    assert!(!read_field(&module, FieldKind::Title as u32, None, &mut len));
    assert_eq!(len, 0);
}

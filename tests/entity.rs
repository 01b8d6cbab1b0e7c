use rstest::*;
use sbon::entity::{EntityOptions, SBVJ01_MAGIC};
use sbon::{DecodeOptions, EntityRecord, ErrorKind, Variant, VariantMap};

fn hp_record() -> Vec<u8> {
    let mut data = b"SBVJ01".to_vec();
    data.extend_from_slice(&[0x04, b't', b'e', b's', b't']);
    data.extend_from_slice(&1i32.to_be_bytes());
    data.push(0x00);
    data.extend_from_slice(&[0x07, 0x01, 0x02, b'h', b'p', 0x02]);
    data.extend_from_slice(&100.0f64.to_be_bytes());
    data
}

#[test]
fn test_decode_known_record() {
    let record = EntityRecord::from_slice(&hp_record()).unwrap();
    assert_eq!(record.magic, SBVJ01_MAGIC);
    assert_eq!(record.name, "test");
    assert_eq!(record.version, 1);
    assert_eq!(record.subversion, 0);
    assert!(record.tail.is_empty());

    let expected: VariantMap = [("hp", 100.0)].into_iter().collect();
    assert_eq!(record.root, Variant::Map(expected));
    assert_eq!(record.to_bytes(), hp_record());
}

#[test]
fn test_edit_then_encode() {
    let mut data = hp_record();
    data.extend_from_slice(b"\x00trailer");

    let mut record = EntityRecord::from_slice(&data).unwrap();
    assert_eq!(record.tail, b"\x00trailer");
    *record.root.pointer_mut("/hp").unwrap() = Variant::Double(1.5);
    record
        .root
        .as_map_mut()
        .unwrap()
        .insert("shield", Variant::Int(7));

    let edited = record.to_bytes();
    assert!(edited.ends_with(b"\x00trailer"));
    let reread = EntityRecord::from_slice(&edited).unwrap();
    assert_eq!(reread.root.get("hp"), Some(&Variant::Double(1.5)));
    assert_eq!(reread.root.get("shield"), Some(&Variant::Int(7)));
}

#[rstest]
#[case(b"SBVJ02".as_slice())]
#[case(b"SBAsset6".as_slice())]
#[case(b"PK\x03\x04\x14\x00".as_slice())]
fn test_foreign_magic(#[case] data: &[u8]) {
    let err = EntityRecord::from_slice(data).unwrap_err();
    assert!(err.is_incompatible_file());
    assert!(matches!(err.kind(), ErrorKind::WrongFormatVersion { .. }));
}

#[test]
fn test_every_truncation_fails() {
    let data = hp_record();
    for len in 0..data.len() {
        let err = EntityRecord::from_slice(&data[..len]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { .. }), "len {}", len);
    }
}

#[test]
fn test_depth_limit_applies_to_root() {
    let options = EntityOptions::new().with_decode_options(DecodeOptions::new().with_max_depth(0));
    let err = EntityRecord::from_slice_with(&hp_record(), &options).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MaxDepthExceeded { max_depth: 0, offset: 16 }
    ));
}

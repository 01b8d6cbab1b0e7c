#![no_main]
use libfuzzer_sys::fuzz_target;
use sbon::{DecodeOptions, Variant};

fuzz_target!(|data: &[u8]| {
    let options = DecodeOptions::new().with_max_depth(64);
    let Ok((value, consumed)) = Variant::decode_with(data, 0, &options) else {
        return;
    };

    // Maps with duplicate keys collapse, so only the length can shrink
    let encoded = value.encode();
    assert!(encoded.len() <= consumed);

    let (again, len) = Variant::decode(&encoded, 0).unwrap();
    assert_eq!(len, encoded.len());
    assert_eq!(again.encode(), encoded);

    let _ = value.to_string();

    #[cfg(feature = "json")]
    {
        let _ = value.to_json();
    }
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use sbon::EntityRecord;

fuzz_target!(|data: &[u8]| {
    let Ok(record) = EntityRecord::from_slice(data) else {
        return;
    };

    let encoded = record.to_bytes();
    let again = EntityRecord::from_slice(&encoded).unwrap();
    assert_eq!(again.tail, record.tail);
    assert_eq!(again.to_bytes(), encoded);
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use sbon::ArchiveIndex;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let Ok(index) = ArchiveIndex::from_slice(data) else {
        return;
    };

    let mut reader = Cursor::new(data);
    for (path, entry) in index.iter() {
        assert_eq!(index.lookup(path), Some(entry));
        let _ = index.read_entry(&mut reader, path);
    }
});

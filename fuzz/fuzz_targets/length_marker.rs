#![no_main]

use libfuzzer_sys::fuzz_target;
use rdb_wire::{ChunkCursor, LengthReader, Progress};

// Fuzz target: a length marker fed one byte at a time must decode to the
// same marker, after the same number of bytes, as the marker fed whole.
fuzz_target!(|data: &[u8]| {
    let mut whole = LengthReader::new();
    let mut cur = ChunkCursor::new(data);
    let expected = match whole.poll(&mut cur) {
        Progress::Done(marker) => Some((marker, cur.position())),
        Progress::NeedMore => None,
    };

    let mut bytewise = LengthReader::new();
    let mut got = None;
    for (i, byte) in data.iter().enumerate() {
        let mut cur = ChunkCursor::new(std::slice::from_ref(byte));
        if let Progress::Done(marker) = bytewise.poll(&mut cur) {
            got = Some((marker, i + 1));
            break;
        }
    }
    assert_eq!(got, expected);
});

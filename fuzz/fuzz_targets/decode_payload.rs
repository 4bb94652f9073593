#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: whole-payload decode of arbitrary bytes.
//
// The fixed header is prepended so most inputs reach the record loop
// instead of failing on the magic check.
fuzz_target!(|data: &[u8]| {
    let _ = rdb_decoder::RdbDecoder::decode(data);

    let mut payload = rdb_wire::header::RDB_MAGIC.to_vec();
    payload.extend_from_slice(data);
    let _ = rdb_decoder::RdbDecoder::decode(&payload);
});

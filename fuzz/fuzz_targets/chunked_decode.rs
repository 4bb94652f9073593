#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rdb_decoder::{DecoderEvent, EventCollector, RdbDecoder};

// Fuzz target: chunking must not change what the decoder reports.
//
// Decodes `body` (behind a valid header) once whole and once split at
// `cuts`, and compares entity sequences, end markers and error kinds.
#[derive(Arbitrary, Debug)]
struct Input {
    body: Vec<u8>,
    cuts: Vec<u16>,
}

fn outcome(events: Vec<DecoderEvent>) -> Vec<String> {
    events
        .into_iter()
        .map(|event| match event {
            DecoderEvent::Entity(entity) => format!("{entity:?}"),
            DecoderEvent::Error(err) => format!("error {:?}", err.kind()),
            DecoderEvent::End => "end".to_owned(),
        })
        .collect()
}

fn run<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Vec<String> {
    let mut decoder = RdbDecoder::new(EventCollector::new());
    for chunk in chunks {
        decoder.feed(chunk);
    }
    decoder.finish();
    outcome(decoder.into_sink().into_events())
}

fuzz_target!(|input: Input| {
    let mut payload = rdb_wire::header::RDB_MAGIC.to_vec();
    payload.extend_from_slice(&input.body);

    let mut cuts: Vec<usize> = input
        .cuts
        .iter()
        .map(|&c| usize::from(c) % (payload.len() + 1))
        .collect();
    cuts.sort_unstable();

    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        chunks.push(&payload[start..cut]);
        start = cut;
    }
    chunks.push(&payload[start..]);

    assert_eq!(run(chunks), run([payload.as_slice()]));
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use smash_stream::accessor::{CollectorAccessor, DictCollectorAccessor};
use smash_stream::reader::BinaryReader;

fuzz_target!(|data: &[u8]| {
    // Corrupt headers, layouts and particle counts must surface as errors, never panics
    let mut collector = CollectorAccessor::new();
    if let Ok(mut reader) = BinaryReader::from_reader(
        Cursor::new(data.to_vec()),
        &["px", "py", "pdg_id", "charge"],
        &mut collector,
    ) {
        let _ = reader.read();
    }

    let mut dicts = DictCollectorAccessor::new();
    if let Ok(mut reader) =
        BinaryReader::from_reader(Cursor::new(data.to_vec()), &["t", "id"], &mut dicts)
    {
        let _ = reader.read();
    }
});

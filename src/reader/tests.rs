use std::io::Cursor;

use super::*;
use crate::accessor::{AccessorError, CollectorAccessor, DictCollectorAccessor, NullAccessor};
use crate::layout::RecordLayout;
use crate::writer::{InteractionInfo, Particle, StreamWriter};
use tempfile::tempdir;

fn particle(i: usize) -> Particle {
    Particle::new()
        .with(Quantity::Px, i as f64 * 0.5)
        .with(Quantity::Py, -(i as f64))
        .with(Quantity::PdgId, 211 + i as i32)
}

/// Stream with one event per entry of `sizes`, layout px, py, pdg_id
fn stream(sizes: &[usize]) -> Vec<u8> {
    let layout = RecordLayout::packed(&[Quantity::Px, Quantity::Py, Quantity::PdgId]).unwrap();
    let mut writer = StreamWriter::new(Vec::new(), layout).unwrap();
    let mut counter = 0;
    for (event, &size) in sizes.iter().enumerate() {
        let particles: Vec<_> = (0..size)
            .map(|_| {
                counter += 1;
                particle(counter)
            })
            .collect();
        writer
            .write_particle_block(event as i32, 0, &particles)
            .unwrap();
        writer
            .write_end_block(event as i32, 0, 1.0 + event as f64, size == 0)
            .unwrap();
    }
    writer.into_inner().unwrap()
}

#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl Accessor for Recorder {
    fn on_particle_block(&mut self, block: &ParticleBlock<'_>) -> Result<(), AccessorError> {
        self.calls
            .push(format!("p{}:{}", block.event_number, block.npart()));
        Ok(())
    }

    fn on_end_block(&mut self, block: &EndBlock) -> Result<(), AccessorError> {
        self.calls.push(format!("f{}", block.event_number));
        Ok(())
    }
}

#[test]
fn test_two_event_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let mut collector = CollectorAccessor::new();
    let mut reader = BinaryReader::from_reader(
        Cursor::new(stream(&[3, 5])),
        &["px", "pdg_id"],
        &mut collector,
    )?;
    let stats = reader.read()?;
    drop(reader);

    assert_eq!(collector.get_event_sizes(), &[3, 5]);
    assert_eq!(collector.get_double_array("px").map(|v| v.len()), Some(8));
    assert_eq!(collector.get_int_array("pdg_id").map(|v| v.len()), Some(8));
    assert_eq!(collector.get_int_array("pdg_id").unwrap()[0], 212);
    assert_eq!(collector.get_double_array("px").unwrap()[7], 4.0);
    assert_eq!(collector.column_names(), vec!["px", "pdg_id"]);

    assert_eq!(stats.particle_blocks, 2);
    assert_eq!(stats.end_blocks, 2);
    assert_eq!(stats.particles, 8);
    Ok(())
}

#[test]
fn test_event_sizes_sum_to_particles() -> Result<(), Box<dyn std::error::Error>> {
    let sizes = [0, 7, 1, 12, 4];
    let mut collector = CollectorAccessor::new();
    let mut reader =
        BinaryReader::from_reader(Cursor::new(stream(&sizes)), &["py"], &mut collector)?;
    let stats = reader.read()?;
    drop(reader);

    let total: usize = collector.get_event_sizes().iter().sum();
    assert_eq!(total as u64, stats.particles);
    assert_eq!(collector.get_double_array("py").unwrap().len(), total);
    Ok(())
}

#[test]
fn test_absent_quantity_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let mut collector = CollectorAccessor::new();
    let mut reader = BinaryReader::from_reader(
        Cursor::new(stream(&[2])),
        &["pz", "px", "charge"],
        &mut collector,
    )?;
    reader.read()?;
    drop(reader);

    assert!(collector.get_double_array("pz").is_none());
    assert!(collector.get_int_array("charge").is_none());
    assert_eq!(collector.column_names(), vec!["px"]);

    let mut dicts = DictCollectorAccessor::new();
    let mut reader =
        BinaryReader::from_reader(Cursor::new(stream(&[2])), &["pz", "pdg_id"], &mut dicts)?;
    reader.read()?;
    drop(reader);

    for particle in dicts.get_particle_dicts() {
        assert_eq!(particle.keys().collect::<Vec<_>>(), vec!["pdg_id"]);
    }
    Ok(())
}

#[test]
fn test_decoding_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let bytes = stream(&[4, 2, 9]);
    let mut first = CollectorAccessor::new();
    let mut second = CollectorAccessor::new();

    BinaryReader::from_reader(Cursor::new(bytes.clone()), &["px", "pdg_id"], &mut first)?
        .read()?;
    BinaryReader::from_reader(Cursor::new(bytes), &["px", "pdg_id"], &mut second)?.read()?;

    assert_eq!(first.columns(), second.columns());
    assert_eq!(first.get_event_sizes(), second.get_event_sizes());
    Ok(())
}

#[test]
fn test_second_read_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BinaryReader::from_reader(Cursor::new(stream(&[1])), &["px"], NullAccessor)?;
    assert!(!reader.is_consumed());
    reader.read()?;
    assert!(reader.is_consumed());

    let err = reader.read().unwrap_err();
    assert!(matches!(err, ReaderError::StreamConsumed));
    Ok(())
}

#[test]
fn test_truncated_record_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let mut bytes = stream(&[3]);
    // drop the end block and part of the last record
    bytes.truncate(bytes.len() - 18 - 5);

    let mut collector = CollectorAccessor::new();
    let mut reader = BinaryReader::from_reader(Cursor::new(bytes), &["px"], &mut collector)?;
    let err = reader.read().unwrap_err();
    drop(reader);

    assert!(matches!(
        err,
        ReaderError::Truncated {
            stage: Stage::ParticleRecords,
            ..
        }
    ));
    assert!(err.is_format_error());
    assert!(collector.get_event_sizes().is_empty());
    assert!(collector.get_double_array("px").is_none());
    Ok(())
}

#[test]
fn test_truncated_end_block() {
    let mut bytes = stream(&[1]);
    bytes.truncate(bytes.len() - 3);
    let mut reader =
        BinaryReader::from_reader(Cursor::new(bytes), &["px"], NullAccessor).unwrap();
    assert!(matches!(
        reader.read(),
        Err(ReaderError::Truncated {
            stage: Stage::EndBlock,
            ..
        })
    ));
}

#[test]
fn test_empty_stream_after_header() -> Result<(), Box<dyn std::error::Error>> {
    let mut recorder = Recorder::default();
    let mut reader =
        BinaryReader::from_reader(Cursor::new(stream(&[])), &["px"], &mut recorder)?;
    let stats = reader.read()?;
    assert_eq!(stats.particle_blocks, 0);
    assert_eq!(reader.header().map(|h| h.layout.len()), Some(3));
    drop(reader);
    assert!(recorder.calls.is_empty());
    Ok(())
}

#[test]
fn test_blocks_arrive_in_file_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut recorder = Recorder::default();
    BinaryReader::from_reader(Cursor::new(stream(&[2, 0, 1])), &["px"], &mut recorder)?
        .read()?;
    assert_eq!(recorder.calls, vec!["p0:2", "f0", "p1:0", "f1", "p2:1", "f2"]);
    Ok(())
}

#[test]
fn test_unknown_quantity_before_io() {
    let err = BinaryReader::new("/nonexistent/particles.bin", &["px", "rapidity"], NullAccessor)
        .err()
        .unwrap();
    match err {
        ReaderError::UnknownQuantity(e) => assert_eq!(e.name, "rapidity"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let mut reader =
        BinaryReader::new("/nonexistent/particles.bin", &["px"], NullAccessor).unwrap();
    assert!(matches!(reader.read(), Err(ReaderError::IoError(_))));
}

#[test]
fn test_bad_magic() {
    let mut bytes = stream(&[1]);
    bytes[0] = b'X';
    let mut reader =
        BinaryReader::from_reader(Cursor::new(bytes), &["px"], NullAccessor).unwrap();
    assert!(matches!(reader.read(), Err(ReaderError::BadHeader { offset: 0, .. })));
}

#[test]
fn test_unsupported_version() {
    let mut bytes = stream(&[1]);
    bytes[4] = 99;
    let mut reader =
        BinaryReader::from_reader(Cursor::new(bytes), &["px"], NullAccessor).unwrap();
    assert!(matches!(reader.read(), Err(ReaderError::BadHeader { offset: 4, .. })));
}

#[test]
fn test_unexpected_block_tag() {
    let mut bytes = stream(&[]);
    let offset = bytes.len() as u64;
    bytes.push(b'z');
    let mut reader =
        BinaryReader::from_reader(Cursor::new(bytes), &["px"], NullAccessor).unwrap();
    match reader.read() {
        Err(ReaderError::UnexpectedBlock { tag, offset: at }) => {
            assert_eq!(tag, b'z');
            assert_eq!(at, offset);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_layout_out_of_bounds_in_header() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"SMSH");
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(&Quantity::Px.tag().to_le_bytes());
    bytes.extend_from_slice(&4u32.to_le_bytes());
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());

    let mut reader =
        BinaryReader::from_reader(Cursor::new(bytes), &["px"], NullAccessor).unwrap();
    assert!(matches!(reader.read(), Err(ReaderError::InvalidLayout(_))));
}

#[test]
fn test_unknown_layout_tag_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"SMSH");
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&Quantity::Px.tag().to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&500u32.to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());
    bytes.push(b'p');
    bytes.extend_from_slice(&0i32.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&2.5f64.to_le_bytes());
    bytes.extend_from_slice(&[0xAB; 8]);

    let mut collector = CollectorAccessor::new();
    let mut reader = BinaryReader::from_reader(Cursor::new(bytes), &["px"], &mut collector)?;
    reader.read()?;
    assert_eq!(reader.header().unwrap().unknown_tags, vec![500]);
    drop(reader);
    assert_eq!(collector.get_double_array("px"), Some(&[2.5][..]));
    Ok(())
}

#[test]
fn test_interaction_blocks_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let layout = RecordLayout::packed(&[Quantity::Px, Quantity::PdgId])?;
    let mut writer = StreamWriter::new(Vec::new(), layout)?;
    writer.write_interaction_block(
        &[particle(1), particle(2)],
        &[particle(3)],
        InteractionInfo::default(),
    )?;
    writer.write_particle_block(0, 0, &[particle(4)])?;
    writer.write_end_block(0, 0, 0.5, false)?;
    let bytes = writer.into_inner()?;

    let mut recorder = Recorder::default();
    let stats = BinaryReader::from_reader(Cursor::new(bytes), &["px"], &mut recorder)?.read()?;
    assert_eq!(stats.interaction_blocks, 1);
    assert_eq!(recorder.calls, vec!["p0:1", "f0"]);
    Ok(())
}

#[test]
fn test_accessor_error_aborts_read() {
    struct FailOnSecond(usize);
    impl Accessor for FailOnSecond {
        fn on_particle_block(&mut self, _: &ParticleBlock<'_>) -> Result<(), AccessorError> {
            self.0 += 1;
            if self.0 == 2 {
                return Err(AccessorError::Failed("second block rejected".to_string()));
            }
            Ok(())
        }
    }

    let mut accessor = FailOnSecond(0);
    let mut reader =
        BinaryReader::from_reader(Cursor::new(stream(&[1, 1, 1])), &["px"], &mut accessor).unwrap();
    let err = reader.read().unwrap_err();
    drop(reader);
    assert!(matches!(err, ReaderError::Accessor { .. }));
    assert!(err.to_string().contains("second block rejected"));
    assert_eq!(accessor.0, 2);
}

#[test]
fn test_read_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("particles.bin");
    std::fs::write(&path, stream(&[3, 5]))?;

    let mut reader = BinaryReader::new(&path, &["px", "pdg_id"], CollectorAccessor::new())?;
    let stats = reader.read()?;
    assert_eq!(stats.bytes_read, std::fs::metadata(&path)?.len());

    let collector = reader.into_accessor();
    assert_eq!(collector.get_event_sizes(), &[3, 5]);
    Ok(())
}

use super::*;
use crate::accessor::DictCollectorAccessor;
use crate::block::QuantityValue;
use crate::quantity::Quantity;
use crate::reader::BinaryReader;

fn layout() -> RecordLayout {
    RecordLayout::packed(&[Quantity::Px, Quantity::PdgId]).unwrap()
}

#[test]
fn test_header_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let writer = StreamWriter::with_header(Vec::new(), layout(), FormatVariant::Custom, "gen")?;
    assert_eq!(writer.stats().bytes_written, 4 + 2 + 2 + 4 + 3 + 4 + 16 + 4);
    let bytes = writer.into_inner()?;

    assert_eq!(&bytes[0..4], b"SMSH");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), FORMAT_VERSION);
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 2);
    assert_eq!(&bytes[12..15], b"gen");
    assert_eq!(bytes.len() as u64, 4 + 2 + 2 + 4 + 3 + 4 + 16 + 4);
    assert_eq!(&bytes[bytes.len() - 4..], &LAYOUT_END.to_le_bytes());
    Ok(())
}

#[test]
fn test_stats_match_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = StreamWriter::new(Vec::new(), layout())?;
    let p = Particle::new().with(Quantity::Px, 1.0).with(Quantity::PdgId, 2212);
    writer.write_particle_block(0, 0, &[p.clone(), p.clone()])?;
    writer.write_interaction_block(&[p.clone()], &[p], InteractionInfo::default())?;
    writer.write_end_block(0, 0, 1.5, false)?;

    let expected = writer.stats().bytes_written;
    assert_eq!(writer.stats().particles, 2);
    assert_eq!(writer.stats().interaction_blocks, 1);
    let bytes = writer.into_inner()?;
    assert_eq!(bytes.len() as u64, expected);
    Ok(())
}

#[test]
fn test_type_mismatch() {
    let mut writer = StreamWriter::new(Vec::new(), layout()).unwrap();
    let bad = Particle::new().with(Quantity::PdgId, 1.5);
    let err = writer.write_particle_block(0, 0, &[bad]).unwrap_err();
    assert!(matches!(
        err,
        WriterError::TypeMismatch { quantity: "pdg_id", expected: QuantityType::Int32 }
    ));
}

#[test]
fn test_missing_values_are_zero_and_extra_values_dropped(
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = StreamWriter::new(Vec::new(), layout())?;
    let p = Particle::new().with(Quantity::PdgId, 111).with(Quantity::Pz, 9.0);
    writer.write_particle_block(4, 1, &[p])?;
    let bytes = writer.into_inner()?;

    let mut dicts = DictCollectorAccessor::new();
    let mut reader = BinaryReader::from_reader(
        std::io::Cursor::new(bytes),
        &["px", "pdg_id", "pz"],
        &mut dicts,
    )?;
    reader.read()?;
    drop(reader);

    let particle = &dicts.get_particle_dicts()[0];
    assert_eq!(particle.get("px"), Some(QuantityValue::Double(0.0)));
    assert_eq!(particle.get("pdg_id"), Some(QuantityValue::Int(111)));
    assert_eq!(particle.get("pz"), None);
    Ok(())
}

#[test]
fn test_particle_set_replaces() {
    let mut p = Particle::new().with(Quantity::Px, 1.0);
    p.set(Quantity::Px, 2.0);
    assert_eq!(p.values().len(), 1);
    assert_eq!(p.get(Quantity::Px), Some(QuantityValue::Double(2.0)));
}

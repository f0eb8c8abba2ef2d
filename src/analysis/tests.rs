use std::path::PathBuf;

use super::*;
use crate::layout::RecordLayout;
use crate::quantity::Quantity;
use crate::writer::{Particle, StreamWriter};
use tempfile::tempdir;

/// Two events of sizes 3 and 5 with px, py, pdg_id
fn write_stream(dir: &Path) -> PathBuf {
    let path = dir.join("events.bin");
    let layout = RecordLayout::packed(&[Quantity::Px, Quantity::Py, Quantity::PdgId]).unwrap();
    let mut writer = StreamWriter::create(&path, layout).unwrap();
    for (event, size) in [3usize, 5].into_iter().enumerate() {
        let particles: Vec<_> = (0..size)
            .map(|i| {
                Particle::new()
                    .with(Quantity::Px, 0.3 * i as f64)
                    .with(Quantity::Py, 0.4 * i as f64)
                    .with(Quantity::PdgId, if i % 2 == 0 { 211 } else { -211 })
            })
            .collect();
        writer.write_particle_block(event as i32, 0, &particles).unwrap();
        writer
            .write_end_block(event as i32, 0, 2.0 * (event + 1) as f64, false)
            .unwrap();
    }
    writer.finish().unwrap();
    path
}

fn noop_factory() -> Box<dyn Analysis> {
    Box::new(ParticleCount::new())
}

#[test]
fn test_builtin_registry() {
    let registry = AnalysisRegistry::with_builtins();
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["particle_count", "pt_spectrum"]
    );
    assert_eq!(registry.create("particle_count").unwrap().name(), "particle_count");
    assert!(registry.create("does-not-exist").is_none());
}

#[test]
fn test_registry_is_append_only() {
    let mut registry = AnalysisRegistry::new();
    assert!(registry.is_empty());
    registry.register("custom", noop_factory).unwrap();
    let err = registry.register("custom", noop_factory).unwrap_err();
    assert!(matches!(err, AnalysisError::DuplicateAnalysis { ref name } if name == "custom"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_global_registry_has_builtins() {
    assert!(AnalysisRegistry::global().contains("particle_count"));
    assert!(matches!(
        AnalysisRegistry::install(AnalysisRegistry::new()),
        Err(AnalysisError::RegistryInitialized)
    ));
}

#[test]
fn test_unknown_analysis_does_no_io() {
    // The path does not exist, so any I/O attempt would surface as an I/O error.
    let err = run_analysis_with(
        &AnalysisRegistry::with_builtins(),
        "/nonexistent/dir/events.bin",
        "does-not-exist",
        &["px"],
        None,
        true,
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::UnknownAnalysis { ref name } if name == "does-not-exist"));
    assert_eq!(err.to_string(), "Unknown analysis 'does-not-exist'");
}

#[test]
fn test_unknown_quantity_does_no_io() {
    let err = run_analysis(
        "/nonexistent/dir/events.bin",
        "particle_count",
        &["rapidity"],
        None,
        true,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Reader(crate::reader::ReaderError::UnknownQuantity(_))
    ));
}

#[test]
fn test_run_particle_count() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_stream(dir.path());
    let save_path = dir.path().join("count.json");

    let output = run_analysis(
        &path,
        "particle_count",
        &["pdg_id"],
        Some(save_path.as_path()),
        true,
    )?;
    assert!(output.contains("total particles:       8"));
    assert!(output.contains("mean impact parameter: 3.000 fm"));

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&save_path)?)?;
    assert_eq!(saved["analysis"], "particle_count");
    assert_eq!(saved["result"]["total_particles"], 8);
    assert_eq!(saved["result"]["counts"]["211"], 5);
    assert_eq!(saved["result"]["counts"]["-211"], 3);
    Ok(())
}

#[test]
fn test_run_without_print_returns_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_stream(dir.path());
    let output = run_analysis(&path, "pt_spectrum", &["px", "py"], None, false)?;
    assert!(output.is_empty());
    Ok(())
}

#[test]
fn test_default_quantities_from_analysis() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = write_stream(dir.path());
    let no_quantities: [&str; 0] = [];
    let output = run_analysis(&path, "pt_spectrum", &no_quantities, None, true)?;
    assert!(output.contains("entries: 8"));
    Ok(())
}

#[test]
fn test_pt_spectrum_without_momentum_fails() {
    let dir = tempdir().unwrap();
    let path = write_stream(dir.path());
    let err = run_analysis(&path, "pt_spectrum", &["pdg_id"], None, true).unwrap_err();
    assert!(err.to_string().contains("requires quantities 'px' and 'py'"));
}

#[test]
fn test_pt_spectrum_binning() {
    let mut spectrum = PtSpectrum::new();
    spectrum.fill(0.1);
    spectrum.fill(0.25);
    spectrum.fill(3.99);
    spectrum.fill(4.0);
    spectrum.fill(f64::NAN);

    let result = spectrum.result();
    assert_eq!(result.entries, 5);
    assert_eq!(result.overflow, 2);
    assert_eq!(result.bins[0].count, 1);
    assert_eq!(result.bins[1].count, 1);
    assert_eq!(result.bins[PT_BINS_LAST].count, 1);
    assert!((result.mean_pt - (0.1 + 0.25 + 3.99) / 3.0).abs() < 1e-12);
}

const PT_BINS_LAST: usize = PT_BINS - 1;

#[test]
fn test_print_before_read_is_partial_not_error() {
    let count = ParticleCount::new();
    let mut out = Vec::new();
    count.print_result_to(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("total particles:       0"));
}

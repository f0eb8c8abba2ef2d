//! # Analyses
//!
//! An [`Analysis`] is a named accessor that accumulates a result over a
//! whole stream and can save or print it afterwards. Analyses are created
//! by name from an [`AnalysisRegistry`] and fed through a
//! [`DispatchingAccessor`], so several of them can share one pass over a
//! file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use smash_stream::analysis::run_analysis;
//!
//! let summary = run_analysis(
//!     "particles.bin",
//!     "particle_count",
//!     &["pdg_id"],
//!     None,
//!     true,
//! )?;
//! println!("{}", summary);
//! # Ok::<(), smash_stream::analysis::AnalysisError>(())
//! ```

use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::accessor::{Accessor, DispatchingAccessor};
use crate::reader::BinaryReader;

mod error;
mod particle_count;
mod pt_spectrum;
mod registry;

#[cfg(test)]
mod tests;

pub use error::AnalysisError;
pub use particle_count::{ParticleCount, ParticleCountResult};
pub use pt_spectrum::{PtBin, PtSpectrum, PtSpectrumResult, PT_BINS, PT_MAX};
pub use registry::{AnalysisFactory, AnalysisRegistry};

/// Named stream consumer with a savable, printable result
///
/// `save` and `print_result_to` may be called at any time; before the read
/// has finished they report whatever has been accumulated so far.
pub trait Analysis: Accessor {
    /// Registry name
    fn name(&self) -> &str;

    /// Quantities the analysis reads; used when the caller requests none
    fn required_quantities(&self) -> &[&'static str] {
        &[]
    }

    /// Persist the result to `path`
    fn save(&self, path: &Path) -> Result<(), AnalysisError>;

    /// Write a human-readable summary
    fn print_result_to(&self, sink: &mut dyn Write) -> io::Result<()>;
}

#[derive(Serialize)]
struct SavedResult<'a, T: Serialize> {
    analysis: &'a str,
    generator: String,
    created: DateTime<Utc>,
    result: &'a T,
}

/// Write `result` as pretty JSON, replacing `path` atomically
///
/// The document is written to a temporary file next to `path` and renamed
/// over it once complete.
pub fn save_json<T: Serialize>(
    path: &Path,
    analysis: &str,
    result: &T,
) -> Result<(), AnalysisError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    let document = SavedResult {
        analysis,
        generator: crate::writer::default_generator(),
        created: Utc::now(),
        result,
    };
    serde_json::to_writer_pretty(&mut file, &document)?;
    writeln!(file)?;
    file.persist(path)?;
    info!("Saved {} result to {}", analysis, path.display());
    Ok(())
}

/// Run one analysis over a file using the process-wide registry
///
/// Returns the printed summary, or an empty string if `print_output` is
/// false.
pub fn run_analysis<P, S>(
    filepath: P,
    analysis_name: &str,
    quantities: &[S],
    save_path: Option<&Path>,
    print_output: bool,
) -> Result<String, AnalysisError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    run_analysis_with(
        AnalysisRegistry::global(),
        filepath,
        analysis_name,
        quantities,
        save_path,
        print_output,
    )
}

/// Run one analysis over a file using an explicit registry
///
/// The analysis name and quantities are validated before the file is opened.
pub fn run_analysis_with<P, S>(
    registry: &AnalysisRegistry,
    filepath: P,
    analysis_name: &str,
    quantities: &[S],
    save_path: Option<&Path>,
    print_output: bool,
) -> Result<String, AnalysisError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let analysis = registry
        .create(analysis_name)
        .ok_or_else(|| AnalysisError::UnknownAnalysis {
            name: analysis_name.to_string(),
        })?;

    let quantities: Vec<String> = if quantities.is_empty() {
        analysis
            .required_quantities()
            .iter()
            .map(|q| q.to_string())
            .collect()
    } else {
        quantities.iter().map(|q| q.as_ref().to_string()).collect()
    };

    let mut dispatcher = DispatchingAccessor::new();
    dispatcher.register_analysis(analysis);

    let mut reader = BinaryReader::new(filepath, &quantities, dispatcher)?;
    reader.read()?;

    let mut output = Vec::new();
    for analysis in reader.into_accessor().into_analyses() {
        if let Some(path) = save_path {
            analysis.save(path)?;
        }
        if print_output {
            analysis.print_result_to(&mut output)?;
        }
    }
    Ok(String::from_utf8_lossy(&output).into_owned())
}

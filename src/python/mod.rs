//! Python bindings for smash-stream
//!
//! Exposes the reader, the built-in collectors and `run_analysis_file` to
//! Python via PyO3. Decoding runs with the GIL released; collected columns
//! are handed back as numpy arrays.
//!
//! # Example
//!
//! ```python
//! import smash_stream
//!
//! collector = smash_stream.CollectorAccessor()
//! reader = smash_stream.BinaryReader("particles.bin", ["px", "py", "pdg_id"], collector)
//! stats = reader.read()
//!
//! px = collector.get_double_array("px")
//! sizes = collector.get_event_sizes()
//!
//! summary = smash_stream.run_analysis_file("particles.bin", "pt_spectrum", ["px", "py"])
//! print(summary)
//! ```

mod accessors;
pub(crate) mod exceptions;
mod reader;

use std::path::PathBuf;

use pyo3::prelude::*;

use crate::analysis;

/// Run a registered analysis over a file and return its printed summary
///
/// Args:
///     filepath: Path to the particle stream
///     analysis_name: Registered analysis name
///     quantities: Quantities to decode (empty for the analysis defaults)
///     save_path: Optional path to save the result to
///     print_output: Whether to produce the summary text
///
/// Returns:
///     The summary text, or an empty string if print_output is False
#[pyfunction]
#[pyo3(signature = (filepath, analysis_name, quantities, save_path=None, print_output=true))]
fn run_analysis_file(
    py: Python<'_>,
    filepath: PathBuf,
    analysis_name: String,
    quantities: Vec<String>,
    save_path: Option<PathBuf>,
    print_output: bool,
) -> PyResult<String> {
    py.allow_threads(|| {
        analysis::run_analysis(
            &filepath,
            &analysis_name,
            &quantities,
            save_path.as_deref(),
            print_output,
        )
    })
    .map_err(PyErr::from)
}

/// Initialize the smash_stream Python module
#[pymodule]
fn smash_stream(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Initialize logging bridge to Python's logging module
    pyo3_log::init();

    m.add("SmashStreamError", py.get_type_bound::<exceptions::SmashStreamError>())?;
    m.add("UnknownNameError", py.get_type_bound::<exceptions::UnknownNameError>())?;
    m.add("FormatError", py.get_type_bound::<exceptions::FormatError>())?;
    m.add("UsageError", py.get_type_bound::<exceptions::UsageError>())?;

    m.add_class::<accessors::PyCollectorAccessor>()?;
    m.add_class::<accessors::PyDictCollectorAccessor>()?;
    m.add_class::<reader::PyBinaryReader>()?;

    m.add_function(wrap_pyfunction!(run_analysis_file, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("FORMAT_VERSION", crate::format::FORMAT_VERSION)?;

    Ok(())
}

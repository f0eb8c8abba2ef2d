//! Python binding for BinaryReader

use std::path::PathBuf;

use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::accessors::{PyCollectorAccessor, PyDictCollectorAccessor};
use super::exceptions::UsageError;
use crate::accessor::Accessor;
use crate::quantity::{self, Quantity};
use crate::reader::{BinaryReader, ReadStats, ReaderError};

enum Target {
    Collector(Py<PyCollectorAccessor>),
    Dict(Py<PyDictCollectorAccessor>),
}

/// Single-pass reader feeding one of the built-in collectors
///
/// Quantity names are validated on construction; the file is opened by
/// `read()`, which may only be called once.
///
/// Example:
///     >>> collector = smash_stream.CollectorAccessor()
///     >>> reader = smash_stream.BinaryReader("particles.bin", ["px", "py"], collector)
///     >>> reader.read()
///     {'particle_blocks': 10, 'end_blocks': 10, ...}
#[pyclass(name = "BinaryReader")]
pub struct PyBinaryReader {
    path: Option<PathBuf>,
    quantities: Vec<Quantity>,
    target: Target,
}

fn read_into<A: Accessor>(
    path: PathBuf,
    quantities: &[&str],
    accessor: A,
) -> Result<ReadStats, ReaderError> {
    BinaryReader::new(path, quantities, accessor)?.read()
}

#[pymethods]
impl PyBinaryReader {
    #[new]
    fn new(
        filepath: PathBuf,
        quantities: Vec<String>,
        accessor: &Bound<'_, PyAny>,
    ) -> PyResult<Self> {
        let quantities = quantity::resolve_all(&quantities).map_err(ReaderError::from)?;
        let target = if let Ok(c) = accessor.downcast::<PyCollectorAccessor>() {
            Target::Collector(c.clone().unbind())
        } else if let Ok(d) = accessor.downcast::<PyDictCollectorAccessor>() {
            Target::Dict(d.clone().unbind())
        } else {
            return Err(PyTypeError::new_err(
                "accessor must be a CollectorAccessor or DictCollectorAccessor",
            ));
        };
        Ok(Self {
            path: Some(filepath),
            quantities,
            target,
        })
    }

    /// Decode the whole stream into the accessor
    ///
    /// Returns:
    ///     dict of read statistics
    fn read<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let path = self
            .path
            .take()
            .ok_or_else(|| UsageError::new_err(ReaderError::StreamConsumed.to_string()))?;
        let names: Vec<&str> = self.quantities.iter().map(|q| q.name()).collect();

        let stats = match &self.target {
            Target::Collector(c) => {
                let mut guard = c.borrow_mut(py);
                let inner = &mut guard.inner;
                py.allow_threads(|| read_into(path, &names, inner))?
            }
            Target::Dict(d) => {
                let mut guard = d.borrow_mut(py);
                let inner = &mut guard.inner;
                py.allow_threads(|| read_into(path, &names, inner))?
            }
        };

        let dict = PyDict::new_bound(py);
        dict.set_item("particle_blocks", stats.particle_blocks)?;
        dict.set_item("end_blocks", stats.end_blocks)?;
        dict.set_item("interaction_blocks", stats.interaction_blocks)?;
        dict.set_item("particles", stats.particles)?;
        dict.set_item("bytes_read", stats.bytes_read)?;
        Ok(dict)
    }

    /// Requested quantity names after validation
    #[getter]
    fn quantities(&self) -> Vec<&'static str> {
        self.quantities.iter().map(|q| q.name()).collect()
    }

    /// True once `read()` has been called
    #[getter]
    fn consumed(&self) -> bool {
        self.path.is_none()
    }
}

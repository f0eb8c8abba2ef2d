//! Python wrappers for the built-in collectors

use numpy::{IntoPyArray, PyArray1};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::accessor::{Accessor, CollectorAccessor, DictCollectorAccessor};
use crate::block::QuantityValue;

/// Collects decoded quantities into flat numpy-ready columns
///
/// Example:
///     >>> collector = smash_stream.CollectorAccessor()
///     >>> smash_stream.BinaryReader("particles.bin", ["px"], collector).read()
///     >>> px = collector.get_double_array("px")
#[pyclass(name = "CollectorAccessor")]
#[derive(Default)]
pub struct PyCollectorAccessor {
    pub(crate) inner: CollectorAccessor,
}

#[pymethods]
impl PyCollectorAccessor {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Values of a double quantity as a float64 array
    ///
    /// Returns an empty array if the quantity was not collected.
    fn get_double_array<'py>(&self, py: Python<'py>, name: &str) -> Bound<'py, PyArray1<f64>> {
        PyArray1::from_slice_bound(py, self.inner.get_double_array(name).unwrap_or_default())
    }

    /// Values of an int32 quantity as an int32 array
    ///
    /// Returns an empty array if the quantity was not collected.
    fn get_int_array<'py>(&self, py: Python<'py>, name: &str) -> Bound<'py, PyArray1<i32>> {
        PyArray1::from_slice_bound(py, self.inner.get_int_array(name).unwrap_or_default())
    }

    /// Particle count of every block as an int64 array
    fn get_event_sizes<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<i64>> {
        self.inner
            .get_event_sizes()
            .iter()
            .map(|&n| n as i64)
            .collect::<Vec<_>>()
            .into_pyarray_bound(py)
    }

    /// Names of the collected columns
    fn column_names(&self) -> Vec<&'static str> {
        self.inner.column_names()
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        self.inner.get_int(name)
    }

    fn get_double(&self, name: &str) -> Option<f64> {
        self.inner.get_double(name)
    }

    fn __repr__(&self) -> String {
        format!(
            "CollectorAccessor(blocks={}, particles={}, columns={:?})",
            self.inner.num_blocks(),
            self.inner.total_particles(),
            self.inner.column_names()
        )
    }
}

/// Collects one dict per particle
///
/// Example:
///     >>> collector = smash_stream.DictCollectorAccessor()
///     >>> smash_stream.BinaryReader("particles.bin", ["px", "pdg_id"], collector).read()
///     >>> collector.get_particle_dicts()[0]
///     {'px': 0.31, 'pdg_id': 211}
#[pyclass(name = "DictCollectorAccessor")]
#[derive(Default)]
pub struct PyDictCollectorAccessor {
    pub(crate) inner: DictCollectorAccessor,
}

#[pymethods]
impl PyDictCollectorAccessor {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// List of `{quantity: value}` dicts in stream order
    fn get_particle_dicts<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyList>> {
        let list = PyList::empty_bound(py);
        for particle in self.inner.get_particle_dicts() {
            let dict = PyDict::new_bound(py);
            for (name, value) in particle.iter() {
                match value {
                    QuantityValue::Double(v) => dict.set_item(name, v)?,
                    QuantityValue::Int(v) => dict.set_item(name, v)?,
                }
            }
            list.append(dict)?;
        }
        Ok(list)
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        self.inner.get_int(name)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

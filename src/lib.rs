pub mod contender;
pub mod errors;
pub mod frame;
pub mod io;
pub mod observability;
pub mod plan;
pub mod runner;
pub mod scan;
pub mod series;

pub use errors::{FrameError, FrameResult};
pub use frame::{Axis, DataFrame, Reduction};
pub use series::Series;

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;
use std::collections::HashMap;

fn to_py_err(e: FrameError) -> PyErr {
    match e {
        FrameError::IoError(_) | FrameError::GlobError(_) => PyIOError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn to_axis(axis: usize) -> PyResult<Axis> {
    Axis::try_from(axis).map_err(to_py_err)
}

/// Wrapper for Series that exposes it to Python
#[pyclass(name = "Series")]
#[derive(Clone)]
pub struct PySeries {
    inner: Series,
}

#[pymethods]
impl PySeries {
    #[new]
    fn new(values: Vec<f64>) -> Self {
        Self {
            inner: Series::new(values),
        }
    }

    fn __len__(&self) -> usize {
        self.inner.size()
    }

    fn __repr__(&self) -> String {
        format!("{}", self.inner)
    }

    fn iloc(&self, idx: usize) -> Option<f64> {
        self.inner.iloc(idx)
    }

    fn to_list(&self) -> Vec<f64> {
        self.inner.to_vec()
    }

    fn to_vec(&self) -> Vec<f64> {
        self.inner.to_vec()
    }

    fn isna(&self) -> PySeries {
        self.inner.isna().into()
    }

    fn notna(&self) -> PySeries {
        self.inner.notna().into()
    }

    /// Calls `pred` on each value in order, stopping at the first truthy result.
    fn any(&self, pred: &Bound<'_, PyAny>) -> PyResult<bool> {
        for &x in self.inner.values() {
            if pred.call1((x,))?.is_truthy()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn sort(&self) -> PySeries {
        self.inner.sort().into()
    }

    fn slice(&self, start: usize, end: usize) -> PySeries {
        self.inner.slice(start, end).into()
    }

    #[pyo3(signature = (token=", "))]
    fn join(&self, token: &str) -> String {
        self.inner.join(token)
    }

    fn vadd(&self, other: &PySeries) -> PyResult<PySeries> {
        Ok(self.inner.vadd(&other.inner).map_err(to_py_err)?.into())
    }

    fn vsub(&self, other: &PySeries) -> PyResult<PySeries> {
        Ok(self.inner.vsub(&other.inner).map_err(to_py_err)?.into())
    }

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn sum(&self) -> f64 {
        self.inner.sum()
    }

    fn prod(&self) -> f64 {
        self.inner.prod()
    }

    fn mean(&self) -> f64 {
        self.inner.mean()
    }

    fn median(&self) -> f64 {
        self.inner.median()
    }

    fn mode(&self) -> f64 {
        self.inner.mode()
    }

    fn var(&self) -> f64 {
        self.inner.var()
    }

    fn std(&self) -> f64 {
        self.inner.std()
    }

    fn min(&self) -> f64 {
        self.inner.min()
    }

    fn max(&self) -> f64 {
        self.inner.max()
    }

    fn norm(&self) -> f64 {
        self.inner.norm()
    }

    fn dot(&self, other: &PySeries) -> PyResult<f64> {
        self.inner.dot(&other.inner).map_err(to_py_err)
    }

    fn cumsum(&self) -> PySeries {
        self.inner.cumsum().into()
    }

    fn dropna(&self) -> PySeries {
        self.inner.dropna().into()
    }

    fn plus(&self, n: f64) -> PySeries {
        self.inner.plus(n).into()
    }

    fn sub(&self, n: f64) -> PySeries {
        self.inner.sub(n).into()
    }

    fn mult(&self, n: f64) -> PySeries {
        self.inner.mult(n).into()
    }

    fn div(&self, n: f64) -> PySeries {
        self.inner.div(n).into()
    }
}

impl From<Series> for PySeries {
    fn from(inner: Series) -> Self {
        Self { inner }
    }
}

/// Wrapper for DataFrame that exposes it to Python
#[pyclass(name = "DataFrame")]
#[derive(Clone)]
pub struct PyFrame {
    inner: DataFrame,
}

impl PyFrame {
    fn reduce(&self, op: Reduction, axis: usize) -> PyResult<PyFrame> {
        Ok(op.apply(&self.inner, to_axis(axis)?).into())
    }
}

#[pymethods]
impl PyFrame {
    /// Convert to a Polars DataFrame (Python)
    fn to_polars(&self, py: Python<'_>) -> PyResult<PyObject> {
        let df = io::to_polars(&self.inner).map_err(to_py_err)?;
        Ok(PyDataFrame(df).into_pyobject(py)?.into_any().unbind())
    }

    fn __len__(&self) -> usize {
        self.inner.height()
    }

    fn __repr__(&self) -> String {
        format!("{}", self.inner)
    }

    fn __str__(&self) -> String {
        format!("{}", self.inner)
    }

    #[getter]
    fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    #[getter]
    fn columns(&self) -> Vec<String> {
        self.inner.header().to_vec()
    }

    fn irow(&self, row: usize) -> PyResult<PySeries> {
        Ok(self.inner.irow(row).map_err(to_py_err)?.clone().into())
    }

    fn icol(&self, col: usize) -> PyResult<PySeries> {
        Ok(self.inner.icol(col).map_err(to_py_err)?.clone().into())
    }

    fn loc_col(&self, name: &str) -> PyResult<PySeries> {
        Ok(self.inner.loc_col(name).map_err(to_py_err)?.clone().into())
    }

    #[pyo3(signature = (axis=0))]
    fn sum(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Sum, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn prod(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Prod, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn mean(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Mean, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn median(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Median, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn mode(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Mode, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn var(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Var, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn std(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Std, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn min(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Min, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn max(&self, axis: usize) -> PyResult<PyFrame> {
        self.reduce(Reduction::Max, axis)
    }

    #[pyo3(signature = (axis=0))]
    fn cumsum(&self, axis: usize) -> PyResult<PyFrame> {
        Ok(self.inner.cumsum(to_axis(axis)?).into())
    }

    #[pyo3(signature = (axis=0))]
    fn dropna(&self, axis: usize) -> PyResult<PyFrame> {
        Ok(self.inner.dropna(to_axis(axis)?).into())
    }

    #[pyo3(signature = (axis=0))]
    fn dropnull(&self, axis: usize) -> PyResult<PyFrame> {
        self.dropna(axis)
    }

    fn plus(&self, n: f64) -> PyFrame {
        self.inner.plus(n).into()
    }

    fn sub(&self, n: f64) -> PyFrame {
        self.inner.sub(n).into()
    }

    fn mult(&self, n: f64) -> PyFrame {
        self.inner.mult(n).into()
    }

    fn div(&self, n: f64) -> PyFrame {
        self.inner.div(n).into()
    }

    fn copy(&self) -> PyFrame {
        self.inner.copy().into()
    }

    #[pyo3(signature = (n=5))]
    fn head(&self, n: usize) -> PyFrame {
        self.inner.head(n).into()
    }

    #[pyo3(signature = (n=5))]
    fn tail(&self, n: usize) -> PyFrame {
        self.inner.tail(n).into()
    }

    fn insert_col(&self, pos: usize, name: &str, values: Vec<f64>) -> PyResult<PyFrame> {
        let df = self
            .inner
            .insert_col(pos, name, Series::new(values))
            .map_err(to_py_err)?;
        Ok(df.into())
    }

    fn to_dict(&self) -> HashMap<String, Vec<f64>> {
        self.inner.to_hashmap()
    }

    fn to_csv(&self, path: &str) -> PyResult<()> {
        self.inner.to_csv(path).map_err(to_py_err)
    }
}

impl From<DataFrame> for PyFrame {
    fn from(inner: DataFrame) -> Self {
        Self { inner }
    }
}

/// Read a CSV file and return a DataFrame
#[pyfunction]
fn read_csv(path: &str) -> PyResult<PyFrame> {
    Ok(io::read_csv(path).map_err(to_py_err)?.into())
}

/// Read every CSV file in a folder
#[pyfunction]
fn read_csv_from_folder(folder: &str) -> PyResult<Vec<PyFrame>> {
    let frames = io::read_csv_from_folder(folder).map_err(to_py_err)?;
    Ok(frames.into_iter().map(PyFrame::from).collect())
}

/// Read every CSV file in a folder whose path matches a glob pattern
#[pyfunction]
fn read_csv_by_glob(folder: &str, pattern: &str) -> PyResult<Vec<PyFrame>> {
    let frames = io::read_csv_by_glob(folder, pattern).map_err(to_py_err)?;
    Ok(frames.into_iter().map(PyFrame::from).collect())
}

/// Build a DataFrame from a dict of column name to values
#[pyfunction]
fn from_hashmap(data: HashMap<String, Vec<f64>>) -> PyResult<PyFrame> {
    Ok(DataFrame::from_hashmap(data).map_err(to_py_err)?.into())
}

/// A Python module implemented in Rust.
#[pymodule]
fn rusty_pandas(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_class::<PySeries>()?;
    m.add_class::<PyFrame>()?;
    m.add_function(wrap_pyfunction!(read_csv, m)?)?;
    m.add_function(wrap_pyfunction!(read_csv_from_folder, m)?)?;
    m.add_function(wrap_pyfunction!(read_csv_by_glob, m)?)?;
    m.add_function(wrap_pyfunction!(from_hashmap, m)?)?;
    Ok(())
}

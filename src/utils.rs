//! Conversion helpers for the Python bindings.
//!
//! Python callers pass configuration overrides as keyword arguments. They
//! are converted to a `serde_json` object and fed through
//! [`Par::from_overrides`], so the bindings accept exactly the field names
//! and validation rules of the JSON configuration.
#[cfg(feature = "python-bindings")]
use ndarray::Array3;

#[cfg(feature = "python-bindings")]
use numpy::{PyArray3, ToPyArray};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::{PyAny, PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple},
};

#[cfg(feature = "python-bindings")]
use serde_json::{Map, Number, Value};

#[cfg(feature = "python-bindings")]
use crate::model::{params::Par, steady_state::SteadyState};

/// Convert a Python object into a JSON value.
///
/// Supports `None`, `bool`, `int`, `float`, `str`, lists/tuples, and dicts
/// with string keys, recursively.
///
/// Errors
/// ------
/// - `TypeError` for any other object or a non-string dict key.
/// - `ValueError` for a non-finite float.
#[cfg(feature = "python-bindings")]
pub fn py_to_json(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Null);
    }
    if obj.is_instance_of::<PyBool>() {
        return Ok(Value::Bool(obj.extract()?));
    }
    if obj.is_instance_of::<PyInt>() {
        if let Ok(v) = obj.extract::<u64>() {
            return Ok(Value::Number(v.into()));
        }
        return Ok(Value::Number(obj.extract::<i64>()?.into()));
    }
    if obj.is_instance_of::<PyFloat>() {
        let v: f64 = obj.extract()?;
        return Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| PyValueError::new_err(format!("non-finite float {v} in overrides")));
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Value::String(obj.extract()?));
    }
    if let Ok(list) = obj.downcast::<PyList>() {
        return list.iter().map(|item| py_to_json(&item)).collect::<PyResult<Vec<_>>>().map(Value::Array);
    }
    if let Ok(tuple) = obj.downcast::<PyTuple>() {
        return tuple.iter().map(|item| py_to_json(&item)).collect::<PyResult<Vec<_>>>().map(Value::Array);
    }
    if let Ok(dict) = obj.downcast::<PyDict>() {
        return dict_to_json(dict).map(Value::Object);
    }
    Err(PyTypeError::new_err(format!(
        "unsupported value of type {} in overrides",
        obj.get_type().name()?
    )))
}

/// Convert a Python dict with string keys into a JSON object.
///
/// Errors
/// ------
/// - `TypeError` for a non-string key or an unsupported value.
#[cfg(feature = "python-bindings")]
pub fn dict_to_json(dict: &Bound<'_, PyDict>) -> PyResult<Map<String, Value>> {
    let mut map = Map::new();
    for (key, value) in dict.iter() {
        let key: String = key
            .extract()
            .map_err(|_| PyTypeError::new_err("configuration keys must be strings"))?;
        map.insert(key, py_to_json(&value)?);
    }
    Ok(map)
}

/// Build a validated [`Par`] from optional keyword overrides.
///
/// Errors
/// ------
/// - `TypeError` for unsupported override values.
/// - `ValueError` for unknown field names or invalid values.
#[cfg(feature = "python-bindings")]
pub fn extract_par(overrides: Option<&Bound<'_, PyDict>>) -> PyResult<Par> {
    let map = match overrides {
        Some(dict) => dict_to_json(dict)?,
        None => Map::new(),
    };
    Ok(Par::from_overrides(&map)?)
}

/// Steady-state record as a Python dict keyed by variable name.
///
/// Errors
/// ------
/// - Propagates failures from creating or filling the dict.
#[cfg(feature = "python-bindings")]
pub fn steady_state_to_dict<'py>(py: Python<'py>, ss: &SteadyState) -> PyResult<Bound<'py, PyDict>> {
    use crate::model::steady_state::Var;

    let dict = PyDict::new(py);
    for &var in Var::ALL {
        dict.set_item(var.name(), ss.get(var))?;
    }
    Ok(dict)
}

/// Copy a `(fix, z, a)` array into a new numpy array.
#[cfg(feature = "python-bindings")]
pub fn array3_to_py<'py>(py: Python<'py>, arr: &Array3<f64>) -> Bound<'py, PyArray3<f64>> {
    arr.to_pyarray(py)
}

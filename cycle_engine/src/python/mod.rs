//! Python bindings for the cycle engine.
//!
//! Built only with the `python` feature. Every function takes and returns
//! JSON strings so the Python side needs no wrapper classes.
//!
//! # Python API
//!
//! ```text
//! >>> import cycle_engine
//! >>> cycle_engine.predict_phase_json(history, "2024-03-15", lh_test_positive=True)
//! '[{"phase":"menstrual","probability":0.0,...}, ...]'
//! ```

pub mod forecast;

use pyo3::prelude::*;

pub use forecast::*;

/// Register all Python-facing functions on the module.
pub fn register_functions(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(forecast::predict_phase_json, m)?)?;
    m.add_function(wrap_pyfunction!(forecast::forecast_json, m)?)?;
    m.add_function(wrap_pyfunction!(forecast::regularity_score_json, m)?)?;
    Ok(())
}

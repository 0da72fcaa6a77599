pub mod api;
pub mod runtime;
#[cfg(feature = "python")]
pub mod python;

pub use api::{
    ClosureCleanerLevel, ConfigError, ExecutionConfig, GlobalJobParameters, SerializerConfig,
    PARALLELISM_DEFAULT, PARALLELISM_UNKNOWN, UPPER_BOUND_MAX_PARALLELISM,
};
pub use runtime::{
    decode_submission, encode_submission, InMemorySettingsAdapter, MirroredExecutionConfig,
    SettingsAdapter, SubmissionPayload,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn volga_execution_config(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<python::PyExecutionConfig>()?;
    Ok(())
}

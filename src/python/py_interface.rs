use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::pyclass::CompareOp;
use pyo3::types::{PyBytes, PyDict, PyString};

use crate::api::execution_config::{ExecutionConfig, PARALLELISM_DEFAULT, PARALLELISM_UNKNOWN};
use crate::runtime::submission::encode_submission;

#[derive(Clone)]
#[pyclass(name = "ExecutionConfig")]
pub struct PyExecutionConfig {
    inner: ExecutionConfig,
}

impl PyExecutionConfig {
    pub fn to_rust_config(&self) -> ExecutionConfig {
        self.inner.clone()
    }
}

impl From<ExecutionConfig> for PyExecutionConfig {
    fn from(inner: ExecutionConfig) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyExecutionConfig {
    #[classattr]
    const PARALLELISM_DEFAULT: i32 = PARALLELISM_DEFAULT;

    #[classattr]
    const PARALLELISM_UNKNOWN: i32 = PARALLELISM_UNKNOWN;

    #[new]
    pub fn new() -> Self {
        Self { inner: ExecutionConfig::default() }
    }

    #[staticmethod]
    pub fn from_yaml_file(path: &str) -> PyResult<Self> {
        ExecutionConfig::from_yaml_file(path)
            .map(Self::from)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    pub fn enable_closure_cleaner(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.enable_closure_cleaner();
        slf
    }

    pub fn disable_closure_cleaner(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.disable_closure_cleaner();
        slf
    }

    pub fn is_closure_cleaner_enabled(&self) -> bool {
        self.inner.is_closure_cleaner_enabled()
    }

    pub fn set_auto_watermark_interval(mut slf: PyRefMut<'_, Self>, interval: i64) -> PyRefMut<'_, Self> {
        slf.inner.set_auto_watermark_interval(interval);
        slf
    }

    pub fn get_auto_watermark_interval(&self) -> i64 {
        self.inner.get_auto_watermark_interval()
    }

    pub fn set_latency_tracking_interval(mut slf: PyRefMut<'_, Self>, interval: i64) -> PyRefMut<'_, Self> {
        slf.inner.set_latency_tracking_interval(interval);
        slf
    }

    pub fn get_latency_tracking_interval(&self) -> i64 {
        self.inner.get_latency_tracking_interval()
    }

    pub fn set_parallelism(mut slf: PyRefMut<'_, Self>, parallelism: i32) -> PyRefMut<'_, Self> {
        slf.inner.set_parallelism(parallelism);
        slf
    }

    pub fn get_parallelism(&self) -> i32 {
        self.inner.get_parallelism()
    }

    pub fn set_max_parallelism(mut slf: PyRefMut<'_, Self>, max_parallelism: i32) -> PyRefMut<'_, Self> {
        slf.inner.set_max_parallelism(max_parallelism);
        slf
    }

    pub fn get_max_parallelism(&self) -> i32 {
        self.inner.get_max_parallelism()
    }

    pub fn set_task_cancellation_interval(mut slf: PyRefMut<'_, Self>, interval: i64) -> PyRefMut<'_, Self> {
        slf.inner.set_task_cancellation_interval(interval);
        slf
    }

    pub fn get_task_cancellation_interval(&self) -> i64 {
        self.inner.get_task_cancellation_interval()
    }

    pub fn set_task_cancellation_timeout(mut slf: PyRefMut<'_, Self>, timeout: i64) -> PyRefMut<'_, Self> {
        slf.inner.set_task_cancellation_timeout(timeout);
        slf
    }

    pub fn get_task_cancellation_timeout(&self) -> i64 {
        self.inner.get_task_cancellation_timeout()
    }

    pub fn enable_force_kryo(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.enable_force_kryo();
        slf
    }

    pub fn disable_force_kryo(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.disable_force_kryo();
        slf
    }

    pub fn is_force_kryo_enabled(&self) -> bool {
        self.inner.is_force_kryo_enabled()
    }

    pub fn enable_generic_types(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.enable_generic_types();
        slf
    }

    pub fn disable_generic_types(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.disable_generic_types();
        slf
    }

    pub fn has_generic_types_disabled(&self) -> bool {
        self.inner.has_generic_types_disabled()
    }

    pub fn enable_auto_generated_uids(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.enable_auto_generated_uids();
        slf
    }

    pub fn disable_auto_generated_uids(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.disable_auto_generated_uids();
        slf
    }

    pub fn has_auto_generated_uids_enabled(&self) -> bool {
        self.inner.has_auto_generated_uids_enabled()
    }

    pub fn enable_force_avro(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.enable_force_avro();
        slf
    }

    pub fn disable_force_avro(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.disable_force_avro();
        slf
    }

    pub fn is_force_avro_enabled(&self) -> bool {
        self.inner.is_force_avro_enabled()
    }

    pub fn enable_object_reuse(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.enable_object_reuse();
        slf
    }

    pub fn disable_object_reuse(mut slf: PyRefMut<'_, Self>) -> PyRefMut<'_, Self> {
        slf.inner.disable_object_reuse();
        slf
    }

    pub fn is_object_reuse_enabled(&self) -> bool {
        self.inner.is_object_reuse_enabled()
    }

    pub fn get_global_job_parameters(&self) -> BTreeMap<String, String> {
        self.inner.get_global_job_parameters()
    }

    /// Values go through Python's `str()`, strings are kept as they are.
    pub fn set_global_job_parameters<'py>(
        mut slf: PyRefMut<'py, Self>,
        global_job_parameters: &PyDict,
    ) -> PyResult<PyRefMut<'py, Self>> {
        let mut params = Vec::with_capacity(global_job_parameters.len());
        for (key, value) in global_job_parameters.iter() {
            let key = key.str()?.to_str()?.to_string();
            let value = match value.downcast::<PyString>() {
                Ok(s) => s.to_str()?.to_string(),
                Err(_) => value.str()?.to_str()?.to_string(),
            };
            params.push((key, value));
        }
        slf.inner.set_global_job_parameters(params);
        Ok(slf)
    }

    pub fn register_kryo_type(mut slf: PyRefMut<'_, Self>, type_name: String) -> PyRefMut<'_, Self> {
        slf.inner.register_kryo_type(type_name);
        slf
    }

    pub fn register_pojo_type(mut slf: PyRefMut<'_, Self>, type_name: String) -> PyRefMut<'_, Self> {
        slf.inner.register_pojo_type(type_name);
        slf
    }

    pub fn add_default_kryo_serializer(
        mut slf: PyRefMut<'_, Self>,
        type_name: String,
        serializer_name: String,
    ) -> PyRefMut<'_, Self> {
        slf.inner.add_default_kryo_serializer(type_name, serializer_name);
        slf
    }

    pub fn get_default_kryo_serializer_classes(&self) -> BTreeMap<String, String> {
        self.inner.get_default_kryo_serializer_classes()
    }

    pub fn get_registered_kryo_types(&self) -> Vec<String> {
        self.inner.get_registered_kryo_types()
    }

    pub fn get_registered_pojo_types(&self) -> Vec<String> {
        self.inner.get_registered_pojo_types()
    }

    pub fn is_use_snapshot_compression(&self) -> bool {
        self.inner.is_use_snapshot_compression()
    }

    pub fn set_use_snapshot_compression(
        mut slf: PyRefMut<'_, Self>,
        use_snapshot_compression: bool,
    ) -> PyRefMut<'_, Self> {
        slf.inner.set_use_snapshot_compression(use_snapshot_compression);
        slf
    }

    pub fn to_settings(&self) -> BTreeMap<String, String> {
        self.inner.to_settings()
    }

    pub fn validate(&self) -> PyResult<()> {
        self.inner
            .validate()
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    pub fn to_submission_bytes(&self, py: Python<'_>, job_name: &str) -> PyResult<PyObject> {
        let bytes = encode_submission(job_name, &self.inner)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyBytes::new(py, &bytes).into_py(py))
    }

    fn __richcmp__(&self, other: PyRef<'_, Self>, op: CompareOp, py: Python<'_>) -> PyObject {
        match op {
            CompareOp::Eq => (self.inner == other.inner).into_py(py),
            CompareOp::Ne => (self.inner != other.inner).into_py(py),
            _ => py.NotImplemented(),
        }
    }

    fn __hash__(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.inner.hash(&mut hasher);
        hasher.finish()
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::closure_cleaner::ClosureCleanerLevel;
use crate::api::job_parameters::GlobalJobParameters;
use crate::api::serializer_config::SerializerConfig;

/// Flag value asking for the environment's default parallelism.
pub const PARALLELISM_DEFAULT: i32 = -1;

/// Flag value for an unknown or unset parallelism. Not a valid parallelism; it means the
/// parallelism should remain unchanged.
pub const PARALLELISM_UNKNOWN: i32 = -2;

/// Largest max parallelism (and therefore key-group count) a job may request.
pub const UPPER_BOUND_MAX_PARALLELISM: i32 = 1 << 15;

/// Execution tunables of a single job definition.
///
/// The holder is plain data: setters store what they are given and return `&mut Self` so calls
/// can be chained, getters return the stored value. No range or consistency checks happen here;
/// they are deferred to [`ExecutionConfig::validate`], which runs when the job is submitted.
///
/// Equality and hashing are value based over every stored field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    closure_cleaner_level: ClosureCleanerLevel,
    auto_watermark_interval_ms: i64,
    latency_tracking_interval_ms: i64,
    parallelism: i32,
    max_parallelism: i32,
    task_cancellation_interval_ms: i64,
    task_cancellation_timeout_ms: i64,
    serializer_config: SerializerConfig,
    auto_generated_uids: bool,
    object_reuse: bool,
    global_job_parameters: GlobalJobParameters,
    use_snapshot_compression: bool,
}

impl ExecutionConfig {
    pub const PARALLELISM_DEFAULT: i32 = PARALLELISM_DEFAULT;
    pub const PARALLELISM_UNKNOWN: i32 = PARALLELISM_UNKNOWN;

    pub const DEFAULT_AUTO_WATERMARK_INTERVAL_MS: i64 = 200;
    pub const DEFAULT_LATENCY_TRACKING_INTERVAL_MS: i64 = 0;
    pub const DEFAULT_MAX_PARALLELISM: i32 = -1;
    pub const DEFAULT_TASK_CANCELLATION_INTERVAL_MS: i64 = 30_000;
    pub const DEFAULT_TASK_CANCELLATION_TIMEOUT_MS: i64 = 180_000;

    pub fn new() -> Self {
        Self::default()
    }

    // Closure cleaner

    pub fn enable_closure_cleaner(&mut self) -> &mut Self {
        self.closure_cleaner_level = ClosureCleanerLevel::Recursive;
        self
    }

    pub fn disable_closure_cleaner(&mut self) -> &mut Self {
        self.closure_cleaner_level = ClosureCleanerLevel::None;
        self
    }

    pub fn is_closure_cleaner_enabled(&self) -> bool {
        self.closure_cleaner_level != ClosureCleanerLevel::None
    }

    pub fn set_closure_cleaner_level(&mut self, level: ClosureCleanerLevel) -> &mut Self {
        self.closure_cleaner_level = level;
        self
    }

    pub fn get_closure_cleaner_level(&self) -> ClosureCleanerLevel {
        self.closure_cleaner_level
    }

    // Watermarks and latency tracking

    /// Interval between automatically emitted watermarks, in milliseconds.
    pub fn set_auto_watermark_interval(&mut self, interval_ms: i64) -> &mut Self {
        self.auto_watermark_interval_ms = interval_ms;
        self
    }

    pub fn get_auto_watermark_interval(&self) -> i64 {
        self.auto_watermark_interval_ms
    }

    /// Interval at which sources emit latency markers. A value `<= 0` disables tracking.
    pub fn set_latency_tracking_interval(&mut self, interval_ms: i64) -> &mut Self {
        self.latency_tracking_interval_ms = interval_ms;
        self
    }

    pub fn get_latency_tracking_interval(&self) -> i64 {
        self.latency_tracking_interval_ms
    }

    pub fn is_latency_tracking_enabled(&self) -> bool {
        self.latency_tracking_interval_ms > 0
    }

    // Parallelism

    /// Default parallelism for operators that do not set their own.
    /// Accepts [`PARALLELISM_DEFAULT`] and [`PARALLELISM_UNKNOWN`] as-is.
    pub fn set_parallelism(&mut self, parallelism: i32) -> &mut Self {
        self.parallelism = parallelism;
        self
    }

    pub fn get_parallelism(&self) -> i32 {
        self.parallelism
    }

    /// Upper limit for dynamic scaling; also the number of key groups of partitioned state.
    pub fn set_max_parallelism(&mut self, max_parallelism: i32) -> &mut Self {
        self.max_parallelism = max_parallelism;
        self
    }

    pub fn get_max_parallelism(&self) -> i32 {
        self.max_parallelism
    }

    // Task cancellation

    pub fn set_task_cancellation_interval(&mut self, interval_ms: i64) -> &mut Self {
        self.task_cancellation_interval_ms = interval_ms;
        self
    }

    pub fn get_task_cancellation_interval(&self) -> i64 {
        self.task_cancellation_interval_ms
    }

    /// Time after which a stuck cancellation becomes a fatal worker error. `0` disables it.
    pub fn set_task_cancellation_timeout(&mut self, timeout_ms: i64) -> &mut Self {
        self.task_cancellation_timeout_ms = timeout_ms;
        self
    }

    pub fn get_task_cancellation_timeout(&self) -> i64 {
        self.task_cancellation_timeout_ms
    }

    // Serialization

    /// Forces the generic serializer for structured types even when they could be analyzed.
    pub fn enable_force_kryo(&mut self) -> &mut Self {
        self.serializer_config.force_kryo = true;
        self
    }

    pub fn disable_force_kryo(&mut self) -> &mut Self {
        self.serializer_config.force_kryo = false;
        self
    }

    pub fn is_force_kryo_enabled(&self) -> bool {
        self.serializer_config.force_kryo
    }

    pub fn enable_generic_types(&mut self) -> &mut Self {
        self.serializer_config.generic_types_disabled = false;
        self
    }

    /// Makes any type that would need the generic serializer an error at runtime.
    pub fn disable_generic_types(&mut self) -> &mut Self {
        self.serializer_config.generic_types_disabled = true;
        self
    }

    pub fn has_generic_types_disabled(&self) -> bool {
        self.serializer_config.generic_types_disabled
    }

    pub fn enable_force_avro(&mut self) -> &mut Self {
        self.serializer_config.force_avro = true;
        self
    }

    pub fn disable_force_avro(&mut self) -> &mut Self {
        self.serializer_config.force_avro = false;
        self
    }

    pub fn is_force_avro_enabled(&self) -> bool {
        self.serializer_config.force_avro
    }

    pub fn add_default_kryo_serializer(
        &mut self,
        type_name: impl Into<String>,
        serializer_name: impl Into<String>,
    ) -> &mut Self {
        self.serializer_config
            .add_default_kryo_serializer(type_name, serializer_name);
        self
    }

    pub fn register_kryo_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.serializer_config.register_kryo_type(type_name);
        self
    }

    pub fn register_pojo_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.serializer_config.register_pojo_type(type_name);
        self
    }

    pub fn get_default_kryo_serializer_classes(&self) -> BTreeMap<String, String> {
        self.serializer_config.default_kryo_serializer_classes.clone()
    }

    pub fn get_registered_kryo_types(&self) -> Vec<String> {
        self.serializer_config.registered_kryo_types.iter().cloned().collect()
    }

    pub fn get_registered_pojo_types(&self) -> Vec<String> {
        self.serializer_config.registered_pojo_types.iter().cloned().collect()
    }

    pub fn serializer_config(&self) -> &SerializerConfig {
        &self.serializer_config
    }

    pub(crate) fn serializer_config_mut(&mut self) -> &mut SerializerConfig {
        &mut self.serializer_config
    }

    // Operator uids

    pub fn enable_auto_generated_uids(&mut self) -> &mut Self {
        self.auto_generated_uids = true;
        self
    }

    /// Requires every operator to carry a user-specified uid.
    pub fn disable_auto_generated_uids(&mut self) -> &mut Self {
        self.auto_generated_uids = false;
        self
    }

    pub fn has_auto_generated_uids_enabled(&self) -> bool {
        self.auto_generated_uids
    }

    // Object reuse

    pub fn enable_object_reuse(&mut self) -> &mut Self {
        self.object_reuse = true;
        self
    }

    pub fn disable_object_reuse(&mut self) -> &mut Self {
        self.object_reuse = false;
        self
    }

    pub fn is_object_reuse_enabled(&self) -> bool {
        self.object_reuse
    }

    // Global job parameters

    /// Replaces the job parameters. Non-string values are stored in their string form.
    pub fn set_global_job_parameters<I, K, V>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.global_job_parameters = GlobalJobParameters::from_values(parameters);
        self
    }

    pub fn get_global_job_parameters(&self) -> BTreeMap<String, String> {
        self.global_job_parameters.to_map()
    }

    pub(crate) fn replace_global_job_parameters(&mut self, parameters: GlobalJobParameters) {
        self.global_job_parameters = parameters;
    }

    // Snapshots

    pub fn set_use_snapshot_compression(&mut self, use_snapshot_compression: bool) -> &mut Self {
        self.use_snapshot_compression = use_snapshot_compression;
        self
    }

    pub fn is_use_snapshot_compression(&self) -> bool {
        self.use_snapshot_compression
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            closure_cleaner_level: ClosureCleanerLevel::default(),
            auto_watermark_interval_ms: Self::DEFAULT_AUTO_WATERMARK_INTERVAL_MS,
            latency_tracking_interval_ms: Self::DEFAULT_LATENCY_TRACKING_INTERVAL_MS,
            parallelism: PARALLELISM_DEFAULT,
            max_parallelism: Self::DEFAULT_MAX_PARALLELISM,
            task_cancellation_interval_ms: Self::DEFAULT_TASK_CANCELLATION_INTERVAL_MS,
            task_cancellation_timeout_ms: Self::DEFAULT_TASK_CANCELLATION_TIMEOUT_MS,
            serializer_config: SerializerConfig::default(),
            auto_generated_uids: true,
            object_reuse: false,
            global_job_parameters: GlobalJobParameters::default(),
            use_snapshot_compression: false,
        }
    }
}

impl fmt::Display for ExecutionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self
            .to_settings()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .join(", ");
        write!(f, "ExecutionConfig({settings})")
    }
}

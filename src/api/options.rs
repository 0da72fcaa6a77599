use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::closure_cleaner::ClosureCleanerLevel;
use crate::api::error::{ConfigError, ConfigResult};
use crate::api::execution_config::ExecutionConfig;
use crate::api::job_parameters::{stringify_parameter, GlobalJobParameters};

pub const CLOSURE_CLEANER_LEVEL: &str = "pipeline.closure-cleaner-level";
pub const AUTO_WATERMARK_INTERVAL: &str = "pipeline.auto-watermark-interval";
pub const LATENCY_TRACKING_INTERVAL: &str = "metrics.latency.interval";
pub const PARALLELISM: &str = "parallelism.default";
pub const MAX_PARALLELISM: &str = "pipeline.max-parallelism";
pub const TASK_CANCELLATION_INTERVAL: &str = "task.cancellation.interval";
pub const TASK_CANCELLATION_TIMEOUT: &str = "task.cancellation.timeout";
pub const FORCE_KRYO: &str = "pipeline.force-kryo";
/// Stores whether generic types are *enabled*.
pub const GENERIC_TYPES: &str = "pipeline.generic-types";
pub const AUTO_GENERATE_UIDS: &str = "pipeline.auto-generate-uids";
pub const FORCE_AVRO: &str = "pipeline.force-avro";
pub const OBJECT_REUSE: &str = "pipeline.object-reuse";
pub const GLOBAL_JOB_PARAMETERS: &str = "pipeline.global-job-parameters";
pub const DEFAULT_KRYO_SERIALIZERS: &str = "pipeline.default-kryo-serializers";
pub const REGISTERED_KRYO_TYPES: &str = "pipeline.registered-kryo-types";
pub const REGISTERED_POJO_TYPES: &str = "pipeline.registered-pojo-types";
pub const SNAPSHOT_COMPRESSION: &str = "execution.checkpointing.snapshot-compression";

pub const ALL_KEYS: [&str; 17] = [
    CLOSURE_CLEANER_LEVEL,
    AUTO_WATERMARK_INTERVAL,
    LATENCY_TRACKING_INTERVAL,
    PARALLELISM,
    MAX_PARALLELISM,
    TASK_CANCELLATION_INTERVAL,
    TASK_CANCELLATION_TIMEOUT,
    FORCE_KRYO,
    GENERIC_TYPES,
    AUTO_GENERATE_UIDS,
    FORCE_AVRO,
    OBJECT_REUSE,
    GLOBAL_JOB_PARAMETERS,
    DEFAULT_KRYO_SERIALIZERS,
    REGISTERED_KRYO_TYPES,
    REGISTERED_POJO_TYPES,
    SNAPSHOT_COMPRESSION,
];

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::invalid(key, format!("expected true or false, got '{other}'"))),
    }
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid(key, format!("expected an integer, got '{value}': {e}")))
}

fn parse_string_map(key: &str, value: &str) -> ConfigResult<BTreeMap<String, String>> {
    let raw: BTreeMap<String, Value> = serde_json::from_str(value)
        .map_err(|e| ConfigError::invalid(key, format!("expected a JSON object: {e}")))?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, stringify_parameter(&v)))
        .collect())
}

fn parse_string_set(key: &str, value: &str) -> ConfigResult<BTreeSet<String>> {
    let raw: Vec<Value> = serde_json::from_str(value)
        .map_err(|e| ConfigError::invalid(key, format!("expected a JSON array: {e}")))?;
    Ok(raw.iter().map(stringify_parameter).collect())
}

fn json_object_text(map: &BTreeMap<String, String>) -> String {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
    .to_string()
}

fn json_array_text(set: &BTreeSet<String>) -> String {
    Value::Array(set.iter().cloned().map(Value::String).collect()).to_string()
}

impl ExecutionConfig {
    /// Canonical string form of every setting, keyed by the option names in this module.
    pub fn to_settings(&self) -> BTreeMap<String, String> {
        let serializers = self.serializer_config();
        let entries = [
            (CLOSURE_CLEANER_LEVEL, self.get_closure_cleaner_level().to_string()),
            (AUTO_WATERMARK_INTERVAL, self.get_auto_watermark_interval().to_string()),
            (LATENCY_TRACKING_INTERVAL, self.get_latency_tracking_interval().to_string()),
            (PARALLELISM, self.get_parallelism().to_string()),
            (MAX_PARALLELISM, self.get_max_parallelism().to_string()),
            (TASK_CANCELLATION_INTERVAL, self.get_task_cancellation_interval().to_string()),
            (TASK_CANCELLATION_TIMEOUT, self.get_task_cancellation_timeout().to_string()),
            (FORCE_KRYO, self.is_force_kryo_enabled().to_string()),
            (GENERIC_TYPES, (!self.has_generic_types_disabled()).to_string()),
            (AUTO_GENERATE_UIDS, self.has_auto_generated_uids_enabled().to_string()),
            (FORCE_AVRO, self.is_force_avro_enabled().to_string()),
            (OBJECT_REUSE, self.is_object_reuse_enabled().to_string()),
            (GLOBAL_JOB_PARAMETERS, json_object_text(&self.get_global_job_parameters())),
            (DEFAULT_KRYO_SERIALIZERS, json_object_text(&serializers.default_kryo_serializer_classes)),
            (REGISTERED_KRYO_TYPES, json_array_text(&serializers.registered_kryo_types)),
            (REGISTERED_POJO_TYPES, json_array_text(&serializers.registered_pojo_types)),
            (SNAPSHOT_COMPRESSION, self.is_use_snapshot_compression().to_string()),
        ];
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Overlays the given settings onto this config. Only keys that are present change;
    /// unknown keys are skipped. Values are parsed but not range checked.
    ///
    /// Either every setting is applied or, on the first bad value, none is.
    pub fn configure(&mut self, settings: &BTreeMap<String, String>) -> ConfigResult<&mut Self> {
        let mut next = self.clone();
        for (key, value) in settings {
            next.set_option(key, value)?;
        }
        *self = next;
        Ok(self)
    }

    pub fn from_settings(settings: &BTreeMap<String, String>) -> ConfigResult<Self> {
        let mut config = ExecutionConfig::default();
        config.configure(settings)?;
        Ok(config)
    }

    /// Defaults overlaid with the settings of a YAML file (see [`load_settings_file`]).
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let settings = load_settings_file(path)?;
        Self::from_settings(&settings)
    }

    /// Applies one setting. Returns `false` when the key is not a known option.
    pub(crate) fn set_option(&mut self, key: &str, value: &str) -> ConfigResult<bool> {
        match key {
            CLOSURE_CLEANER_LEVEL => {
                let level = value
                    .parse::<ClosureCleanerLevel>()
                    .map_err(|e| rekey(e, key))?;
                self.set_closure_cleaner_level(level);
            }
            AUTO_WATERMARK_INTERVAL => {
                self.set_auto_watermark_interval(parse_int(key, value)?);
            }
            LATENCY_TRACKING_INTERVAL => {
                self.set_latency_tracking_interval(parse_int(key, value)?);
            }
            PARALLELISM => {
                self.set_parallelism(parse_int(key, value)?);
            }
            MAX_PARALLELISM => {
                self.set_max_parallelism(parse_int(key, value)?);
            }
            TASK_CANCELLATION_INTERVAL => {
                self.set_task_cancellation_interval(parse_int(key, value)?);
            }
            TASK_CANCELLATION_TIMEOUT => {
                self.set_task_cancellation_timeout(parse_int(key, value)?);
            }
            FORCE_KRYO => {
                self.serializer_config_mut().force_kryo = parse_bool(key, value)?;
            }
            GENERIC_TYPES => {
                self.serializer_config_mut().generic_types_disabled = !parse_bool(key, value)?;
            }
            AUTO_GENERATE_UIDS => {
                if parse_bool(key, value)? {
                    self.enable_auto_generated_uids();
                } else {
                    self.disable_auto_generated_uids();
                }
            }
            FORCE_AVRO => {
                self.serializer_config_mut().force_avro = parse_bool(key, value)?;
            }
            OBJECT_REUSE => {
                if parse_bool(key, value)? {
                    self.enable_object_reuse();
                } else {
                    self.disable_object_reuse();
                }
            }
            GLOBAL_JOB_PARAMETERS => {
                let params = parse_string_map(key, value)?;
                self.replace_global_job_parameters(GlobalJobParameters::from(params));
            }
            DEFAULT_KRYO_SERIALIZERS => {
                self.serializer_config_mut().default_kryo_serializer_classes = parse_string_map(key, value)?;
            }
            REGISTERED_KRYO_TYPES => {
                self.serializer_config_mut().registered_kryo_types = parse_string_set(key, value)?;
            }
            REGISTERED_POJO_TYPES => {
                self.serializer_config_mut().registered_pojo_types = parse_string_set(key, value)?;
            }
            SNAPSHOT_COMPRESSION => {
                self.set_use_snapshot_compression(parse_bool(key, value)?);
            }
            _ => {
                warn!("Ignoring unknown execution config key '{}'", key);
                return Ok(false);
            }
        }
        debug!("Applied execution config setting {}={}", key, value);
        Ok(true)
    }
}

fn rekey(err: ConfigError, key: &str) -> ConfigError {
    match err {
        ConfigError::InvalidConfiguration { reason, .. } => ConfigError::invalid(key, reason),
        other => other,
    }
}

/// Reads a flat YAML mapping of option keys to values.
///
/// Scalar values are coerced to strings, nested sequences and mappings are kept as JSON text
/// so they can be fed to [`ExecutionConfig::configure`].
pub fn load_settings_file(path: impl AsRef<Path>) -> ConfigResult<BTreeMap<String, String>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_reader(file)?;

    let mut settings = BTreeMap::new();
    for (key, value) in raw {
        let json = serde_json::to_value(&value)
            .map_err(|e| ConfigError::invalid(key.as_str(), format!("unsupported value: {e}")))?;
        settings.insert(key, stringify_parameter(&json));
    }
    debug!("Loaded {} execution config settings from {}", settings.len(), path.display());
    Ok(settings)
}

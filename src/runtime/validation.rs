use tracing::warn;

use crate::api::error::{ConfigError, ConfigResult};
use crate::api::execution_config::{
    ExecutionConfig, PARALLELISM_DEFAULT, PARALLELISM_UNKNOWN, UPPER_BOUND_MAX_PARALLELISM,
};
use crate::api::options;

fn is_concrete(parallelism: i32) -> bool {
    parallelism >= 1
}

fn check_non_negative(key: &str, value: i64) -> ConfigResult<()> {
    if value < 0 {
        return Err(ConfigError::invalid(key, format!("must be >= 0, got {value}")));
    }
    Ok(())
}

fn check_type_names<'a>(key: &str, names: impl IntoIterator<Item = &'a String>) -> ConfigResult<()> {
    if names.into_iter().any(|n| n.trim().is_empty()) {
        return Err(ConfigError::invalid(key, "type names must not be empty"));
    }
    Ok(())
}

impl ExecutionConfig {
    /// Checks ranges and cross-field consistency. Called when the job is submitted;
    /// setters never call it.
    pub fn validate(&self) -> ConfigResult<()> {
        let result = self.check();
        if let Err(e) = &result {
            warn!("Rejected execution config: {}", e);
        }
        result
    }

    fn check(&self) -> ConfigResult<()> {
        let parallelism = self.get_parallelism();
        if !is_concrete(parallelism) && parallelism != PARALLELISM_DEFAULT && parallelism != PARALLELISM_UNKNOWN {
            return Err(ConfigError::invalid(
                options::PARALLELISM,
                format!("must be at least 1 or one of {PARALLELISM_DEFAULT}/{PARALLELISM_UNKNOWN}, got {parallelism}"),
            ));
        }

        let max_parallelism = self.get_max_parallelism();
        if max_parallelism != ExecutionConfig::DEFAULT_MAX_PARALLELISM {
            if !(1..=UPPER_BOUND_MAX_PARALLELISM).contains(&max_parallelism) {
                return Err(ConfigError::invalid(
                    options::MAX_PARALLELISM,
                    format!("must be in 1..={UPPER_BOUND_MAX_PARALLELISM}, got {max_parallelism}"),
                ));
            }
            if is_concrete(parallelism) && max_parallelism < parallelism {
                return Err(ConfigError::invalid(
                    options::MAX_PARALLELISM,
                    format!("{max_parallelism} is lower than parallelism {parallelism}"),
                ));
            }
        }

        check_non_negative(options::AUTO_WATERMARK_INTERVAL, self.get_auto_watermark_interval())?;
        check_non_negative(options::TASK_CANCELLATION_INTERVAL, self.get_task_cancellation_interval())?;
        check_non_negative(options::TASK_CANCELLATION_TIMEOUT, self.get_task_cancellation_timeout())?;

        let serializers = self.serializer_config();
        check_type_names(options::REGISTERED_KRYO_TYPES, &serializers.registered_kryo_types)?;
        check_type_names(options::REGISTERED_POJO_TYPES, &serializers.registered_pojo_types)?;
        check_type_names(
            options::DEFAULT_KRYO_SERIALIZERS,
            serializers
                .default_kryo_serializer_classes
                .iter()
                .flat_map(|(ty, ser)| [ty, ser]),
        )?;
        Ok(())
    }
}

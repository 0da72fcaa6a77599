use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::error::ConfigResult;
use crate::api::execution_config::ExecutionConfig;

/// What the runtime receives about a job's execution settings at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub job_name: String,
    pub execution_config: ExecutionConfig,
}

/// Validates the config and encodes it for submission. This is the point where invalid
/// settings are reported.
pub fn encode_submission(job_name: &str, config: &ExecutionConfig) -> ConfigResult<Vec<u8>> {
    config.validate()?;
    let payload = SubmissionPayload {
        job_name: job_name.to_string(),
        execution_config: config.clone(),
    };
    let bytes = bincode::serialize(&payload)?;
    debug!("Encoded submission payload for job '{}' ({} bytes)", job_name, bytes.len());
    Ok(bytes)
}

pub fn decode_submission(bytes: &[u8]) -> ConfigResult<SubmissionPayload> {
    Ok(bincode::deserialize(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ConfigError;

    #[test]
    fn test_submission_carries_config() {
        let mut config = ExecutionConfig::new();
        config
            .set_parallelism(2)
            .set_max_parallelism(128)
            .register_kryo_type("org.example.Event")
            .set_global_job_parameters([("env", "staging")]);

        let bytes = encode_submission("word_count", &config).unwrap();
        let payload = decode_submission(&bytes).unwrap();
        assert_eq!(payload.job_name, "word_count");
        assert_eq!(payload.execution_config, config);
    }

    #[test]
    fn test_invalid_config_fails_at_submission() {
        let mut config = ExecutionConfig::new();
        config.set_parallelism(16).set_max_parallelism(8);
        let err = encode_submission("job", &config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_garbage_payload() {
        assert!(decode_submission(&[0xff, 0x01]).is_err());
    }
}

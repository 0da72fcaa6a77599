pub mod closure_cleaner;
pub mod error;
pub mod execution_config;
pub mod job_parameters;
pub mod options;
pub mod serializer_config;

pub use closure_cleaner::ClosureCleanerLevel;
pub use error::{ConfigError, ConfigResult};
pub use execution_config::{
    ExecutionConfig, PARALLELISM_DEFAULT, PARALLELISM_UNKNOWN, UPPER_BOUND_MAX_PARALLELISM,
};
pub use job_parameters::{stringify_parameter, GlobalJobParameters};
pub use options::load_settings_file;
pub use serializer_config::SerializerConfig;

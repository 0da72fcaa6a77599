pub mod settings_adapter;
pub mod submission;
pub mod validation;

pub use settings_adapter::{InMemorySettingsAdapter, MirroredExecutionConfig, SettingsAdapter};
pub use submission::{decode_submission, encode_submission, SubmissionPayload};

pub mod config;
pub mod form;
pub mod telemetry;

pub use config::{ConfigError, ValidationConfig};
pub use form::{
    Feedback, FeedbackStatus, FieldId, FormOptions, RegistrationForm, SubmissionReport,
    ValidationOrchestrator,
};

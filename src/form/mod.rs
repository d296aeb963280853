mod controller;
mod field;
mod model;
mod remote;
mod rules;
mod submission;
mod validator;


pub use controller::{
    EventOutcome, FieldMeta, FormError, FormEvent, FormOptions, FormResult, FormSnapshot,
    StaleResultPolicy, SubmitState, ValidationOrchestrator, ValidationTicket,
};
pub use field::{Feedback, FeedbackStatus, FieldId, FieldKey, PENDING_MESSAGE, Trigger};
pub use model::{FieldLens, FormModel, RegistrationForm, RegistrationFormFields};
pub use regform_derive::FormModel;
pub use remote::{
    BoxedCheckFuture, CheckScope, MembershipRegistry, RemoteCheck, SimulatedRemoteCheck, Verdict,
};
pub use rules::{
    DEFAULT_MIN_USERNAME_LEN, MAX_STRENGTH, PasswordStrength, RuleSet, RuleViolation,
    password_strength,
};
pub use submission::{
    Banner, FAILURE_BANNER, PROCESSING_MESSAGE, ReportEntry, ReportStatus, ResultPanel,
    SUCCESS_BANNER, SubmissionPipeline, SubmissionReport, ValidationReport,
};
pub use validator::{BoxedFeedbackFuture, FieldValidator, Validation};

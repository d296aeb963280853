use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock};

use futures_timer::Delay;

use super::controller::{
    FormError, FormResult, SubmitState, read_lock, transition_submit_state, write_lock,
};
use super::field::FieldId;
use super::model::RegistrationForm;
use super::remote::{CheckScope, Verdict};
use super::rules::RuleViolation;
use super::validator::{FieldValidator, LocalOutcome};

pub const PROCESSING_MESSAGE: &str = "Processing registration...";
pub const SUCCESS_BANNER: &str = "Registration successful! All fields are valid.";
pub const FAILURE_BANNER: &str = "Registration failed! Please fix the errors.";
const WEAK_PASSWORD_MESSAGE: &str = "Password is weak. Consider using a stronger password.";
const STRONG_PASSWORD_MESSAGE: &str = "Password is strong";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportStatus {
    Success,
    Warning,
    Error,
}

impl ReportStatus {
    pub const fn glyph(self) -> char {
        match self {
            ReportStatus::Success => '✓',
            ReportStatus::Warning => '⚠',
            ReportStatus::Error => '✗',
        }
    }

    pub const fn style_class(self) -> &'static str {
        match self {
            ReportStatus::Success => "result-success",
            ReportStatus::Warning => "result-warning",
            ReportStatus::Error => "result-error",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportEntry {
    pub field: FieldId,
    pub status: ReportStatus,
    pub message: String,
}

impl ReportEntry {
    fn new(field: FieldId, status: ReportStatus, message: impl Into<String>) -> Self {
        Self {
            field,
            status,
            message: message.into(),
        }
    }
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.status.glyph(),
            self.field.title(),
            self.message
        )
    }
}

/// One entry per field, in declaration order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationReport {
    entries: Vec<ReportEntry>,
}

impl ValidationReport {
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn entry(&self, field: FieldId) -> Option<&ReportEntry> {
        self.entries.iter().find(|entry| entry.field == field)
    }

    /// The submission outcome: no entry is an error.
    pub fn is_success(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| entry.status != ReportStatus::Error)
    }

    pub fn count(&self, status: ReportStatus) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status == status)
            .count()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Banner {
    Success,
    Failure,
}

impl Banner {
    pub const fn message(self) -> &'static str {
        match self {
            Banner::Success => SUCCESS_BANNER,
            Banner::Failure => FAILURE_BANNER,
        }
    }

    pub const fn style_class(self) -> &'static str {
        match self {
            Banner::Success => "alert-success",
            Banner::Failure => "alert-danger",
        }
    }
}

/// A fully computed submission result, ready to render.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmissionReport {
    pub banner: Banner,
    pub report: ValidationReport,
}

impl SubmissionReport {
    pub fn from_report(report: ValidationReport) -> Self {
        let banner = if report.is_success() {
            Banner::Success
        } else {
            Banner::Failure
        };
        Self { banner, report }
    }

    pub fn outcome(&self) -> bool {
        self.banner == Banner::Success
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for SubmissionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.banner.message())?;
        for entry in &self.report.entries {
            write!(f, "\n{entry}")?;
        }
        Ok(())
    }
}

/// What the result area currently shows.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ResultPanel {
    #[default]
    Hidden,
    Processing,
    Rendered(SubmissionReport),
}

impl Display for ResultPanel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultPanel::Hidden => Ok(()),
            ResultPanel::Processing => f.write_str(PROCESSING_MESSAGE),
            ResultPanel::Rendered(report) => report.fmt(f),
        }
    }
}

struct SubmissionState {
    submit_state: SubmitState,
    submit_count: u32,
    panel: ResultPanel,
}

/// Rolls a submission that never settled back to `Idle` when its future is dropped.
struct InFlight<'a> {
    state: &'a RwLock<SubmissionState>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Ok(mut state) = self.state.write() else {
            return;
        };
        if state.submit_state == SubmitState::Processing
            && transition_submit_state(&mut state.submit_state, SubmitState::Idle).is_ok()
        {
            state.panel = ResultPanel::Hidden;
            tracing::debug!("submission abandoned before settling");
        }
    }
}

/// Whole-form validation triggered by a submit event.
///
/// Works from the raw snapshot it is given and never reads live feedback;
/// at most one submission is in flight at a time. Dropping a `submit` future
/// before it settles frees the pipeline again.
#[derive(Clone)]
pub struct SubmissionPipeline {
    validator: Arc<FieldValidator>,
    state: Arc<RwLock<SubmissionState>>,
}

impl SubmissionPipeline {
    pub fn new(validator: Arc<FieldValidator>) -> Self {
        Self {
            validator,
            state: Arc::new(RwLock::new(SubmissionState {
                submit_state: SubmitState::Idle,
                submit_count: 0,
                panel: ResultPanel::Hidden,
            })),
        }
    }

    pub async fn submit(&self, snapshot: RegistrationForm) -> FormResult<SubmissionReport> {
        {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if state.submit_state == SubmitState::Processing {
                return Err(FormError::AlreadySubmitting);
            }
            transition_submit_state(&mut state.submit_state, SubmitState::Processing)?;
            state.submit_count = state.submit_count.saturating_add(1);
            state.panel = ResultPanel::Processing;
        }
        let mut in_flight = InFlight {
            state: &self.state,
            settled: false,
        };
        tracing::debug!("submission processing");

        let latency = self.validator.remote().latency(CheckScope::Submission);
        if !latency.is_zero() {
            Delay::new(latency).await;
        }

        let report = self.evaluate(&snapshot);
        let submission = SubmissionReport::from_report(report);

        {
            let mut state = write_lock(&self.state, "completing submit")?;
            let next = if submission.outcome() {
                SubmitState::Succeeded
            } else {
                SubmitState::Failed
            };
            transition_submit_state(&mut state.submit_state, next)?;
            state.panel = ResultPanel::Rendered(submission.clone());
        }
        in_flight.settled = true;
        tracing::info!(
            success = submission.outcome(),
            errors = submission.report.count(ReportStatus::Error),
            warnings = submission.report.count(ReportStatus::Warning),
            "submission settled"
        );
        Ok(submission)
    }

    /// Grades every field of `snapshot` without any delay.
    pub fn evaluate(&self, snapshot: &RegistrationForm) -> ValidationReport {
        let entries = FieldId::ALL
            .into_iter()
            .map(|field| self.evaluate_field(field, snapshot.get(field)))
            .collect();
        ValidationReport { entries }
    }

    fn evaluate_field(&self, field: FieldId, raw: &str) -> ReportEntry {
        let outcome = match self.validator.precheck(field, raw) {
            Ok(outcome) => outcome,
            Err(violation) => {
                return ReportEntry::new(field, ReportStatus::Error, violation.to_string());
            }
        };

        match outcome {
            LocalOutcome::Strength(strength) if strength.is_weak() => {
                ReportEntry::new(field, ReportStatus::Warning, WEAK_PASSWORD_MESSAGE)
            }
            LocalOutcome::Strength(_) => {
                ReportEntry::new(field, ReportStatus::Success, STRONG_PASSWORD_MESSAGE)
            }
            LocalOutcome::NeedsRemote(value) => {
                match self.validator.remote().lookup(field, &value) {
                    Verdict::AlreadyUsed => ReportEntry::new(
                        field,
                        ReportStatus::Error,
                        RuleViolation::AlreadyUsed { field }.to_string(),
                    ),
                    Verdict::Available => valid_entry(field),
                }
            }
            LocalOutcome::Accepted => valid_entry(field),
        }
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?.submit_state)
    }

    pub fn submit_count(&self) -> FormResult<u32> {
        Ok(read_lock(&self.state, "reading submit count")?.submit_count)
    }

    pub fn is_submitting(&self) -> FormResult<bool> {
        Ok(self.submit_state()? == SubmitState::Processing)
    }

    pub fn panel(&self) -> FormResult<ResultPanel> {
        Ok(read_lock(&self.state, "reading result panel")?.panel.clone())
    }

    pub(super) fn reset(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting submission")?;
        if state.submit_state == SubmitState::Processing {
            return Err(FormError::AlreadySubmitting);
        }
        transition_submit_state(&mut state.submit_state, SubmitState::Idle)?;
        state.panel = ResultPanel::Hidden;
        Ok(())
    }
}

fn valid_entry(field: FieldId) -> ReportEntry {
    ReportEntry::new(field, ReportStatus::Success, format!("{} is valid", field.label()))
}

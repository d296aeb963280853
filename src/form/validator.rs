use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::field::{Feedback, FieldId};
use super::remote::{CheckScope, RemoteCheck, Verdict};
use super::rules::{PasswordStrength, RuleSet, RuleViolation, password_strength};

pub type BoxedFeedbackFuture = Pin<Box<dyn Future<Output = Feedback> + Send + 'static>>;

/// A live validation run, either already settled or waiting on a remote check.
pub enum Validation {
    Settled(Feedback),
    Pending(BoxedFeedbackFuture),
}

impl Validation {
    pub fn is_pending(&self) -> bool {
        matches!(self, Validation::Pending(_))
    }

    pub async fn settle(self) -> Feedback {
        match self {
            Validation::Settled(feedback) => feedback,
            Validation::Pending(future) => future.await,
        }
    }
}

/// What the local rules concluded about a value that passed them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum LocalOutcome {
    /// Format is fine; membership still has to be looked up.
    NeedsRemote(String),
    Strength(PasswordStrength),
    Accepted,
}

/// Combines the [`RuleSet`] with a shared [`RemoteCheck`] for every field.
#[derive(Clone)]
pub struct FieldValidator {
    rules: RuleSet,
    remote: Arc<dyn RemoteCheck>,
}

impl FieldValidator {
    pub fn new(rules: RuleSet, remote: Arc<dyn RemoteCheck>) -> Self {
        Self { rules, remote }
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    pub fn remote(&self) -> &dyn RemoteCheck {
        self.remote.as_ref()
    }

    /// Produces the feedback for one trigger of `field`.
    ///
    /// Empty values and format failures settle without touching the remote
    /// check. Only username and email suspend, for the field latency.
    pub async fn validate_on_trigger(&self, field: FieldId, raw: &str) -> Feedback {
        self.begin(field, raw).settle().await
    }

    /// Runs the synchronous part of a validation and hands back the rest.
    pub fn begin(&self, field: FieldId, raw: &str) -> Validation {
        let outcome = match self.precheck(field, raw) {
            Ok(outcome) => outcome,
            Err(violation) => {
                tracing::debug!(%field, %violation, "rejected by local rules");
                return Validation::Settled(Feedback::invalid(violation.to_string()));
            }
        };

        match outcome {
            LocalOutcome::Strength(strength) => Validation::Settled(strength.live_feedback()),
            LocalOutcome::Accepted => {
                Validation::Settled(Feedback::valid(format!("{} is valid", field.label())))
            }
            LocalOutcome::NeedsRemote(value) => {
                let remote = self.remote.clone();
                Validation::Pending(Box::pin(async move {
                    let verdict = remote.check(field, &value, CheckScope::Field).await;
                    live_verdict_feedback(field, verdict)
                }))
            }
        }
    }

    pub(crate) fn precheck(
        &self,
        field: FieldId,
        raw: &str,
    ) -> Result<LocalOutcome, RuleViolation> {
        let value = if field.trims_input() { raw.trim() } else { raw };
        self.rules.check(field, value)?;
        Ok(match field {
            FieldId::Password => LocalOutcome::Strength(password_strength(value)),
            _ if field.has_remote_check() => LocalOutcome::NeedsRemote(value.to_owned()),
            _ => LocalOutcome::Accepted,
        })
    }
}

fn live_verdict_feedback(field: FieldId, verdict: Verdict) -> Feedback {
    match verdict {
        Verdict::AlreadyUsed => Feedback::invalid(RuleViolation::AlreadyUsed { field }.to_string()),
        Verdict::Available if field == FieldId::Username => {
            Feedback::valid(format!("{} is available", field.label()))
        }
        Verdict::Available => Feedback::valid(format!("{} is valid", field.label())),
    }
}

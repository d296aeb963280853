use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::join_all;
use thiserror::Error;

use super::field::{Feedback, FieldId, FieldKey, Trigger};
use super::model::{FieldLens, FormModel, RegistrationForm};
use super::remote::SimulatedRemoteCheck;
use super::rules::RuleSet;
use super::submission::{SubmissionPipeline, SubmissionReport};
use super::validator::FieldValidator;
use crate::config::ValidationConfig;

/// Per-field sequence number of a live validation run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ValidationTicket(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Processing,
    Succeeded,
    Failed,
}

/// What happens when an older run of a field settles after a newer one started.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StaleResultPolicy {
    /// Only the most recently started run may publish its feedback.
    #[default]
    DiscardStale,
    /// Whichever run settles last overwrites the current feedback.
    LastSettledWins,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormOptions {
    pub stale_results: StaleResultPolicy,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldMeta {
    pub dirty: bool,
    pub touched: bool,
    /// Set while `feedback` is the pending placeholder.
    pub pending: bool,
    pub feedback: Option<Feedback>,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot {
    pub model: RegistrationForm,
    pub is_dirty: bool,
    pub is_pending: bool,
    pub field_meta: BTreeMap<FieldId, FieldMeta>,
}

impl FormSnapshot {
    pub fn feedback(&self, field: FieldId) -> Option<&Feedback> {
        self.field_meta
            .get(&field)
            .and_then(|meta| meta.feedback.as_ref())
    }
}

/// Raw input arriving from the surrounding page.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormEvent {
    Changed { field: FieldId, value: String },
    FocusLost(FieldId),
    Submit,
}

/// What handling a [`FormEvent`] produced.
#[derive(Clone, Debug)]
pub enum EventOutcome {
    Ignored,
    Feedback(FieldId, Feedback),
    Submitted(SubmissionReport),
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    #[error("form submit is already in progress")]
    AlreadySubmitting,
    #[error("unknown form field `{0}`")]
    UnknownField(FieldKey),
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type FeedbackListener = Arc<dyn Fn(FieldId, &Feedback) + Send + Sync>;

pub(super) struct FormState {
    pub(super) initial_model: RegistrationForm,
    pub(super) model: RegistrationForm,
    pub(super) field_meta: BTreeMap<FieldId, FieldMeta>,
    pub(super) tickets: BTreeMap<FieldId, ValidationTicket>,
}

impl FormState {
    pub(super) fn ensure_meta(&mut self, field: FieldId) -> &mut FieldMeta {
        self.field_meta.entry(field).or_default()
    }

    fn next_ticket(&mut self, field: FieldId) -> ValidationTicket {
        let next = ValidationTicket(
            self.tickets
                .get(&field)
                .copied()
                .unwrap_or(ValidationTicket(0))
                .0
                + 1,
        );
        self.tickets.insert(field, next);
        next
    }
}

/// Routes trigger events to the [`FieldValidator`] and holds the current
/// feedback of every field.
#[derive(Clone)]
pub struct ValidationOrchestrator {
    pub(super) options: FormOptions,
    pub(super) validator: Arc<FieldValidator>,
    pub(super) state: Arc<RwLock<FormState>>,
    pub(super) listeners: Arc<RwLock<Vec<FeedbackListener>>>,
    pub(super) pipeline: SubmissionPipeline,
}

impl ValidationOrchestrator {
    pub fn new(initial: RegistrationForm, validator: FieldValidator, options: FormOptions) -> Self {
        let validator = Arc::new(validator);
        Self {
            options,
            pipeline: SubmissionPipeline::new(validator.clone()),
            validator,
            state: Arc::new(RwLock::new(FormState {
                initial_model: initial.clone(),
                model: initial,
                field_meta: BTreeMap::new(),
                tickets: BTreeMap::new(),
            })),
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Empty form backed by a [`SimulatedRemoteCheck`] built from `config`.
    pub fn from_config(config: &ValidationConfig, options: FormOptions) -> Self {
        let validator = FieldValidator::new(
            RuleSet::new(config.min_username_len),
            Arc::new(SimulatedRemoteCheck::from_config(config)),
        );
        Self::new(RegistrationForm::default(), validator, options)
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    pub fn submission_pipeline(&self) -> &SubmissionPipeline {
        &self.pipeline
    }

    pub fn register_feedback_listener(
        &self,
        listener: impl Fn(FieldId, &Feedback) + Send + Sync + 'static,
    ) -> FormResult<()> {
        let mut listeners = write_lock(&self.listeners, "registering feedback listener")?;
        listeners.push(Arc::new(listener));
        Ok(())
    }

    pub fn set<L>(&self, lens: L, value: String) -> FormResult<()>
    where
        L: FieldLens<RegistrationForm, Value = String>,
    {
        let field = FieldId::try_from(lens.key())?;
        let mut state = write_lock(&self.state, "writing form model")?;
        lens.set(&mut state.model, value);
        mark_dirty(&mut state, field);
        Ok(())
    }

    pub fn set_value(&self, field: FieldId, value: impl Into<String>) -> FormResult<()> {
        let mut state = write_lock(&self.state, "writing form model")?;
        if !state.model.set_value(field.key(), value.into()) {
            return Err(FormError::UnknownField(field.key()));
        }
        mark_dirty(&mut state, field);
        Ok(())
    }

    /// Stores new input; value-change fields validate right away.
    pub async fn on_value_changed(
        &self,
        field: FieldId,
        value: impl Into<String>,
    ) -> FormResult<Option<Feedback>> {
        self.set_value(field, value)?;
        if field.trigger() != Trigger::ValueChange {
            return Ok(None);
        }
        self.on_field_triggered(field).await.map(Some)
    }

    /// Marks the field touched; focus-lost fields validate.
    pub async fn on_focus_lost(&self, field: FieldId) -> FormResult<Option<Feedback>> {
        {
            let mut state = write_lock(&self.state, "touching field")?;
            state.ensure_meta(field).touched = true;
        }
        if field.trigger() != Trigger::FocusLost {
            return Ok(None);
        }
        self.on_field_triggered(field).await.map(Some)
    }

    pub async fn handle(&self, event: FormEvent) -> FormResult<EventOutcome> {
        let outcome = match event {
            FormEvent::Changed { field, value } => self
                .on_value_changed(field, value)
                .await?
                .map(|feedback| EventOutcome::Feedback(field, feedback)),
            FormEvent::FocusLost(field) => self
                .on_focus_lost(field)
                .await?
                .map(|feedback| EventOutcome::Feedback(field, feedback)),
            FormEvent::Submit => Some(EventOutcome::Submitted(self.submit().await?)),
        };
        Ok(outcome.unwrap_or(EventOutcome::Ignored))
    }

    /// Validates the field's current value and publishes the result.
    ///
    /// Returns the feedback this run produced, even when a newer run made it
    /// stale and it was not published.
    pub async fn on_field_triggered(&self, field: FieldId) -> FormResult<Feedback> {
        let (ticket, raw) = {
            let mut state = write_lock(&self.state, "starting field validation")?;
            let ticket = state.next_ticket(field);
            (ticket, state.model.get(field).to_owned())
        };
        tracing::debug!(%field, ticket = ticket.0, "field validation triggered");

        let validation = self.validator.begin(field, &raw);
        if validation.is_pending() {
            self.publish_pending(field, ticket)?;
        }
        let feedback = validation.settle().await;
        self.finish_validation(field, ticket, feedback.clone())?;
        Ok(feedback)
    }

    /// Triggers every field concurrently; results are in declaration order.
    pub async fn validate_all(&self) -> FormResult<Vec<(FieldId, Feedback)>> {
        let runs = FieldId::ALL.map(|field| async move {
            self.on_field_triggered(field)
                .await
                .map(|feedback| (field, feedback))
        });
        join_all(runs).await.into_iter().collect()
    }

    /// Re-validates a snapshot of the current model through the submission pipeline.
    pub async fn submit(&self) -> FormResult<SubmissionReport> {
        let snapshot = read_lock(&self.state, "snapshotting model for submit")?
            .model
            .clone();
        self.pipeline.submit(snapshot).await
    }

    pub fn feedback(&self, field: FieldId) -> FormResult<Option<Feedback>> {
        Ok(read_lock(&self.state, "reading field feedback")?
            .field_meta
            .get(&field)
            .and_then(|meta| meta.feedback.clone()))
    }

    pub fn field_meta(&self, field: FieldId) -> FormResult<Option<FieldMeta>> {
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&field)
            .cloned())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            model: state.model.clone(),
            is_dirty: state.field_meta.values().any(|meta| meta.dirty),
            is_pending: state.field_meta.values().any(|meta| meta.pending),
            field_meta: state.field_meta.clone(),
        })
    }

    /// Restores the initial values and forgets all feedback.
    ///
    /// Runs still in flight settle into a newer ticket generation and are
    /// dropped under [`StaleResultPolicy::DiscardStale`].
    /// Fails with [`FormError::AlreadySubmitting`] while a submission is in flight.
    pub fn reset(&self) -> FormResult<()> {
        self.pipeline.reset()?;
        let mut state = write_lock(&self.state, "resetting form")?;
        state.model = state.initial_model.clone();
        state.field_meta.clear();
        for field in FieldId::ALL {
            state.next_ticket(field);
        }
        Ok(())
    }

    fn publish_pending(&self, field: FieldId, ticket: ValidationTicket) -> FormResult<()> {
        let pending = Feedback::pending();
        {
            let mut state = write_lock(&self.state, "publishing pending feedback")?;
            if state.tickets.get(&field).copied() != Some(ticket) {
                return Ok(());
            }
            let meta = state.ensure_meta(field);
            meta.pending = true;
            meta.feedback = Some(pending.clone());
        }
        self.notify(field, &pending)
    }

    fn finish_validation(
        &self,
        field: FieldId,
        ticket: ValidationTicket,
        feedback: Feedback,
    ) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "finishing field validation")?;
            let latest = state.tickets.get(&field).copied() == Some(ticket);
            if !latest && self.options.stale_results == StaleResultPolicy::DiscardStale {
                tracing::warn!(%field, ticket = ticket.0, "discarding stale validation result");
                return Ok(());
            }
            // A stale run that publishes replaces the placeholder, so the
            // field no longer reads as pending even if a newer run is in flight.
            let meta = state.ensure_meta(field);
            meta.pending = false;
            meta.feedback = Some(feedback.clone());
        }
        tracing::debug!(
            %field,
            status = ?feedback.status,
            message = %feedback.message,
            "feedback settled"
        );
        self.notify(field, &feedback)
    }

    fn notify(&self, field: FieldId, feedback: &Feedback) -> FormResult<()> {
        let listeners = read_lock(&self.listeners, "reading feedback listeners")?.clone();
        for listener in listeners {
            listener(field, feedback);
        }
        Ok(())
    }
}

pub(super) fn transition_submit_state(
    current: &mut SubmitState,
    next: SubmitState,
) -> FormResult<()> {
    if *current == next {
        return Ok(());
    }

    let allowed = matches!(
        (*current, next),
        (SubmitState::Idle, SubmitState::Processing)
            | (SubmitState::Processing, SubmitState::Succeeded)
            | (SubmitState::Processing, SubmitState::Failed)
            | (SubmitState::Succeeded, SubmitState::Processing)
            | (SubmitState::Failed, SubmitState::Processing)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: *current,
            to: next,
        });
    }
    *current = next;
    Ok(())
}

fn mark_dirty(state: &mut FormState, field: FieldId) {
    let is_dirty = state.model.get(field) != state.initial_model.get(field);
    state.ensure_meta(field).dirty = is_dirty;
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}

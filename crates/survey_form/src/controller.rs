use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    domain::{GraduationMonth, InterestSource, LikedOption, Likelihood, SurveyId},
    protocol::{SurveyRecord, SURVEY_DATE_FORMAT},
};
use survey_client::SurveyTransport;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{codec, derivation, error::FormError, field::Field, validation, zip::ZipTable};

/// Whether the form is drafting a new survey or editing a persisted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Create,
    Edit(SurveyId),
}

/// Buttons a form renderer should offer for the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Submit,
    Reset,
    Delete,
    CancelEdit,
}

impl Mode {
    pub fn editing(self) -> Option<SurveyId> {
        match self {
            Mode::Create => None,
            Mode::Edit(id) => Some(id),
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Mode::Create => "Submit",
            Mode::Edit(_) => "Update",
        }
    }

    pub fn controls(self) -> &'static [Control] {
        match self {
            Mode::Create => &[Control::Submit, Control::Reset],
            Mode::Edit(_) => &[Control::Submit, Control::Delete, Control::CancelEdit],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    ModeChanged(Mode),
    /// The owner should switch to the results listing.
    ShowResults,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// Yes/no gate consulted before a survey is destroyed.
pub trait ConfirmDelete: Send + Sync {
    fn confirm_delete(&self, id: SurveyId) -> bool;
}

impl<F> ConfirmDelete for F
where
    F: Fn(SurveyId) -> bool + Send + Sync,
{
    fn confirm_delete(&self, id: SurveyId) -> bool {
        self(id)
    }
}

/// Read-only view of the form for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    pub record: SurveyRecord,
    pub mode: Mode,
    pub busy: bool,
}

impl FormSnapshot {
    pub fn is_liked(&self, option: LikedOption) -> bool {
        codec::is_selected(&self.record.liked_most, option)
    }

    pub fn is_submittable(&self) -> bool {
        validation::is_submittable(&self.record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp {
    Submit,
    Delete,
}

struct FormState {
    record: SurveyRecord,
    mode: Mode,
    /// Bumped on every mode transition; responses captured under an older
    /// epoch are discarded.
    epoch: u64,
    pending: Option<PendingOp>,
}

impl FormState {
    fn fresh() -> Self {
        Self {
            record: SurveyRecord::default(),
            mode: Mode::Create,
            epoch: 0,
            pending: None,
        }
    }

    fn reset(&mut self) {
        self.record = SurveyRecord::default();
        self.mode = Mode::Create;
        self.epoch += 1;
    }
}

/// Owns the single in-flight survey record and funnels every mutation
/// through named transitions.
pub struct FormController {
    transport: Arc<dyn SurveyTransport>,
    zip_table: Arc<ZipTable>,
    inner: Mutex<FormState>,
    events: broadcast::Sender<FormEvent>,
}

impl FormController {
    pub fn new(transport: Arc<dyn SurveyTransport>) -> Arc<Self> {
        Self::with_zip_table(transport, ZipTable::builtin())
    }

    pub fn with_zip_table(
        transport: Arc<dyn SurveyTransport>,
        zip_table: Arc<ZipTable>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            transport,
            zip_table,
            inner: Mutex::new(FormState::fresh()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let guard = self.inner.lock().await;
        FormSnapshot {
            record: guard.record.clone(),
            mode: guard.mode,
            busy: guard.pending.is_some(),
        }
    }

    pub async fn mode(&self) -> Mode {
        self.inner.lock().await.mode
    }

    /// Sets one field from raw input. City and state are rejected; zip code
    /// changes re-derive them. Unparseable input leaves the record untouched.
    pub async fn set_field(&self, field: Field, value: &str) -> Result<(), FormError> {
        let mut guard = self.inner.lock().await;
        apply_field(&mut guard.record, field, value, &self.zip_table).inspect_err(|err| {
            warn!(field = field.wire_name(), %err, "form: field update rejected");
        })
    }

    pub async fn toggle_liked(&self, option: LikedOption, checked: bool) {
        let mut guard = self.inner.lock().await;
        guard.record.liked_most = codec::toggle(&guard.record.liked_most, option, checked);
    }

    /// Replaces the form with a fresh draft in create mode.
    pub async fn reset(&self) {
        let mut guard = self.inner.lock().await;
        let was = guard.mode;
        guard.reset();
        debug!("form: reset");
        if was != Mode::Create {
            let _ = self.events.send(FormEvent::ModeChanged(Mode::Create));
        }
    }

    /// Loads a persisted survey and switches to edit mode. On failure the
    /// previous record and mode are kept.
    pub async fn enter_edit(&self, id: SurveyId) -> Result<(), FormError> {
        let epoch = self.inner.lock().await.epoch;
        let mut fetched = match self.transport.get_by_id(id).await {
            Ok(record) => record,
            Err(err) => {
                error!(survey_id = id.0, %err, "form: failed to load survey");
                let _ = self.events.send(FormEvent::Error(err.to_string()));
                return Err(err.into());
            }
        };

        let mut guard = self.inner.lock().await;
        if guard.epoch != epoch {
            warn!(survey_id = id.0, "form: discarding survey loaded after form moved on");
            return Err(FormError::Stale);
        }
        fetched.id.get_or_insert(id);
        derivation::apply(&mut fetched, &self.zip_table);
        fetched.liked_most = codec::canonicalize(&fetched.liked_most);
        guard.record = fetched;
        guard.mode = Mode::Edit(id);
        guard.epoch += 1;
        info!(survey_id = id.0, "form: editing survey");
        let _ = self.events.send(FormEvent::ModeChanged(Mode::Edit(id)));
        Ok(())
    }

    /// Persists the current record: create in create mode, update in edit
    /// mode. On success the form resets and the results view is signalled.
    pub async fn submit(&self) -> Result<SurveyRecord, FormError> {
        let (payload, mode, epoch) = {
            let mut guard = self.inner.lock().await;
            if let Some(pending) = guard.pending {
                debug!(?pending, "form: submit rejected while request outstanding");
                return Err(FormError::Busy);
            }
            let missing = validation::missing_required(&guard.record);
            if !missing.is_empty() {
                warn!(?missing, "form: missing required fields");
                return Err(FormError::Validation { missing });
            }
            guard.pending = Some(PendingOp::Submit);

            let mut payload = guard.record.clone();
            payload.liked_most = codec::normalize(&payload.liked_most);
            if guard.mode == Mode::Create {
                payload.id = None;
            }
            (payload, guard.mode, guard.epoch)
        };

        let result = match mode {
            Mode::Create => self.transport.create(&payload).await,
            Mode::Edit(id) => self.transport.update(id, &payload).await,
        };

        let mut guard = self.inner.lock().await;
        guard.pending = None;
        let persisted = match result {
            Ok(record) => record,
            Err(err) => {
                error!(?mode, %err, "form: submit failed");
                let _ = self.events.send(FormEvent::Error(err.to_string()));
                return Err(err.into());
            }
        };
        if guard.epoch != epoch {
            warn!(?mode, "form: submit completed after form moved on");
            return Err(FormError::Stale);
        }

        guard.reset();
        info!(?mode, survey_id = persisted.id.map(|id| id.0), "form: survey saved");
        drop(guard);
        if mode != Mode::Create {
            let _ = self.events.send(FormEvent::ModeChanged(Mode::Create));
        }
        let _ = self.events.send(FormEvent::ShowResults);
        Ok(persisted)
    }

    /// Leaves edit mode without persisting anything.
    pub async fn cancel_edit(&self) -> Result<(), FormError> {
        let mut guard = self.inner.lock().await;
        let Mode::Edit(id) = guard.mode else {
            return Err(FormError::NotEditing);
        };
        guard.reset();
        drop(guard);
        debug!(survey_id = id.0, "form: edit cancelled");
        let _ = self.events.send(FormEvent::ModeChanged(Mode::Create));
        let _ = self.events.send(FormEvent::ShowResults);
        Ok(())
    }

    /// Deletes the survey being edited once `confirm` agrees. Rejected in
    /// create mode.
    pub async fn delete(&self, confirm: &dyn ConfirmDelete) -> Result<DeleteOutcome, FormError> {
        let (id, epoch) = {
            let guard = self.inner.lock().await;
            let Mode::Edit(id) = guard.mode else {
                warn!("form: delete requested outside edit mode");
                return Err(FormError::NotEditing);
            };
            if guard.pending.is_some() {
                return Err(FormError::Busy);
            }
            (id, guard.epoch)
        };

        if !confirm.confirm_delete(id) {
            debug!(survey_id = id.0, "form: delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        {
            let mut guard = self.inner.lock().await;
            if guard.epoch != epoch {
                return Err(FormError::Stale);
            }
            if guard.pending.is_some() {
                return Err(FormError::Busy);
            }
            guard.pending = Some(PendingOp::Delete);
        }

        let result = self.transport.delete_by_id(id).await;

        let mut guard = self.inner.lock().await;
        guard.pending = None;
        if let Err(err) = result {
            error!(survey_id = id.0, %err, "form: delete failed");
            let _ = self.events.send(FormEvent::Error(err.to_string()));
            return Err(err.into());
        }
        if guard.epoch != epoch {
            warn!(survey_id = id.0, "form: delete completed after form moved on");
            return Err(FormError::Stale);
        }

        guard.reset();
        drop(guard);
        info!(survey_id = id.0, "form: survey deleted");
        let _ = self.events.send(FormEvent::ModeChanged(Mode::Create));
        let _ = self.events.send(FormEvent::ShowResults);
        Ok(DeleteOutcome::Deleted)
    }
}

fn apply_field(
    record: &mut SurveyRecord,
    field: Field,
    value: &str,
    zip_table: &ZipTable,
) -> Result<(), FormError> {
    let invalid = |reason: String| FormError::InvalidValue {
        field,
        value: value.to_string(),
        reason,
    };

    match field {
        Field::City | Field::State => return Err(FormError::ReadOnlyField(field)),
        Field::FirstName => record.first_name = value.to_string(),
        Field::LastName => record.last_name = value.to_string(),
        Field::StreetAddress => record.street_address = value.to_string(),
        Field::ZipCode => {
            record.zip_code = value.to_string();
            derivation::apply(record, zip_table);
        }
        Field::Phone => record.phone = value.to_string(),
        Field::Email => record.email = value.to_string(),
        Field::SurveyDate => {
            record.survey_date = blank_or(value, |raw| {
                NaiveDate::parse_from_str(raw, SURVEY_DATE_FORMAT).map_err(|e| e.to_string())
            })
            .map_err(invalid)?;
        }
        Field::GraduationMonth => {
            record.graduation_month = blank_or(value, |raw| {
                raw.parse::<GraduationMonth>().map_err(|e| e.to_string())
            })
            .map_err(invalid)?;
        }
        Field::GraduationYear => record.graduation_year = value.to_string(),
        Field::LikedMost => {
            let options = codec::decode(value)
                .into_iter()
                .map(|token| token.parse::<LikedOption>().map_err(|e| e.to_string()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid)?;
            record.liked_most = codec::encode(&options);
        }
        Field::InterestSource => {
            record.interest_source = blank_or(value, |raw| {
                raw.parse::<InterestSource>().map_err(|e| e.to_string())
            })
            .map_err(invalid)?;
        }
        Field::Likelihood => {
            record.likelihood = value
                .parse::<Likelihood>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        Field::Comments => record.comments = value.to_string(),
    }
    Ok(())
}

fn blank_or<T>(
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, String> {
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else {
        parse(value).map(Some)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

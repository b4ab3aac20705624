//! Results listing: every stored survey, with per-row edit and delete.

use std::sync::Arc;

use shared::{
    domain::{Choice, SurveyId},
    protocol::SurveyRecord,
};
use survey_client::{SurveyTransport, TransportError};
use tracing::{error, info, warn};

use crate::{
    controller::{ConfirmDelete, DeleteOutcome, FormController},
    error::FormError,
};

pub const COLUMNS: [&str; 16] = [
    "ID",
    "First",
    "Last",
    "Street",
    "City",
    "State",
    "Zip",
    "Phone",
    "Email",
    "Survey Date",
    "Grad Month",
    "Grad Year",
    "Liked Most",
    "Interest Source",
    "Likelihood",
    "Additional Comments",
];

/// Table cells for one record, aligned with [`COLUMNS`].
pub fn cells(record: &SurveyRecord) -> [String; 16] {
    [
        record.id.map(|id| id.to_string()).unwrap_or_default(),
        record.first_name.clone(),
        record.last_name.clone(),
        record.street_address.clone(),
        record.city.clone(),
        record.state.clone(),
        record.zip_code.clone(),
        record.phone.clone(),
        record.email.clone(),
        record.survey_date_text(),
        label_or_blank(record.graduation_month),
        record.graduation_year.clone(),
        record.liked_most.clone(),
        label_or_blank(record.interest_source),
        record.likelihood.label().to_string(),
        record.comments.clone(),
    ]
}

fn label_or_blank<T: Choice>(choice: Option<T>) -> String {
    choice.map(Choice::label).unwrap_or_default().to_string()
}

pub struct ResultsView {
    transport: Arc<dyn SurveyTransport>,
    rows: Vec<SurveyRecord>,
}

impl ResultsView {
    pub fn new(transport: Arc<dyn SurveyTransport>) -> Self {
        Self {
            transport,
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[SurveyRecord] {
        &self.rows
    }

    /// Replaces the rows with the current collection. On failure the
    /// previous rows stay visible.
    pub async fn load(&mut self) -> Result<&[SurveyRecord], TransportError> {
        match self.transport.list().await {
            Ok(rows) => {
                info!(count = rows.len(), "results: loaded surveys");
                self.rows = rows;
                Ok(&self.rows)
            }
            Err(err) => {
                error!(%err, "results: failed to fetch survey results");
                Err(err)
            }
        }
    }

    /// Deletes one row after confirmation, then reloads the listing.
    pub async fn delete_row(
        &mut self,
        id: SurveyId,
        confirm: &dyn ConfirmDelete,
    ) -> Result<DeleteOutcome, TransportError> {
        if !confirm.confirm_delete(id) {
            return Ok(DeleteOutcome::Declined);
        }
        self.transport
            .delete_by_id(id)
            .await
            .inspect_err(|err| error!(survey_id = id.0, %err, "results: failed to delete survey"))?;

        let reload = self.load().await.map(|_| ());
        if let Err(err) = reload {
            warn!(survey_id = id.0, %err, "results: reload after delete failed");
            self.rows.retain(|row| row.id != Some(id));
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// Hands a row to the form for editing.
    pub async fn edit(&self, id: SurveyId, form: &FormController) -> Result<(), FormError> {
        form.enter_edit(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use shared::domain::{GraduationMonth, Likelihood};
    use tokio::sync::Mutex;

    use crate::controller::Mode;

    struct ScriptedTransport {
        rows: Mutex<Vec<SurveyRecord>>,
        fail_list: Mutex<bool>,
    }

    impl ScriptedTransport {
        fn new(rows: Vec<SurveyRecord>) -> Arc<Self> {
            Arc::new(Self {
                rows: Mutex::new(rows),
                fail_list: Mutex::new(false),
            })
        }
    }

    #[async_trait]
    impl SurveyTransport for ScriptedTransport {
        async fn list(&self) -> Result<Vec<SurveyRecord>, TransportError> {
            if *self.fail_list.lock().await {
                return Err(TransportError::Rejected {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    body: String::new(),
                });
            }
            Ok(self.rows.lock().await.clone())
        }

        async fn get_by_id(&self, id: SurveyId) -> Result<SurveyRecord, TransportError> {
            self.rows
                .lock()
                .await
                .iter()
                .find(|row| row.id == Some(id))
                .cloned()
                .ok_or(TransportError::NotFound { id })
        }

        async fn create(&self, record: &SurveyRecord) -> Result<SurveyRecord, TransportError> {
            Ok(record.clone())
        }

        async fn update(
            &self,
            _id: SurveyId,
            record: &SurveyRecord,
        ) -> Result<SurveyRecord, TransportError> {
            Ok(record.clone())
        }

        async fn delete_by_id(&self, id: SurveyId) -> Result<(), TransportError> {
            let mut rows = self.rows.lock().await;
            let before = rows.len();
            rows.retain(|row| row.id != Some(id));
            if rows.len() == before {
                return Err(TransportError::NotFound { id });
            }
            Ok(())
        }
    }

    fn row(id: i64, first_name: &str) -> SurveyRecord {
        SurveyRecord {
            id: Some(SurveyId(id)),
            first_name: first_name.into(),
            ..SurveyRecord::default()
        }
    }

    #[tokio::test]
    async fn load_keeps_previous_rows_on_failure() {
        let transport = ScriptedTransport::new(vec![row(1, "Ann"), row(2, "Bo")]);
        let mut view = ResultsView::new(transport.clone());
        assert_eq!(view.load().await.expect("load").len(), 2);

        *transport.fail_list.lock().await = true;
        assert!(view.load().await.is_err());
        assert_eq!(view.rows().len(), 2);
    }

    #[tokio::test]
    async fn delete_row_requires_confirmation_and_reloads() {
        let transport = ScriptedTransport::new(vec![row(1, "Ann"), row(2, "Bo")]);
        let mut view = ResultsView::new(transport.clone());
        view.load().await.expect("load");

        let outcome = view
            .delete_row(SurveyId(1), &|_: SurveyId| false)
            .await
            .expect("declined");
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(view.rows().len(), 2);

        let outcome = view
            .delete_row(SurveyId(1), &|_: SurveyId| true)
            .await
            .expect("deleted");
        assert_eq!(outcome, DeleteOutcome::Deleted);
        let names: Vec<_> = view.rows().iter().map(|r| r.first_name.as_str()).collect();
        assert_eq!(names, ["Bo"]);
    }

    #[tokio::test]
    async fn failed_reload_after_delete_drops_row_locally() {
        let transport = ScriptedTransport::new(vec![row(1, "Ann"), row(2, "Bo")]);
        let mut view = ResultsView::new(transport.clone());
        view.load().await.expect("load");
        *transport.fail_list.lock().await = true;

        view.delete_row(SurveyId(2), &|_: SurveyId| true)
            .await
            .expect("deleted");
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].id, Some(SurveyId(1)));
    }

    #[tokio::test]
    async fn delete_of_missing_row_is_reported() {
        let transport = ScriptedTransport::new(vec![row(1, "Ann")]);
        let mut view = ResultsView::new(transport);
        let err = view
            .delete_row(SurveyId(9), &|_: SurveyId| true)
            .await
            .expect_err("missing");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn edit_hands_row_to_form() {
        let transport = ScriptedTransport::new(vec![row(5, "Cy")]);
        let view = ResultsView::new(transport.clone());
        let form = FormController::new(transport);

        view.edit(SurveyId(5), &form).await.expect("edit");
        let snapshot = form.snapshot().await;
        assert_eq!(snapshot.mode, Mode::Edit(SurveyId(5)));
        assert_eq!(snapshot.record.first_name, "Cy");
    }

    #[test]
    fn cells_follow_column_order() {
        let record = SurveyRecord {
            graduation_month: Some(GraduationMonth::March),
            likelihood: Likelihood::Likely,
            survey_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1),
            ..row(3, "Di")
        };
        let cells = cells(&record);
        assert_eq!(cells.len(), COLUMNS.len());
        assert_eq!(cells[0], "3");
        assert_eq!(cells[1], "Di");
        assert_eq!(cells[9], "2024-05-01");
        assert_eq!(cells[10], "March");
        assert_eq!(cells[13], "");
        assert_eq!(cells[14], "Likely");
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{domain::SurveyId, protocol::SurveyRecord};
use tracing::{debug, error, info};
use url::Url;

pub mod error;
pub use error::TransportError;

pub const DEFAULT_COLLECTION_URL: &str = "http://127.0.0.1:5000/surveys";

/// Remote CRUD over the survey collection.
///
/// Every operation fails independently and reports which kind of failure
/// occurred; callers never receive a substituted default.
#[async_trait]
pub trait SurveyTransport: Send + Sync {
    async fn list(&self) -> Result<Vec<SurveyRecord>, TransportError>;
    async fn get_by_id(&self, id: SurveyId) -> Result<SurveyRecord, TransportError>;
    /// The server assigns the id of the returned record.
    async fn create(&self, record: &SurveyRecord) -> Result<SurveyRecord, TransportError>;
    async fn update(
        &self,
        id: SurveyId,
        record: &SurveyRecord,
    ) -> Result<SurveyRecord, TransportError>;
    async fn delete_by_id(&self, id: SurveyId) -> Result<(), TransportError>;
}

/// JSON-over-HTTP client for a single survey collection endpoint.
#[derive(Debug, Clone)]
pub struct HttpSurveyClient {
    http: Client,
    collection_url: String,
}

impl HttpSurveyClient {
    pub fn new(collection_url: &str) -> Result<Self, TransportError> {
        Self::with_http(Client::new(), collection_url)
    }

    pub fn with_timeout(collection_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Network)?;
        Self::with_http(http, collection_url)
    }

    pub fn with_http(http: Client, collection_url: &str) -> Result<Self, TransportError> {
        let trimmed = collection_url.trim().trim_end_matches('/');
        Url::parse(trimmed).map_err(|source| TransportError::InvalidUrl {
            url: collection_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            collection_url: trimmed.to_string(),
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn record_url(&self, id: SurveyId) -> String {
        format!("{}/{}", self.collection_url, id.0)
    }

    async fn list_impl(&self) -> Result<Vec<SurveyRecord>, TransportError> {
        let response = send(self.http.get(&self.collection_url), None).await?;
        decode(response).await
    }

    async fn get_impl(&self, id: SurveyId) -> Result<SurveyRecord, TransportError> {
        let response = send(self.http.get(self.record_url(id)), Some(id)).await?;
        decode(response).await
    }

    async fn create_impl(&self, record: &SurveyRecord) -> Result<SurveyRecord, TransportError> {
        let response = send(self.http.post(&self.collection_url).json(record), None).await?;
        decode(response).await
    }

    async fn update_impl(
        &self,
        id: SurveyId,
        record: &SurveyRecord,
    ) -> Result<SurveyRecord, TransportError> {
        let response = send(self.http.put(self.record_url(id)).json(record), Some(id)).await?;
        decode(response).await
    }

    async fn delete_impl(&self, id: SurveyId) -> Result<(), TransportError> {
        send(self.http.delete(self.record_url(id)), Some(id)).await?;
        Ok(())
    }
}

#[async_trait]
impl SurveyTransport for HttpSurveyClient {
    async fn list(&self) -> Result<Vec<SurveyRecord>, TransportError> {
        debug!(url = %self.collection_url, "transport: listing surveys");
        let records = self
            .list_impl()
            .await
            .inspect_err(|err| error!(%err, "transport: fetching surveys failed"))?;
        debug!(count = records.len(), "transport: surveys listed");
        Ok(records)
    }

    async fn get_by_id(&self, id: SurveyId) -> Result<SurveyRecord, TransportError> {
        debug!(survey_id = id.0, "transport: fetching survey");
        self.get_impl(id)
            .await
            .inspect_err(|err| error!(survey_id = id.0, %err, "transport: fetching survey failed"))
    }

    async fn create(&self, record: &SurveyRecord) -> Result<SurveyRecord, TransportError> {
        let created = self
            .create_impl(record)
            .await
            .inspect_err(|err| error!(%err, "transport: adding survey failed"))?;
        info!(survey_id = created.id.map(|id| id.0), "transport: survey created");
        Ok(created)
    }

    async fn update(
        &self,
        id: SurveyId,
        record: &SurveyRecord,
    ) -> Result<SurveyRecord, TransportError> {
        let updated = self
            .update_impl(id, record)
            .await
            .inspect_err(|err| error!(survey_id = id.0, %err, "transport: updating survey failed"))?;
        info!(survey_id = id.0, "transport: survey updated");
        Ok(updated)
    }

    async fn delete_by_id(&self, id: SurveyId) -> Result<(), TransportError> {
        self.delete_impl(id)
            .await
            .inspect_err(|err| error!(survey_id = id.0, %err, "transport: deleting survey failed"))?;
        info!(survey_id = id.0, "transport: survey deleted");
        Ok(())
    }
}

async fn send(request: RequestBuilder, target: Option<SurveyId>) -> Result<Response, TransportError> {
    let response = request.send().await.map_err(TransportError::Network)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, target) {
        return Err(TransportError::NotFound { id });
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Rejected { status, body })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    response.json().await.map_err(TransportError::Decode)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

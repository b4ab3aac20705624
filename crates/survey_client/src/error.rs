use reqwest::StatusCode;
use shared::domain::SurveyId;
use thiserror::Error;

/// Failure of a single survey collection operation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("survey service unreachable: {0}")]
    Network(#[source] reqwest::Error),
    #[error("survey {id} not found")]
    NotFound { id: SurveyId },
    #[error("survey service rejected request with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("invalid survey service response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid survey service url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl TransportError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

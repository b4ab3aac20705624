use survey_client::TransportError;
use thiserror::Error;

use crate::field::Field;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("missing required fields: {}", join_fields(.missing))]
    Validation { missing: Vec<Field> },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{0} is derived from the zip code and cannot be set directly")]
    ReadOnlyField(Field),
    #[error("invalid value {value:?} for {field}: {reason}")]
    InvalidValue {
        field: Field,
        value: String,
        reason: String,
    },
    #[error("no survey is being edited")]
    NotEditing,
    #[error("another submission or deletion is still in flight")]
    Busy,
    /// The form changed mode or record while the request was outstanding; the
    /// response was not applied. Any remote side effect has already happened.
    #[error("form moved on before the survey service responded")]
    Stale,
}

impl FormError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.wire_name())
        .collect::<Vec<_>>()
        .join(", ")
}

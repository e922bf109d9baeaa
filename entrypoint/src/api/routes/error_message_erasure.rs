use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use common::errors::InputError;
use mongodb_connector::errors::ConnectorError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

const REJECTED_REQUEST: &str = "Invalid request";

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error(transparent)]
    QueryExtractorRejection(#[from] QueryRejection),
    #[error(transparent)]
    JsonExtractorRejection(#[from] JsonRejection),
    #[error(transparent)]
    PathExtractorRejection(#[from] PathRejection),
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    Conflict(String),
    #[error("{0}")]
    Internal(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl ApiError {
    /// Database failures keep their detail in the logs only, the client
    /// gets `message`.
    pub(crate) fn from_connector(err: ConnectorError, message: &'static str) -> Self {
        match err {
            ConnectorError::InvalidInput(err) => Self::InvalidInput(err),
            ConnectorError::NotFound(subject) => Self::NotFound(subject),
            ConnectorError::Duplicate(subject) => Self::Conflict(subject),
            err @ (ConnectorError::Database(_) | ConnectorError::UnexpectedId(_)) => {
                error!("{message}: {err}");
                Self::Internal(message)
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::QueryExtractorRejection(_)
            | Self::JsonExtractorRejection(_)
            | Self::PathExtractorRejection(_)
            | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            Self::QueryExtractorRejection(rejection) => {
                debug!("Failed to parse query: {}", rejection.body_text());
                REJECTED_REQUEST.to_string()
            }
            Self::JsonExtractorRejection(rejection) => {
                debug!("Failed to parse body: {}", rejection.body_text());
                REJECTED_REQUEST.to_string()
            }
            Self::PathExtractorRejection(rejection) => {
                debug!("Failed to parse path: {}", rejection.body_text());
                REJECTED_REQUEST.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            success: false,
            message,
        };

        (status, Json(body)).into_response()
    }
}

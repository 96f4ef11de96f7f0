use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::pki::crl::CrlError;

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl CrlError {
    fn status_code(&self) -> StatusCode {
        match self {
            CrlError::Validation(_) | CrlError::InvalidSerial(_) | CrlError::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            CrlError::NotFound(_) => StatusCode::NOT_FOUND,
            CrlError::Storage(_) | CrlError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CrlError::Population { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<JsonRejection> for CrlError {
    fn from(rejection: JsonRejection) -> Self {
        CrlError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for CrlError {
    fn from(rejection: QueryRejection) -> Self {
        CrlError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for CrlError {
    fn from(rejection: PathRejection) -> Self {
        CrlError::Validation(rejection.body_text())
    }
}

impl IntoResponse for CrlError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "CRL request failed");
        } else {
            tracing::debug!(error = %self, "CRL request rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

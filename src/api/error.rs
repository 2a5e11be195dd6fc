use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::StatusError;

#[derive(Debug)]
pub struct ApiError(pub StatusError);

impl From<StatusError> for ApiError {
    fn from(err: StatusError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            StatusError::UnknownComponent { .. } => StatusCode::NOT_FOUND,
            StatusError::DuplicateComponent { .. } => StatusCode::CONFLICT,
            StatusError::UnknownState { .. } | StatusError::InvalidDescriptor { .. } => {
                StatusCode::BAD_REQUEST
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

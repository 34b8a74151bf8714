// HTTP error mapping
use crate::application::record_service::WriteError;
use crate::application::record_store::{FetchError, StoreError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Fetch(FetchError),
    Write(WriteError),
    /// The request body is not the JSON the route expects.
    Body(JsonRejection),
    /// A newer refresh from the same client was started.
    Superseded,
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        ApiError::Fetch(e)
    }
}

impl From<WriteError> for ApiError {
    fn from(e: WriteError) -> Self {
        ApiError::Write(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Body(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Fetch(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Write(WriteError::Decode { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Write(WriteError::Store(StoreError::Invalid(_))) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Write(WriteError::Store(StoreError::NotFound { .. })) => StatusCode::NOT_FOUND,
            ApiError::Write(WriteError::Store(StoreError::Fetch(_))) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Superseded => StatusCode::CONFLICT,
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            ApiError::Fetch(_) => "unable to load data",
            ApiError::Write(WriteError::Store(StoreError::NotFound { .. })) => "record not found",
            ApiError::Write(WriteError::Store(StoreError::Fetch(_))) => "unable to save data",
            ApiError::Write(_) => "invalid record",
            ApiError::Body(_) => "invalid request body",
            ApiError::Superseded => "superseded by a newer request",
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Fetch(e) => e.to_string(),
            ApiError::Write(e) => e.to_string(),
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Superseded => String::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.detail());
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self.detail());
        }

        let body = json!({ "error": self.summary(), "detail": self.detail() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{Domain, ValidationError};

    #[test]
    fn test_status_mapping() {
        let fetch = ApiError::Fetch(FetchError::Unreachable("refused".to_string()));
        assert_eq!(fetch.status(), StatusCode::SERVICE_UNAVAILABLE);

        let missing = ApiError::Write(WriteError::Store(StoreError::NotFound {
            domain: Domain::Families,
            id: 9,
        }));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let invalid = ApiError::Write(WriteError::Store(StoreError::Invalid(ValidationError::EmptyName)));
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_fetch_error_body() {
        let response = ApiError::Fetch(FetchError::Status {
            domain: Domain::Tutors,
            status: 502,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "unable to load data");
        assert_eq!(value["detail"], "record store returned status 502 for tutors");
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Every failure the API reports. Detail is logged, the client only gets the
/// fixed message for the kind.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable entity: {0}")]
    UnprocessableEntity(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    status: u16,
    msg: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Server can not accept a bad request",
            ApiError::NotFound => "Request is not found",
            ApiError::MethodNotAllowed => "Requested method is not allowed",
            ApiError::UnprocessableEntity(_) => {
                "Server was unable to process an unprocessable entity"
            }
            ApiError::Internal(_) => "Server encountered an error while processing the request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(_) => tracing::error!("{self}"),
            _ => tracing::debug!("{self}"),
        }
        let body = ErrorBody {
            success: false,
            status: status.as_u16(),
            msg: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        ApiError::Internal(error.to_string())
    }
}

impl From<prometheus::Error> for ApiError {
    fn from(error: prometheus::Error) -> ApiError {
        ApiError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_of(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn every_kind_has_fixed_envelope() {
        let cases = [
            (ApiError::BadRequest("x".into()), 400),
            (ApiError::NotFound, 404),
            (ApiError::MethodNotAllowed, 405),
            (ApiError::UnprocessableEntity("x".into()), 422),
            (ApiError::Internal("x".into()), 500),
        ];
        for (error, code) in cases {
            let (status, body) = body_of(error).await;
            assert_eq!(status.as_u16(), code);
            assert_eq!(body["success"], json!(false));
            assert_eq!(body["status"], json!(code));
            assert!(body["msg"].is_string());
        }
    }

    #[tokio::test]
    async fn detail_does_not_leak_into_body() {
        let (_, body) = body_of(ApiError::Internal("disk I/O error".into())).await;
        assert_eq!(
            body["msg"],
            json!("Server encountered an error while processing the request")
        );
    }

    #[test]
    fn database_errors_are_internal() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error;

#[derive(Debug)]
pub enum ApiError {
    DataBaseError(sqlx::Error),
    MetricsError(prometheus::Error),
}

pub type ApiResponse<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status) = match self {
            ApiError::DataBaseError(error) => match error {
                Error::RowNotFound => ("Object not found".to_owned(), StatusCode::NOT_FOUND),
                _ => {
                    tracing::error!(error = %error, "Database error");
                    (error.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
                }
            },
            ApiError::MetricsError(error) => {
                tracing::error!(error = %error, "Failed to encode metrics");
                (error.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
            }
        };
        (status, message).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        ApiError::DataBaseError(error)
    }
}

impl From<prometheus::Error> for ApiError {
    fn from(error: prometheus::Error) -> ApiError {
        ApiError::MetricsError(error)
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nusa_core::BookingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    BadRequest(String),
    Booking(BookingError),
}

impl AppError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
            AppError::Booking(err) => {
                let kind = err.kind().as_str();
                match &err {
                    BookingError::Validation(_) => (StatusCode::BAD_REQUEST, kind, err.to_string()),
                    BookingError::CapacityExceeded { .. } => {
                        (StatusCode::CONFLICT, kind, "quota limit reached".to_string())
                    }
                    BookingError::InvalidTransition { .. } => {
                        (StatusCode::CONFLICT, kind, err.to_string())
                    }
                    BookingError::NotFound(_) => (StatusCode::NOT_FOUND, kind, err.to_string()),
                    BookingError::Storage(msg) => {
                        tracing::error!("Storage failure: {}", msg);
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            kind,
                            "Internal Server Error".to_string(),
                        )
                    }
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, error_message) = self.parts();

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError::Booking(err)
    }
}

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use constant_time_eq::constant_time_eq;
use nusa_core::payment::PaymentNotification;
use nusa_core::BookingError;
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// POST /v1/webhooks/payments
/// Receive final payment outcomes from the gateway
pub async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PaymentNotification>,
) -> Result<Json<Value>, AppError> {
    let presented = headers
        .get(WEBHOOK_SECRET_HEADER)
        .map(|h| h.as_bytes())
        .unwrap_or_default();
    let expected = state.auth.webhook_secret.as_bytes();
    if expected.is_empty() || !constant_time_eq(presented, expected) {
        tracing::warn!("Payment webhook rejected: bad {} header", WEBHOOK_SECRET_HEADER);
        return Err(AppError::AuthenticationError("invalid webhook secret".to_string()));
    }

    match state.reconciler.apply(&payload).await {
        Ok(booking) => Ok(Json(json!({
            "status": "processed",
            "booking_status": booking.status,
        }))),
        // Gateway retries land here once the booking already moved on.
        Err(BookingError::InvalidTransition { from, to }) => {
            tracing::warn!(
                "Ignoring payment webhook for booking {}: {} -> {} not allowed",
                payload.booking_id,
                from,
                to
            );
            Ok(Json(json!({ "status": "ignored" })))
        }
        Err(err) => Err(err.into()),
    }
}

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use futures_util::{Stream, StreamExt};
use nusa_booking::BookingStats;
use nusa_core::{BookingId, CurrentUser, StatusFilter};
use serde::Deserialize;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{info, warn};

use crate::bookings::{to_responses, BookingResponse};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/bookings", get(search_bookings))
        .route("/v1/admin/bookings/stats", get(booking_stats))
        .route("/v1/admin/bookings/stream", get(booking_stream))
        .route("/v1/admin/bookings/{id}", get(get_booking).delete(delete_booking))
        .route("/v1/admin/bookings/{id}/paid", post(mark_paid))
        .route("/v1/admin/bookings/{id}/completed", post(mark_completed))
        .route("/v1/admin/bookings/{id}/cancel", post(cancel_booking))
}

/// GET /v1/admin/bookings?q=&status=
pub async fn search_bookings(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let status: StatusFilter = params
        .status
        .parse()
        .map_err(|e| AppError::BadRequest(format!("{}", e)))?;

    let bookings = state.query.filter(&params.q, status).await?;
    Ok(Json(to_responses(bookings)))
}

/// GET /v1/admin/bookings/stats
pub async fn booking_stats(State(state): State<AppState>) -> Result<Json<BookingStats>, AppError> {
    Ok(Json(state.query.stats().await?))
}

/// GET /v1/admin/bookings/stream
pub async fn booking_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.telemetry.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => Event::default()
                .event(event.event_name())
                .json_data(&event)
                .ok()
                .map(Ok),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!("Admin event stream lagged, {} events skipped", skipped);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /v1/admin/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.query.by_id(&BookingId::from(id)).await?;
    Ok(Json(booking.into()))
}

/// POST /v1/admin/bookings/{id}/paid
pub async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.manager.mark_paid(&BookingId::from(id)).await?;
    Ok(Json(booking.into()))
}

/// POST /v1/admin/bookings/{id}/completed
pub async fn mark_completed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.manager.mark_completed(&BookingId::from(id)).await?;
    Ok(Json(booking.into()))
}

/// POST /v1/admin/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.manager.cancel(&BookingId::from(id)).await?;
    Ok(Json(booking.into()))
}

/// DELETE /v1/admin/bookings/{id}
pub async fn delete_booking(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = BookingId::from(id);
    state.manager.delete_booking(&id).await?;
    info!("Booking {} deleted by admin {}", id, admin.user_id);
    Ok(StatusCode::NO_CONTENT)
}

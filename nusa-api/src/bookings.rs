use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use nusa_booking::{build_roster, Booking, NewBooking, TravelerDetail};
use nusa_catalog::{PartyCategory, PartySize, ProductRef, ProductType};
use nusa_core::{BookingError, BookingId, CurrentUser, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub product_id: Uuid,
    pub product_type: ProductType,
    pub date: NaiveDate,
    pub adult_count: u32,
    pub child_count: u32,
    pub travelers: Vec<TravelerDetail>,
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
pub struct RosterRequest {
    #[serde(default)]
    pub travelers: Vec<TravelerDetail>,
    pub adult_count: u32,
    pub child_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub product_id: Uuid,
    pub product_type: ProductType,
    pub adult_count: u32,
    pub child_count: u32,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub amount: i64,
    pub currency: String,
    pub adult_unit_price: i64,
    pub child_unit_price: i64,
    pub remaining: u32,
    pub fits: bool,
    pub can_add_adult: bool,
    pub can_add_child: bool,
}

/// A booking plus its display status.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub status_label: &'static str,
    pub status_icon: &'static str,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            status_label: booking.status.label(),
            status_icon: booking.status.icon(),
            booking,
        }
    }
}

pub fn to_responses(bookings: Vec<Booking>) -> Vec<BookingResponse> {
    bookings.into_iter().map(BookingResponse::from).collect()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_my_bookings))
        .route("/v1/bookings/roster", post(roster))
        .route("/v1/bookings/quote", post(quote))
        .route("/v1/bookings/{id}", get(get_my_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_my_booking))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let input = NewBooking {
        user_id: user.user_id,
        customer_name: user.name,
        product: ProductRef {
            product_id: req.product_id,
            product_type: req.product_type,
        },
        date: req.date,
        adult_count: req.adult_count,
        child_count: req.child_count,
        travelers: req.travelers,
        payment_method: req.payment_method,
    };

    let booking = state.manager.create_booking(input).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// GET /v1/bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.query.by_user(&user.user_id).await?;
    Ok(Json(to_responses(bookings)))
}

/// GET /v1/bookings/{id}
pub async fn get_my_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = owned_booking(&state, &user, BookingId::from(id)).await?;
    Ok(Json(booking.into()))
}

/// POST /v1/bookings/{id}/cancel
pub async fn cancel_my_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = owned_booking(&state, &user, BookingId::from(id)).await?;
    let cancelled = state.manager.cancel(&booking.id).await?;
    Ok(Json(cancelled.into()))
}

/// POST /v1/bookings/roster
pub async fn roster(
    State(state): State<AppState>,
    Json(req): Json<RosterRequest>,
) -> Result<Json<Vec<TravelerDetail>>, AppError> {
    state
        .manager
        .limits()
        .check_party_size(req.adult_count, req.child_count)
        .map_err(BookingError::from)?;

    Ok(Json(build_roster(&req.travelers, req.adult_count, req.child_count)))
}

/// POST /v1/bookings/quote
pub async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    if req.adult_count < PartySize::MIN_ADULTS {
        return Err(BookingError::from(ValidationError::NoAdult).into());
    }
    state
        .manager
        .limits()
        .check_party_size(req.adult_count, req.child_count)
        .map_err(BookingError::from)?;

    let product_ref = ProductRef {
        product_id: req.product_id,
        product_type: req.product_type,
    };
    let product = state
        .catalog
        .snapshot(&product_ref)
        .await?
        .ok_or_else(|| BookingError::from(ValidationError::ProductNotFound(product_ref.to_string())))?;

    let party = PartySize::new(req.adult_count, req.child_count);
    let pricing = state.manager.pricing();

    Ok(Json(QuoteResponse {
        amount: pricing.quote(party, &product),
        currency: state.manager.limits().currency.clone(),
        adult_unit_price: product.unit_price_adult,
        child_unit_price: pricing.child_unit_price(product.unit_price_adult, product.unit_price_child),
        remaining: product.remaining(),
        fits: party.total() <= product.remaining(),
        can_add_adult: party.can_adjust(PartyCategory::Adult, 1, product.quota, product.booked_count),
        can_add_child: party.can_adjust(PartyCategory::Child, 1, product.quota, product.booked_count),
    }))
}

/// Customers only see their own bookings; anything else reads as missing.
async fn owned_booking(
    state: &AppState,
    user: &CurrentUser,
    id: BookingId,
) -> Result<Booking, AppError> {
    let booking = state.query.by_id(&id).await?;
    if !user.can_access(&booking.user_id) {
        return Err(BookingError::NotFound(id).into());
    }
    Ok(booking)
}

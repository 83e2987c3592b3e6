use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted once a booking has been persisted and its pax reserved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingCreatedEvent {
    pub event_id: Uuid,
    pub booking_id: String,
    pub user_id: String,
    pub product_id: Uuid,
    pub product_type: String,
    pub total_pax: u32,
    pub amount: i64,
    pub currency: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingStatusChangedEvent {
    pub event_id: Uuid,
    pub booking_id: String,
    pub from_status: String,
    pub to_status: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingDeletedEvent {
    pub event_id: Uuid,
    pub booking_id: String,
    pub last_status: String,
    pub released_pax: u32,
    pub timestamp: i64,
}

/// Envelope broadcast to admin dashboards and other listeners.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    Created(BookingCreatedEvent),
    StatusChanged(BookingStatusChangedEvent),
    Deleted(BookingDeletedEvent),
}

impl BookingEvent {
    pub fn booking_id(&self) -> &str {
        match self {
            BookingEvent::Created(e) => &e.booking_id,
            BookingEvent::StatusChanged(e) => &e.booking_id,
            BookingEvent::Deleted(e) => &e.booking_id,
        }
    }

    /// Name used as the SSE `event:` field.
    pub fn event_name(&self) -> &'static str {
        match self {
            BookingEvent::Created(_) => "booking.created",
            BookingEvent::StatusChanged(_) => "booking.status_changed",
            BookingEvent::Deleted(_) => "booking.deleted",
        }
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

use nusa_core::BookingStatus;
use nusa_shared::models::events::{
    now_millis, BookingCreatedEvent, BookingDeletedEvent, BookingEvent, BookingStatusChangedEvent,
};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::Booking;

/// Fan-out of booking lifecycle events to in-process listeners (SSE, audit).
#[derive(Debug, Clone)]
pub struct BookingTelemetry {
    tx: broadcast::Sender<BookingEvent>,
}

impl BookingTelemetry {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.tx.subscribe()
    }

    pub fn booking_created(&self, booking: &Booking) {
        self.publish(BookingEvent::Created(BookingCreatedEvent {
            event_id: Uuid::new_v4(),
            booking_id: booking.id.to_string(),
            user_id: booking.user_id.clone(),
            product_id: booking.product_id,
            product_type: booking.product_type.to_string(),
            total_pax: booking.total_pax,
            amount: booking.amount,
            currency: booking.currency.clone(),
            timestamp: now_millis(),
        }));
    }

    pub fn status_changed(&self, from: BookingStatus, booking: &Booking) {
        self.publish(BookingEvent::StatusChanged(BookingStatusChangedEvent {
            event_id: Uuid::new_v4(),
            booking_id: booking.id.to_string(),
            from_status: from.to_string(),
            to_status: booking.status.to_string(),
            timestamp: now_millis(),
        }));
    }

    pub fn booking_deleted(&self, booking: &Booking, released_pax: u32) {
        self.publish(BookingEvent::Deleted(BookingDeletedEvent {
            event_id: Uuid::new_v4(),
            booking_id: booking.id.to_string(),
            last_status: booking.status.to_string(),
            released_pax,
            timestamp: now_millis(),
        }));
    }

    fn publish(&self, event: BookingEvent) {
        // No subscribers is fine; the event is simply dropped.
        if self.tx.send(event).is_err() {
            debug!("No listeners for booking event");
        }
    }
}

impl Default for BookingTelemetry {
    fn default() -> Self {
        Self::new(256)
    }
}

use async_trait::async_trait;
use nusa_core::{BookingError, BookingId, BookingResult, BookingStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::Booking;
use crate::repository::{BookingRepository, StatusChange};

/// In-process booking store. Transitions run under the write guard, so two
/// competing transitions on one booking are serialized and the loser sees the
/// winner's status.
#[derive(Debug, Default)]
pub struct MemoryBookingStore {
    bookings: RwLock<HashMap<BookingId, Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingStore {
    async fn insert(&self, booking: &Booking) -> BookingResult<()> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(BookingError::Storage(format!("duplicate booking id {}", booking.id)));
        }
        bookings.insert(booking.id.clone(), booking.clone());
        Ok(())
    }

    async fn get(&self, id: &BookingId) -> BookingResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn list(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.bookings.read().await.values().cloned().collect())
    }

    async fn list_by_user(&self, user_id: &str) -> BookingResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn transition(&self, id: &BookingId, to: BookingStatus) -> BookingResult<StatusChange> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(id)
            .ok_or_else(|| BookingError::NotFound(id.clone()))?;

        let from = booking.status;
        if !from.can_transition_to(to) {
            return Err(BookingError::InvalidTransition { from, to });
        }

        booking.apply_status(to);
        Ok(StatusChange {
            from,
            booking: booking.clone(),
        })
    }

    async fn delete(&self, id: &BookingId) -> BookingResult<Booking> {
        self.bookings
            .write()
            .await
            .remove(id)
            .ok_or_else(|| BookingError::NotFound(id.clone()))
    }
}

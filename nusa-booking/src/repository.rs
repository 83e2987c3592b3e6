use async_trait::async_trait;
use nusa_core::{BookingId, BookingResult, BookingStatus};

use crate::models::Booking;

/// Outcome of an accepted status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub from: BookingStatus,
    pub booking: Booking,
}

/// Storage of booking records, one per id.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Stores a new booking. Rejects an id that already exists.
    async fn insert(&self, booking: &Booking) -> BookingResult<()>;

    async fn get(&self, id: &BookingId) -> BookingResult<Option<Booking>>;

    async fn list(&self) -> BookingResult<Vec<Booking>>;

    async fn list_by_user(&self, user_id: &str) -> BookingResult<Vec<Booking>>;

    /// Atomic check-then-set of the status.
    ///
    /// Succeeds only if the stored status may move to `to` at the moment of
    /// the write; otherwise `InvalidTransition` and the record is untouched.
    async fn transition(&self, id: &BookingId, to: BookingStatus) -> BookingResult<StatusChange>;

    /// Removes the record regardless of status and returns it.
    async fn delete(&self, id: &BookingId) -> BookingResult<Booking>;
}

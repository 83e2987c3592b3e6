pub mod events;
pub mod manager;
pub mod memory;
pub mod models;
pub mod payment;
pub mod query;
pub mod repository;
pub mod roster;

pub use events::BookingTelemetry;
pub use manager::{BookingManager, BookingLimits};
pub use memory::MemoryBookingStore;
pub use models::{Booking, NewBooking, TravelerDetail, TravelerType};
pub use payment::PaymentReconciler;
pub use query::{BookingQuery, BookingStats};
pub use repository::{BookingRepository, StatusChange};
pub use roster::build_roster;

pub mod events;

pub use events::{BookingCreatedEvent, BookingDeletedEvent, BookingEvent, BookingStatusChangedEvent};

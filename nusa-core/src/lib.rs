pub mod booking;
pub mod identity;
pub mod payment;

pub use booking::{BookingId, BookingStatus, StatusFilter};
pub use identity::{CurrentUser, Role};

/// Creation-time input problems. Always recoverable by correcting the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a booking needs at least one adult")]
    NoAdult,

    #[error("party of {requested} exceeds the maximum of {max} travelers per booking")]
    InvalidPartySize { requested: u32, max: u32 },

    #[error("traveler roster has {actual} entries, expected {expected}")]
    RosterLength { expected: u32, actual: u32 },

    #[error("traveler #{index} has the wrong type for its position")]
    TravelerTypeMismatch { index: usize },

    #[error("traveler #{index} is missing a full name")]
    MissingTravelerName { index: usize },

    #[error("product not found: {0}")]
    ProductNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Quota limit reached: requested {requested} pax, {remaining} remaining")]
    CapacityExceeded { requested: u32, remaining: u32 },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Payload-free discriminant of [`BookingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    CapacityExceeded,
    InvalidTransition,
    NotFound,
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::CapacityExceeded => "capacity_exceeded",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "storage",
        }
    }
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::Validation(_) => ErrorKind::Validation,
            BookingError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            BookingError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            BookingError::NotFound(_) => ErrorKind::NotFound,
            BookingError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        BookingError::Storage(err.to_string())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinguishable() {
        let errors = [
            BookingError::from(ValidationError::NoAdult),
            BookingError::CapacityExceeded { requested: 2, remaining: 1 },
            BookingError::InvalidTransition {
                from: BookingStatus::Cancelled,
                to: BookingStatus::Completed,
            },
            BookingError::NotFound(BookingId::from("BK-404")),
            BookingError::storage("connection reset"),
        ];

        let kinds: Vec<&str> = errors.iter().map(|e| e.kind().as_str()).collect();
        assert_eq!(
            kinds,
            vec!["validation", "capacity_exceeded", "invalid_transition", "not_found", "storage"]
        );
    }

    #[test]
    fn test_capacity_message_is_actionable() {
        let err = BookingError::CapacityExceeded { requested: 2, remaining: 1 };
        assert_eq!(err.to_string(), "Quota limit reached: requested 2 pax, 1 remaining");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Human-readable booking reference, e.g. `BK-3F9A0C12D4E1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn generate() -> Self {
        let hex: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(12)
            .collect();
        Self(format!("BK-{}", hex.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BookingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Booking lifecycle.
///
/// `Pending -> Paid -> Completed`, with `Pending | Paid -> Cancelled`.
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Paid,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Paid,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    /// States a booking must currently be in to move into `self`.
    pub fn sources(self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[],
            BookingStatus::Paid => &[BookingStatus::Pending],
            BookingStatus::Completed => &[BookingStatus::Paid],
            BookingStatus::Cancelled => &[BookingStatus::Pending, BookingStatus::Paid],
        }
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        next.sources().contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether a booking in this state still counts against product quota.
    pub fn holds_capacity(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Paid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Paid => "Paid",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Display label for dashboards.
    pub fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Waiting for payment",
            BookingStatus::Paid => "Paid",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Icon key for dashboards.
    pub fn icon(self) -> &'static str {
        match self {
            BookingStatus::Pending => "clock",
            BookingStatus::Paid => "credit-card",
            BookingStatus::Completed => "check-circle",
            BookingStatus::Cancelled => "x-circle",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Status restriction applied by booking searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    pub fn matches(self, status: BookingStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        trimmed.parse().map(StatusFilter::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use BookingStatus::*;

        let allowed = [(Pending, Paid), (Paid, Completed), (Pending, Cancelled), (Paid, Cancelled)];

        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in [BookingStatus::Completed, BookingStatus::Cancelled] {
            assert!(from.is_terminal());
            assert!(BookingStatus::ALL.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("paid".parse::<BookingStatus>().unwrap(), BookingStatus::Paid);
        assert_eq!(" CANCELLED ".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!("refunded".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Paid".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(BookingStatus::Paid)
        );
        assert!(StatusFilter::All.matches(BookingStatus::Pending));
        assert!(!StatusFilter::Only(BookingStatus::Paid).matches(BookingStatus::Pending));
    }

    #[test]
    fn test_booking_id_format() {
        let id = BookingId::generate();
        assert!(id.as_str().starts_with("BK-"));
        assert_eq!(id.as_str().len(), 15);
        assert_eq!(id.as_str(), id.as_str().to_uppercase());
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", id));
    }
}

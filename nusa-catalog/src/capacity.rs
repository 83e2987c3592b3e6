//! Party-size gating against a product's remaining quota.
//!
//! Everything here is a pure predicate; callers decide how to surface a
//! rejection to the traveler.

use nusa_core::{BookingError, BookingResult};
use serde::{Deserialize, Serialize};

pub fn remaining(quota: u32, booked_count: u32) -> u32 {
    quota.saturating_sub(booked_count)
}

/// True iff a party of `current_party_size + delta` still fits in
/// `quota - booked_count`. A party can never become negative.
pub fn can_add(current_party_size: u32, delta: i32, quota: u32, booked_count: u32) -> bool {
    let next = i64::from(current_party_size) + i64::from(delta);
    next >= 0 && next <= i64::from(remaining(quota, booked_count))
}

/// Commit-time check of a whole party.
pub fn ensure_fits(total_pax: u32, quota: u32, booked_count: u32) -> BookingResult<()> {
    let remaining = remaining(quota, booked_count);
    if total_pax > remaining {
        return Err(BookingError::CapacityExceeded {
            requested: total_pax,
            remaining,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyCategory {
    Adult,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySize {
    pub adults: u32,
    pub children: u32,
}

impl Default for PartySize {
    fn default() -> Self {
        Self { adults: PartySize::MIN_ADULTS, children: 0 }
    }
}

impl PartySize {
    pub const MIN_ADULTS: u32 = 1;

    pub fn new(adults: u32, children: u32) -> Self {
        Self { adults, children }
    }

    /// Saturates at `u32::MAX`, which no quota can hold.
    pub fn total(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }

    /// Applies `delta` to one category, or `None` if that would break the
    /// per-category floor (adults >= 1, children >= 0).
    pub fn adjusted(self, category: PartyCategory, delta: i32) -> Option<PartySize> {
        let (count, floor) = match category {
            PartyCategory::Adult => (self.adults, PartySize::MIN_ADULTS),
            PartyCategory::Child => (self.children, 0),
        };

        let next = i64::from(count) + i64::from(delta);
        if next < i64::from(floor) {
            return None;
        }
        let next = u32::try_from(next).ok()?;

        Some(match category {
            PartyCategory::Adult => PartySize { adults: next, ..self },
            PartyCategory::Child => PartySize { children: next, ..self },
        })
    }

    /// Floors and remaining capacity both allow the change.
    pub fn can_adjust(self, category: PartyCategory, delta: i32, quota: u32, booked_count: u32) -> bool {
        self.adjusted(category, delta).is_some()
            && can_add(self.total(), delta, quota, booked_count)
    }
}

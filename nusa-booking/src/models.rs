use chrono::{DateTime, NaiveDate, Utc};
use nusa_catalog::{ProductRef, ProductSnapshot, ProductType};
use nusa_core::{BookingId, BookingStatus};
use nusa_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TravelerType {
    Adult,
    Child,
}

impl TravelerType {
    pub fn default_title(self) -> &'static str {
        match self {
            TravelerType::Adult => "Mr",
            TravelerType::Child => "Mstr",
        }
    }
}

/// One traveler slot on a booking. Owned by its booking, no identity of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TravelerDetail {
    #[serde(rename = "type")]
    pub traveler_type: TravelerType,
    pub title: String,
    pub full_name: Masked<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
}

impl TravelerDetail {
    /// Fresh slot with the default title and no name.
    pub fn blank(traveler_type: TravelerType) -> Self {
        Self {
            traveler_type,
            title: traveler_type.default_title().to_string(),
            full_name: Masked(String::new()),
            age: None,
        }
    }

    pub fn adult(full_name: &str) -> Self {
        Self {
            full_name: Masked::from(full_name),
            ..Self::blank(TravelerType::Adult)
        }
    }

    pub fn child(full_name: &str, age: Option<u8>) -> Self {
        Self {
            full_name: Masked::from(full_name),
            age,
            ..Self::blank(TravelerType::Child)
        }
    }
}

/// Checkout submission, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub user_id: String,
    pub customer_name: String,
    pub product: ProductRef,
    pub date: NaiveDate,
    pub adult_count: u32,
    pub child_count: u32,
    pub travelers: Vec<TravelerDetail>,
    pub payment_method: String,
}

/// A committed booking.
///
/// Product fields and `amount` are copied at creation and never follow later
/// catalog edits. Only `status`, `updated_at` and `version` change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: String,
    pub customer_name: String,
    pub product_id: Uuid,
    pub product_type: ProductType,
    pub product_name: String,
    pub product_image: Option<String>,
    pub location: Option<String>,
    /// Trip or event date.
    pub date: NaiveDate,
    pub amount: i64,
    pub currency: String,
    pub adult_count: u32,
    pub child_count: u32,
    pub total_pax: u32,
    pub travelers: Vec<TravelerDetail>,
    pub payment_method: String,
    pub status: BookingStatus,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Builds a `Pending` booking from an already validated submission.
    pub fn pending(
        input: NewBooking,
        product: &ProductSnapshot,
        amount: i64,
        currency: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::generate(),
            user_id: input.user_id,
            customer_name: input.customer_name,
            product_id: product.product_id,
            product_type: product.product_type,
            product_name: product.title.clone(),
            product_image: product.image_url.clone(),
            location: product.location.clone(),
            date: input.date,
            amount,
            currency: currency.to_string(),
            adult_count: input.adult_count,
            child_count: input.child_count,
            total_pax: input.adult_count + input.child_count,
            travelers: input.travelers,
            payment_method: input.payment_method,
            status: BookingStatus::Pending,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn product_ref(&self) -> ProductRef {
        ProductRef {
            product_id: self.product_id,
            product_type: self.product_type,
        }
    }

    /// Moves to `next` without checking the transition table; stores call this
    /// only after the check, under their write guard.
    pub fn apply_status(&mut self, next: BookingStatus) {
        self.status = next;
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match on id, customer name and product name.
    /// `needle` must already be lower-cased.
    pub fn matches_term(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.id.as_str().to_lowercase().contains(needle)
            || self.customer_name.to_lowercase().contains(needle)
            || self.product_name.to_lowercase().contains(needle)
    }
}

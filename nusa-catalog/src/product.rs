use async_trait::async_trait;
use nusa_core::BookingResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Bookable product kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProductType {
    Package,
    Event,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Package => "Package",
            ProductType::Event => "Event",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "package" => Ok(ProductType::Package),
            "event" => Ok(ProductType::Event),
            other => Err(format!("unknown product type: {}", other)),
        }
    }
}

/// Key of a catalog entry: ids are only unique within a product type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProductRef {
    pub product_id: Uuid,
    pub product_type: ProductType,
}

impl ProductRef {
    pub fn package(product_id: Uuid) -> Self {
        Self { product_id, product_type: ProductType::Package }
    }

    pub fn event(product_id: Uuid) -> Self {
        Self { product_id, product_type: ProductType::Event }
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.product_type, self.product_id)
    }
}

/// Read-only view of a product as the booking core consumes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub product_type: ProductType,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Smallest currency unit.
    pub unit_price_adult: i64,
    #[serde(default)]
    pub unit_price_child: Option<i64>,
    /// Maximum pax ever bookable for this product instance.
    pub quota: u32,
    #[serde(default)]
    pub booked_count: u32,
}

impl ProductSnapshot {
    pub fn product_ref(&self) -> ProductRef {
        ProductRef {
            product_id: self.product_id,
            product_type: self.product_type,
        }
    }

    pub fn remaining(&self) -> u32 {
        crate::capacity::remaining(self.quota, self.booked_count)
    }
}

/// Product catalog collaborator.
///
/// `reserve` and `release` are the only writes the booking core performs on a
/// product; implementations must make `reserve` an atomic
/// compare-and-increment against `quota`.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn snapshot(&self, product: &ProductRef) -> BookingResult<Option<ProductSnapshot>>;

    /// Adds `pax` to `booked_count` iff it stays within `quota`.
    ///
    /// Fails with `CapacityExceeded` (state untouched) otherwise, or a
    /// `ProductNotFound` validation error for unknown products.
    async fn reserve(&self, product: &ProductRef, pax: u32) -> BookingResult<ProductSnapshot>;

    /// Returns `pax` to the product. Releasing against a product that no
    /// longer exists is a no-op.
    async fn release(&self, product: &ProductRef, pax: u32) -> BookingResult<()>;
}

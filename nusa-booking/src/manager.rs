use nusa_catalog::{capacity, PricingCalculator, ProductCatalog};
use nusa_core::{BookingError, BookingId, BookingResult, BookingStatus, ValidationError};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::events::BookingTelemetry;
use crate::models::{Booking, NewBooking};
use crate::repository::BookingRepository;
use crate::roster;

#[derive(Debug, Clone)]
pub struct BookingLimits {
    /// Upper bound on travelers per booking, independent of product quota.
    pub max_party_size: u32,
    pub currency: String,
}

impl BookingLimits {
    /// Total pax for the given counts, rejected when above `max_party_size`.
    pub fn check_party_size(&self, adult_count: u32, child_count: u32) -> Result<u32, ValidationError> {
        let max = self.max_party_size;
        adult_count
            .checked_add(child_count)
            .filter(|total| *total <= max)
            .ok_or(ValidationError::InvalidPartySize {
                requested: adult_count.saturating_add(child_count),
                max,
            })
    }
}

impl Default for BookingLimits {
    fn default() -> Self {
        Self {
            max_party_size: 50,
            currency: "IDR".to_string(),
        }
    }
}

/// Creates bookings and drives them through their lifecycle.
///
/// Capacity is reserved on the catalog before the booking is stored and given
/// back on cancellation, so `booked_count` always matches the pax of bookings
/// still holding capacity.
pub struct BookingManager {
    bookings: Arc<dyn BookingRepository>,
    catalog: Arc<dyn ProductCatalog>,
    pricing: PricingCalculator,
    telemetry: BookingTelemetry,
    limits: BookingLimits,
}

impl BookingManager {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        catalog: Arc<dyn ProductCatalog>,
        pricing: PricingCalculator,
        telemetry: BookingTelemetry,
        limits: BookingLimits,
    ) -> Self {
        Self {
            bookings,
            catalog,
            pricing,
            telemetry,
            limits,
        }
    }

    pub fn repository(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }

    pub fn telemetry(&self) -> &BookingTelemetry {
        &self.telemetry
    }

    pub fn limits(&self) -> &BookingLimits {
        &self.limits
    }

    pub fn pricing(&self) -> &PricingCalculator {
        &self.pricing
    }

    /// Validates, prices and stores a new `Pending` booking.
    ///
    /// On any error nothing is stored and the product's `booked_count` is left
    /// as it was.
    pub async fn create_booking(&self, input: NewBooking) -> BookingResult<Booking> {
        let total_pax = self.validate(&input).map_err(|err| {
            warn!("Booking for {} rejected: {}", input.product, err);
            BookingError::from(err)
        })?;

        let product_ref = input.product;
        let product = self
            .catalog
            .snapshot(&product_ref)
            .await?
            .ok_or_else(|| ValidationError::ProductNotFound(product_ref.to_string()))?;

        if let Err(err) = capacity::ensure_fits(total_pax, product.quota, product.booked_count) {
            warn!("Booking for {} rejected: {}", product_ref, err);
            return Err(err);
        }

        let amount = self.pricing.price(
            input.adult_count,
            input.child_count,
            product.unit_price_adult,
            product.unit_price_child,
        );

        // The snapshot check above is advisory; this is the atomic one.
        self.catalog.reserve(&product_ref, total_pax).await?;

        let booking = Booking::pending(input, &product, amount, &self.limits.currency);
        if let Err(err) = self.bookings.insert(&booking).await {
            error!("Failed to store booking {}: {}", booking.id, err);
            if let Err(release_err) = self.catalog.release(&product_ref, total_pax).await {
                error!("Failed to return {} pax to {}: {}", total_pax, product_ref, release_err);
            }
            return Err(err);
        }

        info!(
            "Booking {} created for {} ({} pax, amount {} {})",
            booking.id, product_ref, total_pax, booking.amount, booking.currency
        );
        self.telemetry.booking_created(&booking);
        Ok(booking)
    }

    /// Pending -> Paid
    pub async fn mark_paid(&self, id: &BookingId) -> BookingResult<Booking> {
        self.transition(id, BookingStatus::Paid).await
    }

    /// Paid -> Completed
    pub async fn mark_completed(&self, id: &BookingId) -> BookingResult<Booking> {
        self.transition(id, BookingStatus::Completed).await
    }

    /// Pending | Paid -> Cancelled, returning the booking's pax to the product.
    pub async fn cancel(&self, id: &BookingId) -> BookingResult<Booking> {
        let booking = self.transition(id, BookingStatus::Cancelled).await?;
        self.release_capacity(&booking).await;
        Ok(booking)
    }

    /// Administrative removal, whatever the status.
    pub async fn delete_booking(&self, id: &BookingId) -> BookingResult<()> {
        let booking = self.bookings.delete(id).await?;

        let released = if booking.status.holds_capacity() {
            self.release_capacity(&booking).await
        } else {
            0
        };

        info!("Booking {} deleted (was {})", booking.id, booking.status);
        self.telemetry.booking_deleted(&booking, released);
        Ok(())
    }

    fn validate(&self, input: &NewBooking) -> Result<u32, ValidationError> {
        if input.adult_count < 1 {
            return Err(ValidationError::NoAdult);
        }

        let total_pax = self
            .limits
            .check_party_size(input.adult_count, input.child_count)?;

        roster::validate_roster(&input.travelers, input.adult_count, input.child_count)?;
        Ok(total_pax)
    }

    async fn transition(&self, id: &BookingId, to: BookingStatus) -> BookingResult<Booking> {
        match self.bookings.transition(id, to).await {
            Ok(change) => {
                info!("Booking {} moved {} -> {}", id, change.from, to);
                self.telemetry.status_changed(change.from, &change.booking);
                Ok(change.booking)
            }
            Err(err) => {
                warn!("Booking {} could not move to {}: {}", id, to, err);
                Err(err)
            }
        }
    }

    /// Returns the number of pax given back.
    async fn release_capacity(&self, booking: &Booking) -> u32 {
        let product = booking.product_ref();
        match self.catalog.release(&product, booking.total_pax).await {
            Ok(()) => booking.total_pax,
            Err(err) => {
                error!(
                    "Booking {} left {} pax held on {}: {}",
                    booking.id, booking.total_pax, product, err
                );
                0
            }
        }
    }
}

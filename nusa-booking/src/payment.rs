use nusa_core::payment::PaymentNotification;
use nusa_core::{BookingError, BookingResult, BookingStatus};
use std::sync::Arc;
use tracing::{info, warn};

use crate::manager::BookingManager;
use crate::models::Booking;
use crate::repository::BookingRepository;

/// Applies asynchronous payment-gateway outcomes to bookings.
pub struct PaymentReconciler {
    manager: Arc<BookingManager>,
}

impl PaymentReconciler {
    pub fn new(manager: Arc<BookingManager>) -> Self {
        Self { manager }
    }

    /// `succeeded` marks the booking paid; `failed` and `canceled` cancel it
    /// and give its pax back.
    pub async fn apply(&self, notification: &PaymentNotification) -> BookingResult<Booking> {
        info!(
            "Payment notification for {}: {:?} (ref {})",
            notification.booking_id,
            notification.status,
            notification.reference.as_deref().unwrap_or("-")
        );

        let id = &notification.booking_id;
        match notification.status.target_status() {
            BookingStatus::Paid => self.manager.mark_paid(id).await,
            BookingStatus::Cancelled => self.manager.cancel(id).await,
            other => {
                let current = self
                    .manager
                    .repository()
                    .get(id)
                    .await?
                    .ok_or_else(|| BookingError::NotFound(id.clone()))?;
                warn!("Payment notification cannot move booking {} to {}", id, other);
                Err(BookingError::InvalidTransition {
                    from: current.status,
                    to: other,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BookingTelemetry;
    use crate::manager::BookingLimits;
    use crate::memory::MemoryBookingStore;
    use crate::models::{NewBooking, TravelerDetail};
    use crate::repository::BookingRepository;
    use chrono::NaiveDate;
    use nusa_catalog::{MemoryCatalog, PricingCalculator, ProductCatalog, ProductSnapshot, ProductType};
    use nusa_core::payment::GatewayStatus;
    use nusa_core::ErrorKind;
    use uuid::Uuid;

    async fn setup() -> (PaymentReconciler, Arc<BookingManager>, Arc<MemoryCatalog>, Booking) {
        let product = ProductSnapshot {
            product_id: Uuid::new_v4(),
            product_type: ProductType::Event,
            title: "Bali Arts Festival".to_string(),
            image_url: None,
            location: Some("Denpasar".to_string()),
            unit_price_adult: 200_000,
            unit_price_child: None,
            quota: 4,
            booked_count: 0,
        };
        let key = product.product_ref();
        let catalog = Arc::new(MemoryCatalog::with_products([product]));
        let manager = Arc::new(BookingManager::new(
            Arc::new(MemoryBookingStore::new()),
            catalog.clone(),
            PricingCalculator::default(),
            BookingTelemetry::default(),
            BookingLimits::default(),
        ));

        let booking = manager
            .create_booking(NewBooking {
                user_id: "user-citra".to_string(),
                customer_name: "Citra".to_string(),
                product: key,
                date: NaiveDate::from_ymd_opt(2026, 6, 14).unwrap(),
                adult_count: 1,
                child_count: 1,
                travelers: vec![TravelerDetail::adult("Citra"), TravelerDetail::child("Dimas", Some(9))],
                payment_method: "E-Wallet".to_string(),
            })
            .await
            .unwrap();

        (PaymentReconciler::new(manager.clone()), manager, catalog, booking)
    }

    fn notification(booking: &Booking, status: GatewayStatus) -> PaymentNotification {
        PaymentNotification {
            booking_id: booking.id.clone(),
            status,
            reference: Some("pay_123".to_string()),
        }
    }

    #[tokio::test]
    async fn test_success_marks_paid() {
        let (reconciler, _, _, booking) = setup().await;
        assert_eq!(booking.amount, 360_000);

        let paid = reconciler.apply(&notification(&booking, GatewayStatus::Succeeded)).await.unwrap();
        assert_eq!(paid.status, BookingStatus::Paid);

        // gateway retry of the same outcome is rejected, state unchanged
        let err = reconciler
            .apply(&notification(&booking, GatewayStatus::Succeeded))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    }

    #[tokio::test]
    async fn test_failure_cancels_and_releases() {
        let (reconciler, manager, catalog, booking) = setup().await;

        let cancelled = reconciler.apply(&notification(&booking, GatewayStatus::Failed)).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let product = catalog.snapshot(&booking.product_ref()).await.unwrap().unwrap();
        assert_eq!(product.booked_count, 0);
        assert_eq!(
            manager.repository().get(&booking.id).await.unwrap().unwrap().status,
            BookingStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_outcomes_map_to_their_own_transitions() {
        let (reconciler, _, catalog, booking) = setup().await;

        reconciler.apply(&notification(&booking, GatewayStatus::Succeeded)).await.unwrap();
        let cancelled = reconciler.apply(&notification(&booking, GatewayStatus::Canceled)).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let product = catalog.snapshot(&booking.product_ref()).await.unwrap().unwrap();
        assert_eq!(product.booked_count, 0);

        let err = reconciler
            .apply(&notification(&booking, GatewayStatus::Succeeded))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BookingError::InvalidTransition {
                from: BookingStatus::Cancelled,
                to: BookingStatus::Paid,
            }
        );
    }
}

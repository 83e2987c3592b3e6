use std::sync::Arc;

use nusa_booking::{
    BookingLimits, BookingManager, BookingQuery, BookingRepository, BookingTelemetry,
    PaymentReconciler,
};
use nusa_catalog::pricing::PricingConfig;
use nusa_catalog::{PricingCalculator, ProductCatalog};

#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing key for session tokens.
    pub secret: String,
    pub expiration: u64,
    /// Shared with the payment gateway only. Never the signing key.
    pub webhook_secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<BookingManager>,
    pub query: BookingQuery,
    pub reconciler: Arc<PaymentReconciler>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub telemetry: BookingTelemetry,
    pub auth: AuthConfig,
}

impl AppState {
    /// Wires the booking core over the given stores.
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        catalog: Arc<dyn ProductCatalog>,
        pricing: PricingConfig,
        limits: BookingLimits,
        telemetry: BookingTelemetry,
        auth: AuthConfig,
    ) -> Self {
        let manager = Arc::new(BookingManager::new(
            bookings.clone(),
            catalog.clone(),
            PricingCalculator::new(pricing),
            telemetry.clone(),
            limits,
        ));

        Self {
            query: BookingQuery::new(bookings),
            reconciler: Arc::new(PaymentReconciler::new(manager.clone())),
            manager,
            catalog,
            telemetry,
            auth,
        }
    }
}

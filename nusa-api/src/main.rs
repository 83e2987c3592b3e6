use std::net::SocketAddr;
use std::sync::Arc;

use nusa_api::{app, AppState, AuthConfig};
use nusa_booking::{BookingRepository, BookingTelemetry, MemoryBookingStore};
use nusa_catalog::{MemoryCatalog, ProductCatalog};
use nusa_store::{app_config::Config, DbClient, PgBookingRepository, PgCatalog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nusa_api=debug,nusa_booking=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Nusa booking API on port {}", config.server.port);

    let (bookings, catalog): (Arc<dyn BookingRepository>, Arc<dyn ProductCatalog>) =
        match &config.database {
            Some(database) => {
                let db = DbClient::new(&database.url, database.max_connections).await?;
                db.migrate().await?;

                let catalog = PgCatalog::new(db.pool.clone());
                for product in &config.catalog.products {
                    catalog.upsert_product(product).await?;
                }
                tracing::info!("Seeded {} catalog products", config.catalog.products.len());

                let bookings: Arc<dyn BookingRepository> =
                    Arc::new(PgBookingRepository::new(db.pool.clone()));
                let catalog: Arc<dyn ProductCatalog> = Arc::new(catalog);
                (bookings, catalog)
            }
            None => {
                tracing::warn!("No database configured, bookings are kept in memory");
                let bookings: Arc<dyn BookingRepository> = Arc::new(MemoryBookingStore::new());
                let catalog: Arc<dyn ProductCatalog> =
                    Arc::new(MemoryCatalog::with_products(config.catalog.products.clone()));
                (bookings, catalog)
            }
        };

    let app_state = AppState::new(
        bookings,
        catalog,
        config.booking.pricing(),
        config.booking.limits(),
        BookingTelemetry::new(config.events.channel_capacity),
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
            webhook_secret: config.payments.webhook_secret.clone(),
        },
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

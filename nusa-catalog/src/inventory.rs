use async_trait::async_trait;
use nusa_core::{BookingResult, ValidationError};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::capacity;
use crate::product::{ProductCatalog, ProductRef, ProductSnapshot};

/// In-process product catalog.
///
/// Every reservation runs under the map's write guard, so the capacity check
/// and the `booked_count` increment can never interleave with another writer.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RwLock<HashMap<ProductRef, ProductSnapshot>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = ProductSnapshot>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.product_ref(), product))
            .collect();
        Self {
            products: RwLock::new(products),
        }
    }

    /// Inserts or replaces a product.
    pub async fn put_product(&self, product: ProductSnapshot) {
        self.products
            .write()
            .await
            .insert(product.product_ref(), product);
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductCatalog for MemoryCatalog {
    async fn snapshot(&self, product: &ProductRef) -> BookingResult<Option<ProductSnapshot>> {
        Ok(self.products.read().await.get(product).cloned())
    }

    async fn reserve(&self, product: &ProductRef, pax: u32) -> BookingResult<ProductSnapshot> {
        let mut products = self.products.write().await;
        let item = products
            .get_mut(product)
            .ok_or_else(|| ValidationError::ProductNotFound(product.to_string()))?;

        if let Err(err) = capacity::ensure_fits(pax, item.quota, item.booked_count) {
            warn!("Reservation of {} pax on {} rejected: {}", pax, product, err);
            return Err(err);
        }

        item.booked_count += pax;
        debug!("Reserved {} pax on {} ({}/{})", pax, product, item.booked_count, item.quota);
        Ok(item.clone())
    }

    async fn release(&self, product: &ProductRef, pax: u32) -> BookingResult<()> {
        let mut products = self.products.write().await;
        match products.get_mut(product) {
            Some(item) => {
                item.booked_count = item.booked_count.saturating_sub(pax);
                debug!("Released {} pax on {} ({}/{})", pax, product, item.booked_count, item.quota);
            }
            None => debug!("Release of {} pax ignored, {} no longer in catalog", pax, product),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductType;
    use nusa_core::BookingError;
    use std::sync::Arc;
    use uuid::Uuid;

    fn product(quota: u32, booked_count: u32) -> ProductSnapshot {
        ProductSnapshot {
            product_id: Uuid::new_v4(),
            product_type: ProductType::Event,
            title: "Festival Budaya Bahari".to_string(),
            image_url: None,
            location: Some("Berau".to_string()),
            unit_price_adult: 150_000,
            unit_price_child: None,
            quota,
            booked_count,
        }
    }

    #[tokio::test]
    async fn test_reserve_release_lifecycle() {
        let snapshot = product(10, 0);
        let key = snapshot.product_ref();
        let catalog = MemoryCatalog::with_products([snapshot]);

        let after = catalog.reserve(&key, 4).await.unwrap();
        assert_eq!(after.booked_count, 4);

        catalog.release(&key, 4).await.unwrap();
        let current = catalog.snapshot(&key).await.unwrap().unwrap();
        assert_eq!(current.booked_count, 0);
    }

    #[tokio::test]
    async fn test_reserve_rejects_over_quota_without_mutation() {
        let snapshot = product(5, 4);
        let key = snapshot.product_ref();
        let catalog = MemoryCatalog::with_products([snapshot]);

        let err = catalog.reserve(&key, 2).await.unwrap_err();
        assert_eq!(err, BookingError::CapacityExceeded { requested: 2, remaining: 1 });
        assert_eq!(catalog.snapshot(&key).await.unwrap().unwrap().booked_count, 4);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let catalog = MemoryCatalog::new();
        let key = ProductRef::package(Uuid::new_v4());

        let err = catalog.reserve(&key, 1).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(ValidationError::ProductNotFound(_))));
        assert!(catalog.release(&key, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_reservations_never_overbook() {
        let snapshot = product(5, 0);
        let key = snapshot.product_ref();
        let catalog = Arc::new(MemoryCatalog::with_products([snapshot]));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move { catalog.reserve(&key, 1).await }));
        }

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                granted += 1;
            }
        }

        assert_eq!(granted, 5);
        assert_eq!(catalog.snapshot(&key).await.unwrap().unwrap().booked_count, 5);
    }
}

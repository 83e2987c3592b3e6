use async_trait::async_trait;
use nusa_catalog::{ProductCatalog, ProductRef, ProductSnapshot};
use nusa_core::{BookingError, BookingResult, ValidationError};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "id, product_type, title, image_url, location, unit_price_adult, \
     unit_price_child, quota, booked_count";

/// Products table backed catalog. Capacity changes are single conditional
/// statements so concurrent reservations cannot overshoot the quota.
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or refreshes a product's descriptive fields and quota.
    /// `booked_count` of an existing row is left alone.
    pub async fn upsert_product(&self, product: &ProductSnapshot) -> BookingResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, product_type, title, image_url, location,
                unit_price_adult, unit_price_child, quota, booked_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id, product_type) DO UPDATE SET
                title = EXCLUDED.title,
                image_url = EXCLUDED.image_url,
                location = EXCLUDED.location,
                unit_price_adult = EXCLUDED.unit_price_adult,
                unit_price_child = EXCLUDED.unit_price_child,
                quota = EXCLUDED.quota
            "#,
        )
        .bind(product.product_id)
        .bind(product.product_type.as_str())
        .bind(&product.title)
        .bind(&product.image_url)
        .bind(&product.location)
        .bind(product.unit_price_adult)
        .bind(product.unit_price_child)
        .bind(to_i32(product.quota)?)
        .bind(to_i32(product.booked_count)?)
        .execute(&self.pool)
        .await
        .map_err(BookingError::storage)?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    product_type: String,
    title: String,
    image_url: Option<String>,
    location: Option<String>,
    unit_price_adult: i64,
    unit_price_child: Option<i64>,
    quota: i32,
    booked_count: i32,
}

impl TryFrom<ProductRow> for ProductSnapshot {
    type Error = BookingError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(ProductSnapshot {
            product_id: row.id,
            product_type: row.product_type.parse().map_err(BookingError::storage)?,
            title: row.title,
            image_url: row.image_url,
            location: row.location,
            unit_price_adult: row.unit_price_adult,
            unit_price_child: row.unit_price_child,
            quota: u32::try_from(row.quota).map_err(BookingError::storage)?,
            booked_count: u32::try_from(row.booked_count).map_err(BookingError::storage)?,
        })
    }
}

fn to_i32(value: u32) -> BookingResult<i32> {
    i32::try_from(value).map_err(BookingError::storage)
}

#[async_trait]
impl ProductCatalog for PgCatalog {
    async fn snapshot(&self, product: &ProductRef) -> BookingResult<Option<ProductSnapshot>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1 AND product_type = $2",
            PRODUCT_COLUMNS
        ))
        .bind(product.product_id)
        .bind(product.product_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(BookingError::storage)?;

        row.map(ProductSnapshot::try_from).transpose()
    }

    async fn reserve(&self, product: &ProductRef, pax: u32) -> BookingResult<ProductSnapshot> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET booked_count = booked_count + $3 \
             WHERE id = $1 AND product_type = $2 AND booked_count + $3 <= quota \
             RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(product.product_id)
        .bind(product.product_type.as_str())
        .bind(to_i32(pax)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(BookingError::storage)?;

        if let Some(row) = row {
            return ProductSnapshot::try_from(row);
        }

        // No row updated: either the product is gone or it is full.
        match self.snapshot(product).await? {
            Some(current) => {
                warn!(
                    "Reservation of {} pax rejected for {}: {} remaining",
                    pax,
                    product,
                    current.remaining()
                );
                Err(BookingError::CapacityExceeded {
                    requested: pax,
                    remaining: current.remaining(),
                })
            }
            None => Err(ValidationError::ProductNotFound(product.to_string()).into()),
        }
    }

    async fn release(&self, product: &ProductRef, pax: u32) -> BookingResult<()> {
        sqlx::query(
            "UPDATE products SET booked_count = GREATEST(booked_count - $3, 0) \
             WHERE id = $1 AND product_type = $2",
        )
        .bind(product.product_id)
        .bind(product.product_type.as_str())
        .bind(to_i32(pax)?)
        .execute(&self.pool)
        .await
        .map_err(BookingError::storage)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nusa_catalog::ProductType;

    #[test]
    fn test_row_maps_to_snapshot() {
        let row = ProductRow {
            id: Uuid::new_v4(),
            product_type: "Event".to_string(),
            title: "Jazz Gunung".to_string(),
            image_url: None,
            location: Some("Bromo".to_string()),
            unit_price_adult: 750_000,
            unit_price_child: None,
            quota: 100,
            booked_count: 40,
        };

        let snapshot = ProductSnapshot::try_from(row).unwrap();
        assert_eq!(snapshot.product_type, ProductType::Event);
        assert_eq!(snapshot.remaining(), 60);
    }

    #[test]
    fn test_unknown_product_type_is_storage_error() {
        let row = ProductRow {
            id: Uuid::new_v4(),
            product_type: "Cruise".to_string(),
            title: "Komodo Liveaboard".to_string(),
            image_url: None,
            location: None,
            unit_price_adult: 1,
            unit_price_child: None,
            quota: 1,
            booked_count: 0,
        };

        assert!(matches!(
            ProductSnapshot::try_from(row),
            Err(BookingError::Storage(_))
        ));
    }
}

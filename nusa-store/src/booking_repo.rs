use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use nusa_booking::{Booking, BookingRepository, StatusChange, TravelerDetail};
use nusa_core::{BookingError, BookingId, BookingResult, BookingStatus};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, user_id, customer_name, product_id, product_type, product_name, \
     product_image, location, trip_date, amount, currency, adult_count, child_count, total_pax, \
     travelers, payment_method, status, version, created_at, updated_at";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: String,
    user_id: String,
    customer_name: String,
    product_id: Uuid,
    product_type: String,
    product_name: String,
    product_image: Option<String>,
    location: Option<String>,
    trip_date: NaiveDate,
    amount: i64,
    currency: String,
    adult_count: i32,
    child_count: i32,
    total_pax: i32,
    travelers: Value,
    payment_method: String,
    status: String,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = BookingError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let travelers: Vec<TravelerDetail> =
            serde_json::from_value(row.travelers).map_err(BookingError::storage)?;

        Ok(Booking {
            id: BookingId::from(row.id),
            user_id: row.user_id,
            customer_name: row.customer_name,
            product_id: row.product_id,
            product_type: row.product_type.parse().map_err(BookingError::storage)?,
            product_name: row.product_name,
            product_image: row.product_image,
            location: row.location,
            date: row.trip_date,
            amount: row.amount,
            currency: row.currency,
            adult_count: to_u32(row.adult_count)?,
            child_count: to_u32(row.child_count)?,
            total_pax: to_u32(row.total_pax)?,
            travelers,
            payment_method: row.payment_method,
            status: row.status.parse().map_err(BookingError::storage)?,
            version: u64::try_from(row.version).map_err(BookingError::storage)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn to_u32(value: i32) -> BookingResult<u32> {
    u32::try_from(value).map_err(BookingError::storage)
}

fn to_i32(value: u32) -> BookingResult<i32> {
    i32::try_from(value).map_err(BookingError::storage)
}

fn rows_to_bookings(rows: Vec<BookingRow>) -> BookingResult<Vec<Booking>> {
    rows.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> BookingResult<()> {
        let travelers = serde_json::to_value(&booking.travelers).map_err(BookingError::storage)?;

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, user_id, customer_name, product_id, product_type, product_name,
                product_image, location, trip_date, amount, currency, adult_count,
                child_count, total_pax, travelers, payment_method, status, version,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(booking.id.as_str())
        .bind(&booking.user_id)
        .bind(&booking.customer_name)
        .bind(booking.product_id)
        .bind(booking.product_type.as_str())
        .bind(&booking.product_name)
        .bind(&booking.product_image)
        .bind(&booking.location)
        .bind(booking.date)
        .bind(booking.amount)
        .bind(&booking.currency)
        .bind(to_i32(booking.adult_count)?)
        .bind(to_i32(booking.child_count)?)
        .bind(to_i32(booking.total_pax)?)
        .bind(travelers)
        .bind(&booking.payment_method)
        .bind(booking.status.as_str())
        .bind(i64::try_from(booking.version).map_err(BookingError::storage)?)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                BookingError::Storage(format!("booking {} already exists", booking.id))
            }
            other => BookingError::storage(other),
        })?;

        Ok(())
    }

    async fn get(&self, id: &BookingId) -> BookingResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(BookingError::storage)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list(&self) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC, id",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(BookingError::storage)?;

        rows_to_bookings(rows)
    }

    async fn list_by_user(&self, user_id: &str) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC, id",
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(BookingError::storage)?;

        rows_to_bookings(rows)
    }

    async fn transition(&self, id: &BookingId, to: BookingStatus) -> BookingResult<StatusChange> {
        let mut tx = self.pool.begin().await.map_err(BookingError::storage)?;

        // Row lock serializes concurrent transitions of the same booking.
        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(BookingError::storage)?;

        let from: BookingStatus = match current {
            Some(status) => status.parse().map_err(BookingError::storage)?,
            None => return Err(BookingError::NotFound(id.clone())),
        };

        if !from.can_transition_to(to) {
            // Dropping the transaction rolls it back and frees the lock.
            return Err(BookingError::InvalidTransition { from, to });
        }

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = $2, version = version + 1, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(id.as_str())
        .bind(to.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(BookingError::storage)?;

        tx.commit().await.map_err(BookingError::storage)?;

        Ok(StatusChange {
            from,
            booking: Booking::try_from(row)?,
        })
    }

    async fn delete(&self, id: &BookingId) -> BookingResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "DELETE FROM bookings WHERE id = $1 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(BookingError::storage)?;

        match row {
            Some(row) => Booking::try_from(row),
            None => Err(BookingError::NotFound(id.clone())),
        }
    }
}

use nusa_core::{BookingError, BookingId, BookingResult, BookingStatus, StatusFilter};
use serde::Serialize;
use std::cmp::Reverse;
use std::sync::Arc;

use crate::models::Booking;
use crate::repository::BookingRepository;

/// Read-only views over the booking collection for customer and admin screens.
#[derive(Clone)]
pub struct BookingQuery {
    bookings: Arc<dyn BookingRepository>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub paid: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Sum of `amount` over Paid and Completed bookings.
    pub revenue: i64,
}

impl BookingQuery {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// A user's bookings, most recent first.
    pub async fn by_user(&self, user_id: &str) -> BookingResult<Vec<Booking>> {
        let mut bookings = self.bookings.list_by_user(user_id).await?;
        sort_recent_first(&mut bookings);
        Ok(bookings)
    }

    pub async fn filter(&self, term: &str, status: StatusFilter) -> BookingResult<Vec<Booking>> {
        let bookings = self.bookings.list().await?;
        Ok(filter_bookings(bookings, term, status))
    }

    pub async fn by_id(&self, id: &BookingId) -> BookingResult<Booking> {
        self.bookings
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.clone()))
    }

    pub async fn stats(&self) -> BookingResult<BookingStats> {
        let bookings = self.bookings.list().await?;
        Ok(summarize(&bookings))
    }
}

/// Bookings whose id, customer name or product name contains `term`
/// (case-insensitive) and whose status passes `status`, most recent first.
pub fn filter_bookings(bookings: Vec<Booking>, term: &str, status: StatusFilter) -> Vec<Booking> {
    let needle = term.trim().to_lowercase();
    let mut matched: Vec<Booking> = bookings
        .into_iter()
        .filter(|b| status.matches(b.status) && b.matches_term(&needle))
        .collect();
    sort_recent_first(&mut matched);
    matched
}

/// Newest `created_at` first; ties broken by id so output is stable.
pub fn sort_recent_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        Reverse(a.created_at)
            .cmp(&Reverse(b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub fn summarize(bookings: &[Booking]) -> BookingStats {
    bookings.iter().fold(BookingStats::default(), |mut stats, booking| {
        stats.total += 1;
        match booking.status {
            BookingStatus::Pending => stats.pending += 1,
            BookingStatus::Paid => stats.paid += 1,
            BookingStatus::Completed => stats.completed += 1,
            BookingStatus::Cancelled => stats.cancelled += 1,
        }
        if matches!(booking.status, BookingStatus::Paid | BookingStatus::Completed) {
            stats.revenue = stats.revenue.saturating_add(booking.amount);
        }
        stats
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBookingStore;
    use crate::models::TravelerDetail;
    use chrono::{Duration, NaiveDate, Utc};
    use nusa_catalog::ProductType;
    use uuid::Uuid;

    fn booking(id: &str, customer: &str, product: &str, status: BookingStatus, age_minutes: i64) -> Booking {
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        Booking {
            id: BookingId::from(id),
            user_id: format!("user-{}", customer.to_lowercase()),
            customer_name: customer.to_string(),
            product_id: Uuid::new_v4(),
            product_type: ProductType::Package,
            product_name: product.to_string(),
            product_image: None,
            location: None,
            date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            amount: 1000,
            currency: "IDR".to_string(),
            adult_count: 1,
            child_count: 0,
            total_pax: 1,
            travelers: vec![TravelerDetail::adult(customer)],
            payment_method: "Virtual Account".to_string(),
            status,
            version: 0,
            created_at,
            updated_at: created_at,
        }
    }

    fn sample() -> Vec<Booking> {
        vec![
            booking("BK-AAA000000001", "Ana", "Derawan Island Escape", BookingStatus::Paid, 30),
            booking("BK-AAA000000002", "Budi", "Raja Ampat Dive Trip", BookingStatus::Pending, 20),
            booking("BK-AAA000000003", "Derawan Tour Co", "Bromo Sunrise", BookingStatus::Cancelled, 10),
            booking("BK-AAA000000004", "Citra", "Bali Arts Festival", BookingStatus::Paid, 5),
            booking("BK-AAA000000005", "Dewi", "Komodo Sailing", BookingStatus::Completed, 1),
        ]
    }

    fn ids(bookings: &[Booking]) -> Vec<&str> {
        bookings.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_search_term_any_status() {
        let found = filter_bookings(sample(), "derawan", StatusFilter::All);
        assert_eq!(ids(&found), vec!["BK-AAA000000003", "BK-AAA000000001"]);

        let found = filter_bookings(sample(), "DERAWAN", StatusFilter::All);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_status_only() {
        let found = filter_bookings(sample(), "", StatusFilter::Only(BookingStatus::Paid));
        assert_eq!(ids(&found), vec!["BK-AAA000000004", "BK-AAA000000001"]);
    }

    #[test]
    fn test_term_intersects_status() {
        let found = filter_bookings(sample(), "derawan", StatusFilter::Only(BookingStatus::Paid));
        assert_eq!(ids(&found), vec!["BK-AAA000000001"]);

        let found = filter_bookings(sample(), "bk-aaa000000005", StatusFilter::All);
        assert_eq!(ids(&found), vec!["BK-AAA000000005"]);

        assert!(filter_bookings(sample(), "lombok", StatusFilter::All).is_empty());
    }

    #[test]
    fn test_summary() {
        let stats = summarize(&sample());
        assert_eq!(
            stats,
            BookingStats {
                total: 5,
                pending: 1,
                paid: 2,
                completed: 1,
                cancelled: 1,
                revenue: 3000,
            }
        );
    }

    #[tokio::test]
    async fn test_by_user_most_recent_first() {
        let store = Arc::new(MemoryBookingStore::new());
        let older = booking("BK-BBB000000001", "Ana", "Derawan Island Escape", BookingStatus::Paid, 60);
        let newer = booking("BK-BBB000000002", "Ana", "Bromo Sunrise", BookingStatus::Pending, 5);
        let other = booking("BK-BBB000000003", "Budi", "Bromo Sunrise", BookingStatus::Pending, 1);
        for b in [&older, &newer, &other] {
            store.insert(b).await.unwrap();
        }

        let query = BookingQuery::new(store);
        let mine = query.by_user("user-ana").await.unwrap();
        assert_eq!(ids(&mine), vec!["BK-BBB000000002", "BK-BBB000000001"]);

        assert!(query.by_user("user-nobody").await.unwrap().is_empty());

        let err = query.by_id(&BookingId::from("BK-MISSING")).await.unwrap_err();
        assert_eq!(err, BookingError::NotFound(BookingId::from("BK-MISSING")));
        assert_eq!(query.by_id(&other.id).await.unwrap(), other);
    }
}

use serde::{Deserialize, Serialize};

use crate::booking::{BookingId, BookingStatus};

/// Final outcome reported by the external payment gateway.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    Succeeded,
    Failed,
    Canceled,
}

impl GatewayStatus {
    /// Booking status the notification drives the booking towards.
    pub fn target_status(self) -> BookingStatus {
        match self {
            GatewayStatus::Succeeded => BookingStatus::Paid,
            GatewayStatus::Failed | GatewayStatus::Canceled => BookingStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentNotification {
    pub booking_id: BookingId,
    pub status: GatewayStatus,
    /// Gateway-side reference, kept for logs only.
    #[serde(default)]
    pub reference: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Fulfilled,
    Expired,
}

impl ReservationStatus {
    /// Member-facing wording.
    pub fn display(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Fulfilled => "Ready for Pickup",
            ReservationStatus::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    #[serde(default)]
    pub book_id: Option<i64>,
    pub book_title: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
}

use serde::Serialize;

use super::{ApiClient, ApiError, DataEnvelope};
use crate::models::Reservation;

#[derive(Serialize)]
struct ReserveRequest {
    #[serde(rename = "bookId")]
    book_id: i64,
}

impl ApiClient {
    /// `POST /library/reservations` - member places a hold.
    pub async fn reserve_book(&self, book_id: i64) -> Result<(), ApiError> {
        self.post("/library/reservations", &ReserveRequest { book_id })
            .await
    }

    /// `GET /library/reservations` - the signed-in member's holds.
    pub async fn my_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        let envelope: DataEnvelope<Vec<Reservation>> =
            self.get_json("/library/reservations").await?;
        Ok(envelope.data)
    }

    /// `GET /library/admin/reservations` (admin only) - active holds
    /// awaiting fulfillment.
    pub async fn all_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        let envelope: DataEnvelope<Vec<Reservation>> =
            self.get_json("/library/admin/reservations").await?;
        Ok(envelope.data)
    }

    /// `POST /library/admin/reservations/:id/fulfill` (admin only).
    pub async fn fulfill_reservation(&self, id: i64) -> Result<(), ApiError> {
        self.post(
            &format!("/library/admin/reservations/{}/fulfill", id),
            &serde_json::json!({}),
        )
        .await
    }
}

//! Admin reservation queue: list active holds, fulfill one, refresh.

use crate::api::ApiClient;
use crate::models::Reservation;
use crate::notify::NotificationBus;

pub struct ReservationQueue {
    api: ApiClient,
    bus: NotificationBus,
    pub reservations: Vec<Reservation>,
    pub last_error: Option<String>,
}

impl ReservationQueue {
    pub fn new(api: ApiClient, bus: NotificationBus) -> Self {
        Self {
            api,
            bus,
            reservations: Vec::new(),
            last_error: None,
        }
    }

    pub async fn refresh(&mut self) {
        self.last_error = None;
        match self.api.all_reservations().await {
            Ok(reservations) => self.reservations = reservations,
            Err(e) => self.last_error = Some(e.message_or("Failed to fetch reservations")),
        }
    }

    /// Hand the reserved copy over. One refresh on success, nothing on
    /// failure.
    pub async fn fulfill(&mut self, id: i64) -> bool {
        match self.api.fulfill_reservation(id).await {
            Ok(()) => {
                self.bus.success("Reservation fulfilled successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                let message = e.message_or("Failed to fulfill reservation");
                self.last_error = Some(message.clone());
                self.bus.error(message);
                false
            }
        }
    }
}

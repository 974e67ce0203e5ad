//! Admin user management, same coordination shape as the book manager.

use crate::api::ApiClient;
use crate::models::{NewUser, User, UserUpdate};
use crate::notify::NotificationBus;

pub struct UserManager {
    api: ApiClient,
    bus: NotificationBus,
    pub search: String,
    pub users: Vec<User>,
    pub last_error: Option<String>,
    pending_delete: Option<i64>,
}

impl UserManager {
    pub fn new(api: ApiClient, bus: NotificationBus) -> Self {
        Self {
            api,
            bus,
            search: String::new(),
            users: Vec::new(),
            last_error: None,
            pending_delete: None,
        }
    }

    pub async fn refresh(&mut self) {
        self.last_error = None;
        let search = if self.search.is_empty() {
            None
        } else {
            Some(self.search.as_str())
        };
        match self.api.list_users(search, None).await {
            Ok(users) => self.users = users,
            Err(e) => self.last_error = Some(e.message_or("Failed to fetch users")),
        }
    }

    pub async fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.refresh().await;
    }

    fn validate(user: &NewUser) -> Result<(), String> {
        if user.username.trim().is_empty()
            || user.name.trim().is_empty()
            || user.email.trim().is_empty()
            || user.password.is_empty()
        {
            return Err("Username, name, email and password are required".to_string());
        }
        Ok(())
    }

    pub async fn create(&mut self, user: NewUser) -> bool {
        if let Err(message) = Self::validate(&user) {
            self.fail(message);
            return false;
        }
        match self.api.register_user(&user).await {
            Ok(()) => {
                self.bus.success("User created successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to create user"));
                false
            }
        }
    }

    pub async fn update(&mut self, id: i64, update: UserUpdate) -> bool {
        match self.api.update_user(id, &update).await {
            Ok(()) => {
                self.bus.success("User updated successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to update user"));
                false
            }
        }
    }

    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        match self.api.delete_user(id).await {
            Ok(()) => {
                self.bus.success("User deleted successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e.message_or("Failed to delete user"));
                false
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.last_error = Some(message.clone());
        self.bus.error(message);
    }
}

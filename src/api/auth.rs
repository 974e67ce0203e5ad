use serde::Serialize;

use super::{ApiClient, ApiError, DataEnvelope};
use crate::models::{NewUser, User, UserUpdate};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
struct LoginData {
    token: String,
    user: User,
}

#[derive(Serialize)]
struct UserSearchQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl ApiClient {
    /// `POST /auth/login`. On success the token and profile are stored into
    /// the session before returning.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let envelope: DataEnvelope<LoginData> = self
            .post_json("/auth/login", &LoginRequest { username, password })
            .await?;
        let LoginData { token, user } = envelope.data;
        self.session().store_login(token, user.clone());
        Ok(user)
    }

    /// Logout is a purely local operation: drop the token and profile.
    pub fn logout(&self) {
        self.session().clear();
    }

    /// `GET /auth/profile`. Refreshes the cached profile on the session.
    pub async fn profile(&self) -> Result<User, ApiError> {
        let envelope: DataEnvelope<User> = self.get_json("/auth/profile").await?;
        self.session().set_user(envelope.data.clone());
        Ok(envelope.data)
    }

    /// `POST /auth/register` (admin only).
    pub async fn register_user(&self, user: &NewUser) -> Result<(), ApiError> {
        self.post("/auth/register", user).await
    }

    /// `GET /auth/users?search=&limit=` (admin only).
    pub async fn list_users(
        &self,
        search: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<User>, ApiError> {
        let envelope: DataEnvelope<Vec<User>> = self
            .get_json_query("/auth/users", &UserSearchQuery { search, limit })
            .await?;
        Ok(envelope.data)
    }

    /// `PUT /auth/users/:id` (admin only).
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<(), ApiError> {
        self.put(&format!("/auth/users/{}", id), update).await
    }

    /// `DELETE /auth/users/:id` (admin only).
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/auth/users/{}", id)).await
    }
}

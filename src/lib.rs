pub mod access;
pub mod api;
pub mod config;
pub mod models;
pub mod notify;
pub mod services;
pub mod session;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use notify::NotificationBus;
pub use session::AuthSession;

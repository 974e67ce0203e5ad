use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub token_file: PathBuf,
    pub debounce: Duration,
    pub typeahead_limit: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("LIBRIS_API_URL")
                .unwrap_or_else(|_| "http://localhost:5001/api".to_string()),
            token_file: env::var("LIBRIS_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_token_file()),
            debounce: Duration::from_millis(
                env::var("LIBRIS_DEBOUNCE_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            ),
            typeahead_limit: env::var("LIBRIS_TYPEAHEAD_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            request_timeout: Duration::from_secs(
                env::var("LIBRIS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

/// The persisted-token location, the desktop analog of the browser's
/// localStorage slot.
fn default_token_file() -> PathBuf {
    let filename = "token";

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join("Library")
            .join("Caches")
            .join("Libris")
            .join(filename)
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("LOCALAPPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join("Libris").join(filename)
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".cache").join("libris").join(filename)
    }
}

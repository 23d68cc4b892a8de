//! Environment-backed runtime settings

use std::env;

use tracing::{error, warn};

/// Port used when `PORT` is unset or unparsable
pub const DEFAULT_PORT: u16 = 3001;

/// Settings read once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    /// Gemini API key; `None` makes every provider call fail at call time
    pub api_key: Option<String>,
    /// HTTP listen port
    pub port: u16,
}

impl Settings {
    /// Reads `GEMINI_API_KEY` and `PORT` from the environment. A missing
    /// key is logged but does not abort startup.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            error!("GEMINI_API_KEY is not set; recommendation requests will fail");
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("PORT value {raw:?} is not a valid port, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Settings { api_key, port }
    }
}

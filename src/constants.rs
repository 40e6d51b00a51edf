//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Default base URL of the teller backend
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the base URL
pub const API_URL_ENV: &str = "TELLER_API_URL";

/// Session file name inside the config directory
pub const SESSION_FILE: &str = "session.yaml";

/// How long a notice stays on screen before it is cleared
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Teller TUI";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

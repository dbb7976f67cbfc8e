//! Node configuration from environment variables.

use bookwyrm_sync::SyncConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for a board node.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Collection holding the privileged allowlist
    pub admins_collection: String,

    /// Email seeded into the allowlist at startup, if any
    pub admin_email: Option<String>,

    /// Seed the built-in sample roster into an empty store at startup
    pub seed_sample_data: bool,

    /// Sync session tunables
    pub sync: SyncConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl BoardConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let api_addr = std::env::var("BOARD_API_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid BOARD_API_ADDR");

        let admins_collection =
            std::env::var("BOARD_ADMINS_COLLECTION").unwrap_or_else(|_| "admins".to_string());

        let admin_email = std::env::var("BOARD_ADMIN_EMAIL").ok().filter(|s| !s.is_empty());

        let seed_sample_data = std::env::var("BOARD_SEED_SAMPLE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let mut sync = SyncConfig::default();
        if let Ok(collection) = std::env::var("BOARD_PARTICIPANTS_COLLECTION") {
            sync.participants_collection = collection;
        }
        if let Ok(collection) = std::env::var("BOARD_SETTINGS_COLLECTION") {
            sync.settings_collection = collection;
        }
        if let Some(window) = env_millis("BOARD_THROTTLE_MS") {
            sync.throttle_window = window;
        }
        if let Some(delay) = env_millis("BOARD_LISTENER_DELAY_MS") {
            sync.listener_delay = delay;
        }
        if let Some(delay) = env_millis("BOARD_LIST_READY_DELAY_MS") {
            sync.list_ready_delay = delay;
        }

        Self {
            api_addr,
            admins_collection,
            admin_email,
            seed_sample_data,
            sync,
        }
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    std::env::var(name).ok()?.parse().ok().map(Duration::from_millis)
}

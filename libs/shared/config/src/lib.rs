use std::env;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub watcher_poll_seconds: u64,
    pub broadcast_capacity: usize,
    pub recent_appointments_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!("PORT not set, using default 3000");
                    3000
                }),
            watcher_poll_seconds: env::var("WATCHER_POLL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!("WATCHER_POLL_SECONDS not set, using default 5");
                    5
                }),
            broadcast_capacity: env::var("BROADCAST_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!("BROADCAST_CAPACITY not set, using default 1000");
                    1000
                }),
            recent_appointments_limit: env::var("RECENT_APPOINTMENTS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    pub fn watcher_poll_interval(&self) -> Duration {
        Duration::from_secs(self.watcher_poll_seconds)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            watcher_poll_seconds: 5,
            broadcast_capacity: 1000,
            recent_appointments_limit: 10,
        }
    }
}

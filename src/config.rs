//! Environment-derived configuration, loaded once at startup and threaded
//! through `AppState` rather than read ad hoc by individual views.

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Shared static password for the admin panel.
    pub admin_password: String,
    /// Seconds between admin notification polls.
    pub poll_interval_secs: u64,
    /// Seconds a notification toast stays visible before auto-dismissing.
    pub toast_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8083".to_string())
                .parse()
                .context("PORT is not a valid port number")?,
            admin_password: std::env::var("ADMIN_PASSWORD")
                .context("ADMIN_PASSWORD is not set")?,
            poll_interval_secs: std::env::var("NOTIFY_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("NOTIFY_POLL_INTERVAL_SECS is not a number")?,
            toast_ttl_secs: std::env::var("NOTIFY_TOAST_TTL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("NOTIFY_TOAST_TTL_SECS is not a number")?,
        })
    }
}

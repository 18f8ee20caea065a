//! Service configuration, read from the environment (and `.env`).

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// ISO code printed on invoices.
    pub currency: String,
    pub store_name: String,
    /// Sessions untouched for this long are dropped.
    pub session_idle_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self { port: 8083, currency: "INR".to_string(), store_name: "OpenSASE Store".to_string(), session_idle_minutes: 120 }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "PORT is not a valid port, using {}", defaults.port);
                defaults.port
            }),
            Err(_) => defaults.port,
        };
        let session_idle_minutes = std::env::var("SESSION_IDLE_MINUTES").ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|m| *m > 0)
            .unwrap_or(defaults.session_idle_minutes);
        Self {
            port,
            currency: std::env::var("CURRENCY").unwrap_or(defaults.currency),
            store_name: std::env::var("STORE_NAME").unwrap_or(defaults.store_name),
            session_idle_minutes,
        }
    }
}

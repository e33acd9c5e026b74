//! Process configuration, read from the environment after `.env` is loaded.

use std::{env, str::FromStr, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    /// sqlx connection string
    pub database_url: String,
    /// Max pooled connections
    pub db_max_connections: u32,
    pub port: u16,
    /// How often the presence sweep runs
    pub sweep_interval: Duration,
    /// Participants idle longer than this are evicted
    pub presence_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://chat.db?mode=rwc".into(),
            db_max_connections: 5,
            port: 5000,
            sweep_interval: Duration::from_secs(15),
            presence_timeout: Duration::from_millis(10_000),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(url) = lookup("DATABASE_URL") {
            cfg.database_url = url;
        }
        if let Some(n) = parse(&lookup, "DB_MAX_CONNECTIONS")? {
            anyhow::ensure!(n > 0, "DB_MAX_CONNECTIONS must be > 0");
            cfg.db_max_connections = n;
        }
        if let Some(port) = parse(&lookup, "PORT")? {
            cfg.port = port;
        }
        if let Some(secs) = parse::<u64, _>(&lookup, "SWEEP_INTERVAL_SECS")? {
            anyhow::ensure!(secs > 0, "SWEEP_INTERVAL_SECS must be > 0");
            cfg.sweep_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = parse::<u64, _>(&lookup, "PRESENCE_TIMEOUT_MS")? {
            cfg.presence_timeout = Duration::from_millis(ms);
        }
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("{key}={raw:?}")))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = from(&[]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.sweep_interval, Duration::from_secs(15));
        assert_eq!(cfg.presence_timeout, Duration::from_millis(10_000));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn overrides_apply() {
        let cfg = from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "8080"),
            ("SWEEP_INTERVAL_SECS", "3"),
            ("PRESENCE_TIMEOUT_MS", "500"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.sweep_interval, Duration::from_secs(3));
        assert_eq!(cfg.presence_timeout, Duration::from_millis(500));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = from(&[("PORT", "port")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn zero_sweep_interval_is_rejected() {
        let err = from(&[("SWEEP_INTERVAL_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("SWEEP_INTERVAL_SECS"));

        let err = from(&[("DB_MAX_CONNECTIONS", "0")]).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }
}

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Duration;

use mygram_crypto::token::DEFAULT_TTL_HOURS;

/// Secrets that must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["secret", "changeme", "change-me", "dev-secret-change-me"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("MYGRAM_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("MYGRAM_PORT") {
            Some(raw) => raw.parse().context("MYGRAM_PORT must be a port number")?,
            None => 8080,
        };
        let db_path = lookup("MYGRAM_DB_PATH").unwrap_or_else(|| "mygram.db".into());

        let jwt_secret = lookup("MYGRAM_JWT_SECRET").context("MYGRAM_JWT_SECRET is not set")?;
        if jwt_secret.trim().is_empty()
            || PLACEHOLDER_SECRETS.contains(&jwt_secret.to_lowercase().as_str())
        {
            bail!("MYGRAM_JWT_SECRET is a placeholder; set a real secret");
        }

        let ttl_hours: i64 = match lookup("MYGRAM_TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .parse()
                .context("MYGRAM_TOKEN_TTL_HOURS must be a whole number of hours")?,
            None => DEFAULT_TTL_HOURS,
        };
        if ttl_hours <= 0 {
            bail!("MYGRAM_TOKEN_TTL_HOURS must be positive");
        }

        Ok(Self {
            host,
            port,
            db_path: PathBuf::from(db_path),
            jwt_secret,
            token_ttl: Duration::hours(ttl_hours),
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[("MYGRAM_JWT_SECRET", "a-real-secret")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.db_path, PathBuf::from("mygram.db"));
        assert_eq!(cfg.token_ttl, Duration::hours(72));
        assert_eq!(cfg.addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn secret_is_required_and_not_a_placeholder() {
        assert!(config(&[]).is_err());
        assert!(config(&[("MYGRAM_JWT_SECRET", "")]).is_err());
        assert!(config(&[("MYGRAM_JWT_SECRET", "Secret")]).is_err());
        assert!(config(&[("MYGRAM_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("MYGRAM_JWT_SECRET", "a-real-secret"),
            ("MYGRAM_HOST", "127.0.0.1"),
            ("MYGRAM_PORT", "9000"),
            ("MYGRAM_TOKEN_TTL_HOURS", "1"),
        ])
        .unwrap();
        assert_eq!(cfg.addr().unwrap().to_string(), "127.0.0.1:9000");
        assert_eq!(cfg.token_ttl, Duration::hours(1));

        assert!(config(&[("MYGRAM_JWT_SECRET", "s3"), ("MYGRAM_PORT", "http")]).is_err());
        assert!(config(&[("MYGRAM_JWT_SECRET", "s3"), ("MYGRAM_TOKEN_TTL_HOURS", "0")]).is_err());
    }
}

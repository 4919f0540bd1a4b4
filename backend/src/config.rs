use std::{env, fmt::Display, str::FromStr};

use anyhow::Context;
use uuid::Uuid;

/// Placeholder owner used when a request carries no identity header.
pub const DEFAULT_USER_ID: Uuid = Uuid::from_u128(1);

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub default_user_id: Uuid,
    pub seed_sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            host: "0.0.0.0".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            default_user_id: DEFAULT_USER_ID,
            seed_sample_data: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),

            default_user_id: parse_var("DEFAULT_USER_ID", defaults.default_user_id)?,
            seed_sample_data: parse_var("SEED_SAMPLE_DATA", defaults.seed_sample_data)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} is misconfigured")),
        Err(_) => Ok(default),
    }
}

use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_TOKEN_LIFETIME: &str = "1h";
const DEFAULT_CACHE_TTL_SECS: u64 = 30;
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 86_400);
const CACHE_TTL_SECS_RANGE: RangeInclusive<u64> = 0..=86_400;
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub password_cost: u32,
    pub cache_ttl_secs: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                value: "<empty>".into(),
            });
        }

        let expires_in =
            env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_TOKEN_LIFETIME.into());
        let jwt_expiration = token_lifetime(&expires_in)?;

        let server_port = match env::var("SERVER_PORT").or_else(|_| env::var("PORT")) {
            Ok(port) => port.parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                value: port,
            })?,
            Err(_) => 3000,
        };

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            database_max_connections: optional("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            jwt_expiration_secs: jwt_expiration.as_secs(),
            password_cost: within(
                "BCRYPT_COST",
                optional("BCRYPT_COST", crate::utils::PASSWORD_COST)?,
                BCRYPT_COST_RANGE,
            )?,
            cache_ttl_secs: within(
                "CACHE_TTL_SECS",
                optional("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
                CACHE_TTL_SECS_RANGE,
            )?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port,
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn within<T: PartialOrd + Display>(
    name: &'static str,
    value: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
    }
}

/// Token lifetimes are capped at a year.
fn token_lifetime(raw: &str) -> Result<Duration, ConfigError> {
    parse_duration(raw)
        .filter(|lifetime| *lifetime <= MAX_TOKEN_LIFETIME)
        .ok_or(ConfigError::Invalid {
            name: "JWT_EXPIRES_IN",
            value: raw.to_owned(),
        })
}

/// Parses lifetimes written as `3600`, `45s`, `30m`, `1h` or `7d`.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c),
        _ => (raw, 's'),
    };
    let amount: u64 = digits.trim().parse().ok()?;

    let secs = match unit {
        's' => amount,
        'm' => amount.checked_mul(60)?,
        'h' => amount.checked_mul(3600)?,
        'd' => amount.checked_mul(86_400)?,
        _ => return None,
    };
    if secs == 0 {
        return None;
    }
    Some(Duration::from_secs(secs))
}

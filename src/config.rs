use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub rate_per_km: f64,
    pub currency: String,
    pub currency_precision: u32,
    pub tracking_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            log_level: "info".to_string(),
            event_buffer_size: 1024,
            rate_per_km: 15.0,
            currency: "INR".to_string(),
            currency_precision: 0,
            tracking_prefix: "TRK".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        let defaults = Config::default();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", defaults.http_port)?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", defaults.event_buffer_size)?,
            rate_per_km: parse_or_default("RATE_PER_KM", defaults.rate_per_km)?,
            currency: env::var("CURRENCY").unwrap_or(defaults.currency),
            currency_precision: parse_or_default("CURRENCY_PRECISION", defaults.currency_precision)?,
            tracking_prefix: env::var("TRACKING_PREFIX").unwrap_or(defaults.tracking_prefix),
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

//! Demo configuration loaded from environment variables.

use common::Money;
use saga::order_fulfillment;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Demo configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `PAYMENT_LIMIT` — largest chargeable amount in whole dollars (default: `1000`)
/// - `MIN_ADDRESS_LEN` — shortest accepted shipping address (default: `3`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `pretty` or `json` (default: `pretty`)
///
/// Values that fail to parse fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub payment_limit: Money,
    pub min_address_len: usize,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            payment_limit: lookup("PAYMENT_LIMIT")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|dollars| *dollars >= 0)
                .and_then(Money::checked_from_dollars)
                .unwrap_or(defaults.payment_limit),
            min_address_len: lookup("MIN_ADDRESS_LEN")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.min_address_len),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            payment_limit: Money::from_dollars(order_fulfillment::DEFAULT_PAYMENT_LIMIT_DOLLARS),
            min_address_len: order_fulfillment::DEFAULT_MIN_ADDRESS_LEN,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

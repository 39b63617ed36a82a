use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Threshold used for `Item`s that do not define their own
    pub low_stock_threshold: f64,
    /// Seconds between two sweeps of the low stock watch
    pub low_stock_sweep_interval_secs: u64,
    /// Seconds to wait before the first low stock sweep after startup
    pub low_stock_first_sweep_delay_secs: u64,
    /// Where outbound notifications are posted. Notifications are only logged
    /// when this is missing.
    pub notifier_webhook_url: Option<String>,
    /// Where caregiver and achievement hooks are posted
    pub hooks_webhook_url: Option<String>,
    /// Sent along with every outbound webhook so that the receiver can verify
    /// the sender
    pub webhook_key: Option<String>,
    pub default_nag_interval_minutes: u32,
    pub default_snooze_limit: u32,
}

fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn optional_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            info!("Did not find {} environment variable.", name);
            None
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            port: parse_env_or("PORT", 5000),
            low_stock_threshold: parse_env_or("LOW_STOCK_THRESHOLD", 3.0),
            low_stock_sweep_interval_secs: parse_env_or("LOW_STOCK_SWEEP_INTERVAL_SECS", 60 * 30),
            low_stock_first_sweep_delay_secs: parse_env_or("LOW_STOCK_FIRST_SWEEP_DELAY_SECS", 30),
            notifier_webhook_url: optional_env("NOTIFIER_WEBHOOK_URL"),
            hooks_webhook_url: optional_env("HOOKS_WEBHOOK_URL"),
            webhook_key: optional_env("WEBHOOK_KEY"),
            default_nag_interval_minutes: parse_env_or("DEFAULT_NAG_INTERVAL_MINUTES", 15),
            default_snooze_limit: parse_env_or("DEFAULT_SNOOZE_LIMIT", 3),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

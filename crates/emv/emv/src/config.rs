//! Terminal and retry configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Terminal data offered to the card during GET PROCESSING OPTIONS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Terminal Transaction Qualifiers (9F66)
    pub ttq: u32,

    /// ISO 4217 numeric currency code (5F2A)
    pub transaction_currency_code: u16,

    /// ISO 3166 numeric country code (9F1A)
    pub terminal_country_code: u16,

    /// Authorised amount in minor units (9F02)
    pub amount_authorized: u64,

    /// Per-exchange timeout passed to the transport, in milliseconds
    pub exchange_timeout_ms: Option<u64>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            ttq: 0xB620_C000,
            transaction_currency_code: 933,
            terminal_country_code: 112,
            amount_authorized: 1000,
            exchange_timeout_ms: None,
        }
    }
}

impl TerminalConfig {
    /// Set the terminal transaction qualifiers
    pub const fn with_ttq(mut self, ttq: u32) -> Self {
        self.ttq = ttq;
        self
    }

    /// Set the transaction currency code
    pub const fn with_currency_code(mut self, code: u16) -> Self {
        self.transaction_currency_code = code;
        self
    }

    /// Set the terminal country code
    pub const fn with_country_code(mut self, code: u16) -> Self {
        self.terminal_country_code = code;
        self
    }

    /// Set the per-exchange timeout
    pub const fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Per-exchange timeout, if configured
    pub const fn exchange_timeout(&self) -> Option<Duration> {
        match self.exchange_timeout_ms {
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        }
    }
}

/// Backoff applied by the listener when target discovery fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Consecutive discovery failures tolerated before giving up
    pub max_consecutive_failures: u32,

    /// Delay after the first failure, in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay, in milliseconds
    pub max_delay_ms: u64,

    /// Factor applied to the delay after each further failure
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 10,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Policy that retries `attempts` times without sleeping
    pub const fn immediate(attempts: u32) -> Self {
        Self {
            max_consecutive_failures: attempts,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            multiplier: 1.0,
        }
    }

    /// Delay to wait after the `failures`-th consecutive failure (1-based)
    pub fn delay_for(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay = self.initial_delay_ms as f64 * self.multiplier.max(1.0).powi(exponent);
        let capped = delay.min(self.max_delay_ms as f64);
        Duration::from_millis(capped as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_defaults() {
        let config = TerminalConfig::default();
        assert_eq!(config.ttq, 0xB620C000);
        assert_eq!(config.transaction_currency_code, 933);
        assert_eq!(config.terminal_country_code, 112);
        assert_eq!(config.amount_authorized, 1000);
        assert_eq!(config.exchange_timeout(), None);

        let config = config.with_exchange_timeout(Duration::from_millis(250));
        assert_eq!(config.exchange_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_consecutive_failures: 5,
            initial_delay_ms: 100,
            max_delay_ms: 350,
            multiplier: 2.0,
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(350));
        assert_eq!(policy.delay_for(40), Duration::from_millis(350));
        assert_eq!(RetryPolicy::immediate(3).delay_for(2), Duration::ZERO);
    }
}

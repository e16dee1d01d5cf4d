//! Configuration options for PC/SC transport

use std::time::Duration;

use pcsc::{Protocols as PcscProtocols, ShareMode as PcscShareMode};
use serde::{Deserialize, Serialize};

/// Sharing mode for card connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareMode {
    /// Exclusive access to the card
    Exclusive,
    /// Shared access to the card (default)
    #[default]
    Shared,
    /// Direct connection to the reader
    Direct,
}

impl From<ShareMode> for PcscShareMode {
    fn from(mode: ShareMode) -> Self {
        match mode {
            ShareMode::Exclusive => Self::Exclusive,
            ShareMode::Shared => Self::Shared,
            ShareMode::Direct => Self::Direct,
        }
    }
}

/// Transmission protocols offered when connecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Whichever protocol the reader negotiates
    #[default]
    Any,
    /// T=0 only
    T0,
    /// T=1 only
    T1,
}

impl From<Protocol> for PcscProtocols {
    fn from(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Any => Self::ANY,
            Protocol::T0 => Self::T0,
            Protocol::T1 => Self::T1,
        }
    }
}

/// Configuration options for PC/SC transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcscConfig {
    /// Sharing mode for card connections
    pub share_mode: ShareMode,

    /// Preferred protocols for card communication
    pub protocol: Protocol,

    /// How long one discovery poll waits for a reader state change
    pub poll_timeout_ms: u64,

    /// Only use readers whose name contains this string
    pub reader: Option<String>,
}

impl Default for PcscConfig {
    fn default() -> Self {
        Self {
            share_mode: ShareMode::Shared,
            protocol: Protocol::Any,
            poll_timeout_ms: 1000,
            reader: None,
        }
    }
}

impl PcscConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sharing mode
    pub const fn with_share_mode(mut self, mode: ShareMode) -> Self {
        self.share_mode = mode;
        self
    }

    /// Set the preferred protocols
    pub const fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the discovery poll timeout
    pub const fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Restrict discovery to readers whose name contains `filter`
    pub fn with_reader<S: Into<String>>(mut self, filter: S) -> Self {
        self.reader = Some(filter.into());
        self
    }

    /// Discovery poll timeout
    pub const fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Whether the reader called `name` passes the reader filter
    pub fn accepts_reader(&self, name: &str) -> bool {
        self.reader
            .as_deref()
            .is_none_or(|filter| name.contains(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PcscConfig::default();
        assert_eq!(config.share_mode, ShareMode::Shared);
        assert_eq!(config.protocol, Protocol::Any);
        assert_eq!(config.poll_timeout(), Duration::from_secs(1));
        assert!(config.accepts_reader("ACS ACR122U PICC Interface 00 00"));
    }

    #[test]
    fn test_reader_filter() {
        let config = PcscConfig::new().with_reader("ACR122");
        assert!(config.accepts_reader("ACS ACR122U PICC Interface 00 00"));
        assert!(!config.accepts_reader("Yubico YubiKey OTP+FIDO+CCID 00 00"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PcscConfig =
            serde_json::from_str(r#"{"share_mode":"exclusive","protocol":"t1"}"#).unwrap();
        assert_eq!(config.share_mode, ShareMode::Exclusive);
        assert_eq!(config.protocol, Protocol::T1);
        assert_eq!(config.poll_timeout_ms, 1000);
        assert_eq!(config.reader, None);
    }

    #[test]
    fn test_pcsc_conversions() {
        assert_eq!(
            PcscProtocols::from(Protocol::T0).bits(),
            PcscProtocols::T0.bits()
        );
        assert!(matches!(
            PcscShareMode::from(ShareMode::Direct),
            PcscShareMode::Direct
        ));
    }
}

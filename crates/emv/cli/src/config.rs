//! Layered configuration: defaults, then `emvtap.toml`, then `EMVTAP_` variables

use std::path::{Path, PathBuf};

use emvtap::{RetryPolicy, TerminalConfig};
use emvtap_transport_pcsc::PcscConfig;
use eyre::{WrapErr, bail};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// File read when `--config` is not given; a missing file is not an error
pub(crate) const DEFAULT_CONFIG_FILE: &str = "emvtap.toml";

/// Prefix of environment overrides, e.g. `EMVTAP_TERMINAL__AMOUNT_AUTHORIZED`
const ENV_PREFIX: &str = "EMVTAP_";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) terminal: TerminalConfig,
    pub(crate) retry: RetryPolicy,
    pub(crate) pcsc: PcscConfig,
}

pub(crate) fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    let file = match path {
        Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };

    figment(&file)
        .extract()
        .wrap_err_with(|| format!("invalid configuration in {}", file.display()))
}

fn figment(file: &Path) -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use emvtap_transport_pcsc::ShareMode;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_| {
            let config = load_config(None).unwrap();
            assert_eq!(config, Config::default());
            assert_eq!(config.terminal.ttq, 0xB620_C000);
            assert_eq!(config.terminal.transaction_currency_code, 933);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [terminal]
                amount_authorized = 2500
                transaction_currency_code = 978

                [pcsc]
                share_mode = "exclusive"
                reader = "ACR122"
                "#,
            )?;
            jail.set_env("EMVTAP_TERMINAL__AMOUNT_AUTHORIZED", "100");
            jail.set_env("EMVTAP_RETRY__MAX_CONSECUTIVE_FAILURES", "3");

            let config = load_config(None).unwrap();
            assert_eq!(config.terminal.amount_authorized, 100);
            assert_eq!(config.terminal.transaction_currency_code, 978);
            assert_eq!(config.terminal.terminal_country_code, 112);
            assert_eq!(config.retry.max_consecutive_failures, 3);
            assert_eq!(config.pcsc.share_mode, ShareMode::Exclusive);
            assert_eq!(config.pcsc.reader.as_deref(), Some("ACR122"));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        Jail::expect_with(|_| {
            assert!(load_config(Some(Path::new("elsewhere.toml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_reported() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[terminal]\nttq = \"fast\"\n")?;
            let err = load_config(Some(Path::new("bad.toml"))).unwrap_err();
            assert!(err.to_string().contains("bad.toml"));
            Ok(())
        });
    }
}

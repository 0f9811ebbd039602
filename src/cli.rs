//! Command-line interface argument parsing for fxboard.
//!
//! - `fxboard show --from EUR --to UZS --period 3M`
//! - `fxboard convert 100 USD EUR`
//! - `fxboard symbols`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::data::{Period, DEFAULT_API_HOST};

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["FXBOARD_API_KEY", "RAPIDAPI_KEY"];

/// A terminal dashboard for currency conversion and exchange-rate history.
#[derive(Parser, Debug)]
#[command(name = "fxboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand that talks to the API
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// RapidAPI key. Defaults to $FXBOARD_API_KEY, then $RAPIDAPI_KEY
    #[arg(long)]
    pub api_key: Option<String>,

    /// RapidAPI host of the exchange-rate service
    #[arg(long)]
    pub api_host: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive dashboard
    Show {
        /// Initial amount to convert
        #[arg(short, long, default_value = "1")]
        amount: String,

        /// Source currency code
        #[arg(short, long, default_value = "USD")]
        from: String,

        /// Target currency code
        #[arg(short, long, default_value = "UZS")]
        to: String,

        /// Currency charted against the base until the source changes
        #[arg(short, long, default_value = "UZS")]
        currency: String,

        /// Base currency of the performance chart
        #[arg(short, long, default_value = "USD")]
        base: String,

        /// Initial chart period (1D, 1M, 3M, 6M, 1Y)
        #[arg(short, long, default_value = "1Y")]
        period: String,

        /// Delay in milliseconds between the last edit and the conversion call
        #[arg(long, default_value = "500")]
        debounce_ms: u64,

        /// Color theme ("default" or "basic")
        #[arg(long)]
        theme: Option<String>,

        /// Where to write logs. Defaults to the user cache directory
        #[arg(long)]
        log_file: Option<String>,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Convert an amount once and print the result
    Convert {
        amount: f64,
        from: String,
        to: String,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// List the currencies the API supports
    Symbols {
        #[command(flatten)]
        api: ApiArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Resolved API connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub host: String,
}

impl ApiConfig {
    pub fn from_args(args: ApiArgs) -> Self {
        Self::resolve(args, |name| std::env::var(name).ok())
    }

    fn resolve(args: ApiArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = args
            .api_key
            .or_else(|| API_KEY_ENV_VARS.iter().find_map(|name| env(name)))
            .filter(|k| !k.trim().is_empty());

        ApiConfig {
            api_key,
            host: args.api_host.unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
        }
    }
}

/// Configuration for the interactive dashboard
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub amount: String,
    pub from: String,
    pub to: String,
    pub chart_currency: String,
    pub chart_base: String,
    pub period: Period,
    pub debounce: Duration,
    pub theme: String,
    pub log_file: PathBuf,
    pub api: ApiConfig,
}

impl AppConfig {
    /// Create AppConfig from the `show` subcommand's arguments
    #[allow(clippy::too_many_arguments)]
    pub fn from_show_command(
        amount: String,
        from: String,
        to: String,
        currency: String,
        base: String,
        period: String,
        debounce_ms: u64,
        theme: Option<String>,
        log_file: Option<String>,
        api: ApiArgs,
    ) -> Result<Self> {
        let Some(period) = Period::from_label(&period) else {
            bail!("Unknown period {period:?}; expected one of 1D, 1M, 3M, 6M, 1Y");
        };

        let log_file = log_file
            .map(PathBuf::from)
            .unwrap_or_else(default_log_file);

        Ok(AppConfig {
            amount,
            from: normalize_code(&from)?,
            to: normalize_code(&to)?,
            chart_currency: normalize_code(&currency)?,
            chart_base: normalize_code(&base)?,
            period,
            debounce: Duration::from_millis(debounce_ms),
            theme: theme.unwrap_or_else(|| "default".to_string()),
            log_file,
            api: ApiConfig::from_args(api),
        })
    }
}

/// Upper-case a currency code and reject anything that is not 3 letters
pub fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("Invalid currency code {code:?}; expected a 3-letter code such as USD");
    }
    Ok(code)
}

/// ~/.cache/fxboard/fxboard.log (platform cache dir), or ./fxboard.log
pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("fxboard"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fxboard.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(period: &str, from: &str) -> Result<AppConfig> {
        AppConfig::from_show_command(
            "1".into(),
            from.into(),
            "uzs".into(),
            "UZS".into(),
            "USD".into(),
            period.into(),
            500,
            None,
            None,
            ApiArgs::default(),
        )
    }

    #[test]
    fn test_default_config() {
        let config = show("1Y", "USD").unwrap();
        assert_eq!(config.theme, "default");
        assert_eq!(config.period, Period::OneYear);
        assert_eq!(config.to, "UZS");
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert!(config.log_file.ends_with("fxboard.log"));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(show("2W", "USD").is_err());
        assert!(show("1Y", "US").is_err());
        assert!(show("1Y", "U5D").is_err());
    }

    #[test]
    fn test_api_key_precedence() {
        let env = |name: &str| match name {
            "FXBOARD_API_KEY" => Some("from-env".to_string()),
            "RAPIDAPI_KEY" => Some("fallback".to_string()),
            _ => None,
        };
        let explicit = ApiArgs {
            api_key: Some("flag".into()),
            api_host: None,
        };
        assert_eq!(ApiConfig::resolve(explicit, env).api_key.as_deref(), Some("flag"));
        assert_eq!(
            ApiConfig::resolve(ApiArgs::default(), env).api_key.as_deref(),
            Some("from-env")
        );

        let only_rapid = |name: &str| (name == "RAPIDAPI_KEY").then(|| "fallback".to_string());
        let config = ApiConfig::resolve(ApiArgs::default(), only_rapid);
        assert_eq!(config.api_key.as_deref(), Some("fallback"));
        assert_eq!(config.host, DEFAULT_API_HOST);

        let blank = |_: &str| Some("  ".to_string());
        assert!(ApiConfig::resolve(ApiArgs::default(), blank).api_key.is_none());
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from(["fxboard", "convert", "100", "usd", "eur", "--api-key", "k"])
            .unwrap();
        match cli.command {
            Commands::Convert { amount, from, to, api } => {
                assert_eq!(amount, 100.0);
                assert_eq!(from, "usd");
                assert_eq!(to, "eur");
                assert_eq!(api.api_key.as_deref(), Some("k"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

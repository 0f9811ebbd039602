//! fxboard: a terminal dashboard for currency conversion.
//!
//! Converts an amount between two currencies through the RapidAPI
//! currency-conversion-and-exchange-rates service and charts how the base
//! currency has moved against the selected one.

mod app;
mod cli;
mod converter;
mod data;
mod debounce;
mod logging;
mod performance;
mod toast;
mod ui;
mod worker;

use anyhow::{Context, Result};
use cli::{ApiArgs, ApiConfig, AppConfig, Cli, Commands};
use data::{HttpRatesProvider, RatesProvider};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Show {
            amount,
            from,
            to,
            currency,
            base,
            period,
            debounce_ms,
            theme,
            log_file,
            api,
        } => {
            let config = AppConfig::from_show_command(
                amount,
                from,
                to,
                currency,
                base,
                period,
                debounce_ms,
                theme,
                log_file,
                api,
            )?;
            logging::init_file(&config.log_file)?;

            // Run the TUI application
            app::run(config)?;
        }
        Commands::Convert {
            amount,
            from,
            to,
            api,
        } => {
            logging::init_stderr()?;
            let from = cli::normalize_code(&from)?;
            let to = cli::normalize_code(&to)?;
            let provider = provider(api)?;

            let result = provider
                .convert(&from, &to, amount)
                .with_context(|| format!("Failed to convert {amount} {from} to {to}"))?;
            println!("{amount} {from} = {result:.2} {to}");
        }
        Commands::Symbols { api } => {
            logging::init_stderr()?;
            let provider = provider(api)?;

            let currencies = provider
                .list_symbols()
                .context("Failed to fetch currency list")?;
            for currency in currencies {
                println!("{}", currency.label());
            }
        }
    }

    Ok(())
}

fn provider(args: ApiArgs) -> Result<HttpRatesProvider> {
    let api = ApiConfig::from_args(args);
    HttpRatesProvider::new(api.api_key, api.host).context("Failed to build HTTP client")
}

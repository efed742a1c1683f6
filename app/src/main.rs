mod config;
mod logging;

use std::io::{self, Write};
use std::sync::Arc;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use config::Config;
use domain::{ActionTextParser, CurrencyConverter, Simulation};

fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::load();

    // Initialize logging
    logging::init()?;
    tracing::info!("Starting corpsim");
    tracing::debug!("Configuration: {config:?}");

    run(&config)
}

fn run(config: &Config) -> Result<()> {
    let converter = Arc::new(CurrencyConverter::default());
    if !converter.currencies().contains(&config.cash_currency.as_str()) {
        bail!(
            "Unsupported cash currency {}; expected one of {:?}",
            config.cash_currency,
            converter.currencies()
        );
    }

    let portfolio = csv_adapter::read_portfolio_from_path(
        &config.portfolio,
        converter,
        config.reinvest_dividends,
        &config.cash_currency,
    )
    .wrap_err_with(|| format!("Could not load {}", config.portfolio.display()))?;

    let records = csv_adapter::read_records_from_path(&config.actions, &config.date_format)
        .wrap_err_with(|| format!("Could not load {}", config.actions.display()))?;

    let simulation = Simulation::with_ordering(
        portfolio,
        records,
        config.ordering.into(),
        ActionTextParser::new(),
    );

    let mut out = io::stdout().lock();
    for snapshot in simulation {
        let snapshot = snapshot.wrap_err("Simulation aborted")?;
        csv_adapter::write_snapshot(&mut out, &snapshot, config.format.into())?;
    }
    out.flush()?;

    tracing::info!("Simulation complete");
    Ok(())
}

use anyhow::anyhow;
use clap::Parser;
use inquire::{InquireError, Select};
use tw_weather_core::{
    CachedProvider, Config, ForecastError, ForecastProvider, ForecastTable, provider_from_config,
    to_dataframe,
};

use crate::dashboard;

/// Top-level CLI struct. Configuration comes from the `CWA_KEY` environment
/// variable only.
#[derive(Debug, Parser)]
#[command(
    name = "tw-weather",
    version,
    about = "Taiwan 36-hour weather dashboard (CWA open data F-C0032-001)"
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_with(|name| std::env::var(name).ok()).await
    }

    /// `run` with the environment lookup injected.
    pub async fn run_with<F>(self, lookup: F) -> anyhow::Result<()>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        // Checked before anything touches the network.
        let config = Config::from_lookup(lookup).map_err(|e| anyhow!(e.user_message()))?;
        tracing::debug!(?config, "configuration loaded");

        let provider = CachedProvider::new(provider_from_config(&config)?, config.cache_ttl);
        let mut selected: Option<String> = None;

        loop {
            let (table, description) = load_cycle(&provider).await.map_err(cycle_error)?;

            println!("{}", dashboard::header(description.as_deref()));

            let locations: Vec<String> = table.locations().into_iter().map(str::to_string).collect();
            if locations.is_empty() {
                println!("The forecast contains no locations.");
                return Ok(());
            }

            let cursor = selected
                .as_ref()
                .and_then(|s| locations.iter().position(|l| l == s))
                .unwrap_or(0);

            let city = match Select::new("Select county / city:", locations)
                .with_starting_cursor(cursor)
                .prompt()
            {
                Ok(city) => city,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            render_city(&table, &city);
            selected = Some(city);
        }
    }
}

/// One fetch + transform pass. The cache decides whether the network is hit.
async fn load_cycle<P: ForecastProvider>(
    provider: &CachedProvider<P>,
) -> Result<(ForecastTable, Option<String>), ForecastError> {
    let response = provider.fetch_forecast().await?;
    let table = to_dataframe(&response)?;
    Ok((table, response.records.dataset_description.clone()))
}

/// `main` prints the returned message; the log line stays below the default filter.
fn cycle_error(err: ForecastError) -> anyhow::Error {
    tracing::debug!(error = %err, "forecast cycle failed");
    anyhow!("Failed to load data: {}", err.user_message())
}

fn render_city(table: &ForecastTable, city: &str) {
    let view = table.for_location(city);
    if view.is_empty() {
        return;
    }

    println!("{}", dashboard::summary(city, &view));
    println!("{}", dashboard::temperature_chart(&view));
    println!("{}", dashboard::pop_chart(&view));
    println!("Details");
    println!("{}", dashboard::detail_table(&view));
}

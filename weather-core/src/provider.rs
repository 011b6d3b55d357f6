use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, ForecastResponse, error::Result};

pub mod cwa;

pub use cwa::CwaProvider;

/// Source of raw forecast responses.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self) -> Result<ForecastResponse>;
}

#[async_trait]
impl<T: ForecastProvider + ?Sized> ForecastProvider for Box<T> {
    async fn fetch_forecast(&self) -> Result<ForecastResponse> {
        (**self).fetch_forecast().await
    }
}

/// Construct the CWA provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn ForecastProvider>> {
    Ok(Box::new(CwaProvider::new(config)?))
}

//! Core library for the Taiwan 36-hour forecast dashboard.
//!
//! This crate defines:
//! - Configuration (the `CWA_KEY` credential) and error kinds
//! - The typed F-C0032-001 response schema and an HTTP provider for it
//! - A single-slot TTL cache in front of the provider
//! - The transformation from the nested response into a flat forecast table
//!
//! It is used by the `tw-weather` terminal dashboard.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod table;
pub mod transform;

pub use cache::{CachedProvider, ForecastCache};
pub use config::Config;
pub use error::{ForecastError, Result};
pub use model::{ElementName, ForecastResponse};
pub use provider::{CwaProvider, ForecastProvider, provider_from_config};
pub use table::{ForecastRow, ForecastTable, LocationForecast};
pub use transform::to_dataframe;

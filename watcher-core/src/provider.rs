use async_trait::async_trait;
use std::fmt::Debug;

use crate::{config::ProviderConfig, error::ProviderError, model::WeatherQuery};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of raw current-conditions documents.
///
/// Implementations make exactly one attempt per call; parsing is left to the caller.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, query: &WeatherQuery) -> Result<String, ProviderError>;
}

/// Construct the OpenWeatherMap provider from configuration.
pub fn provider_from_config(config: &ProviderConfig) -> anyhow::Result<Box<dyn WeatherProvider>> {
    Ok(Box::new(OpenWeatherProvider::new(config)?))
}

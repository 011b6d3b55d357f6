//! Single-slot, time-limited memo of the last successful forecast fetch.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{error::Result, model::ForecastResponse, provider::ForecastProvider};

#[derive(Debug, Clone)]
pub struct CachedForecast {
    pub fetched_at: Instant,
    pub response: Arc<ForecastResponse>,
}

/// Holds at most one response. The snapshot is replaced wholesale, never
/// mutated in place.
#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    slot: Option<CachedForecast>,
}

impl ForecastCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached response if it is still fresh at `now`.
    pub fn get(&self, now: Instant) -> Option<Arc<ForecastResponse>> {
        let entry = self.slot.as_ref()?;
        let age = now.saturating_duration_since(entry.fetched_at);
        (age < self.ttl).then(|| Arc::clone(&entry.response))
    }

    pub fn store(&mut self, now: Instant, response: ForecastResponse) -> Arc<ForecastResponse> {
        let response = Arc::new(response);
        self.slot = Some(CachedForecast {
            fetched_at: now,
            response: Arc::clone(&response),
        });
        response
    }

    #[cfg(test)]
    fn invalidate(&mut self) {
        self.slot = None;
    }

    #[cfg(test)]
    fn entry(&self) -> Option<&CachedForecast> {
        self.slot.as_ref()
    }
}

/// Wraps a provider so that repeated calls within the TTL reuse one response.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    cache: Mutex<ForecastCache>,
}

impl<P: ForecastProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(ForecastCache::new(ttl)),
        }
    }

    pub async fn fetch_forecast(&self) -> Result<Arc<ForecastResponse>> {
        self.fetch_forecast_at(Instant::now).await
    }

    /// `now` is sampled once for the freshness check and again after a miss
    /// completes, so the TTL runs from fetch completion.
    pub async fn fetch_forecast_at<F>(&self, now: F) -> Result<Arc<ForecastResponse>>
    where
        F: Fn() -> Instant + Send + Sync,
    {
        // Held across the upstream call so concurrent callers share one request.
        let mut cache = self.cache.lock().await;

        if let Some(hit) = cache.get(now()) {
            tracing::debug!("forecast cache hit");
            return Ok(hit);
        }

        tracing::debug!(ttl_secs = cache.ttl().as_secs(), "forecast cache miss");
        let fresh = self.inner.fetch_forecast().await?;
        Ok(cache.store(now(), fresh))
    }

    #[cfg(test)]
    async fn invalidate(&self) {
        self.cache.lock().await.invalidate();
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    Config,
    error::{ForecastError, Result},
    model::ForecastResponse,
};

use super::ForecastProvider;

/// HTTP client for the CWA open-data datastore.
#[derive(Clone)]
pub struct CwaProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl CwaProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ForecastError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            http,
        })
    }
}

impl std::fmt::Debug for CwaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CwaProvider").field("endpoint", &self.endpoint).finish_non_exhaustive()
    }
}

#[async_trait]
impl ForecastProvider for CwaProvider {
    async fn fetch_forecast(&self) -> Result<ForecastResponse> {
        tracing::info!(endpoint = %self.endpoint, "requesting 36-hour forecast");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("Authorization", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ForecastError::Fetch(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ForecastError::Fetch(format!(
                "forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ForecastError::Schema(format!("failed to parse forecast JSON: {e}")))?;

        tracing::debug!(locations = parsed.records.location.len(), "forecast received");
        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body;
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PATH: &str = "/api/v1/rest/datastore/F-C0032-001";

    fn body() -> serde_json::Value {
        serde_json::json!({
            "success": "true",
            "records": {
                "datasetDescription": "三十六小時天氣預報",
                "location": [{
                    "locationName": "臺北市",
                    "weatherElement": []
                }]
            }
        })
    }

    fn provider_for(server: &MockServer) -> CwaProvider {
        let cfg = Config::new("TEST-KEY").with_endpoint(format!("{}{}", server.uri(), PATH));
        CwaProvider::new(&cfg).expect("client builds")
    }

    #[tokio::test]
    async fn sends_key_as_authorization_query_param() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PATH))
            .and(query_param("Authorization", "TEST-KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let resp = provider_for(&server).fetch_forecast().await.expect("fetch succeeds");

        assert_eq!(resp.records.location.len(), 1);
        assert_eq!(resp.records.location[0].name, "臺北市");
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_forecast().await.unwrap_err();

        match err {
            ForecastError::Fetch(msg) => {
                assert!(msg.contains("401"), "{msg}");
                assert!(msg.contains("Unauthorized"), "{msg}");
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_json_is_a_schema_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "records": {} })))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_forecast().await.unwrap_err();
        assert!(matches!(err, ForecastError::Schema(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn slow_upstream_times_out_as_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let mut cfg = Config::new("TEST-KEY").with_endpoint(format!("{}{}", server.uri(), PATH));
        cfg.timeout = Duration::from_millis(100);
        let provider = CwaProvider::new(&cfg).expect("client builds");

        let err = provider.fetch_forecast().await.unwrap_err();
        assert!(matches!(err, ForecastError::Fetch(_)), "got {err:?}");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "氣".repeat(100);
        let cut = truncate_body(&long);

        assert!(cut.len() <= 200);
        assert!(cut.chars().all(|c| c == '氣'));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn debug_does_not_leak_key() {
        let provider = CwaProvider::new(&Config::new("SECRET")).expect("client builds");
        assert!(!format!("{provider:?}").contains("SECRET"));
    }
}

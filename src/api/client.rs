//! Prediction Service Client
//!
//! A client for the prediction service, covering form submission and dashboard statistics.

use crate::api::PredictionApi;
use crate::api::error::ApiError;
use crate::api::types::{DashboardStats, FormPayload, RawBody};
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("risk-client/", env!("CARGO_PKG_VERSION"));

const PREDICT_ENDPOINT: &str = "api/predict";
const STATS_ENDPOINT: &str = "api/dashboard/stats";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url`. Without a timeout, requests wait as long as the server does.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into(),
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&response_bytes)?)
    }

    async fn post_form(&self, endpoint: &str, payload: &FormPayload) -> Result<String, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .form(payload.pairs())
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl PredictionApi for ApiClient {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }

    async fn predict(&self, payload: &FormPayload) -> Result<RawBody, ApiError> {
        log::debug!(
            "Submitting {} form fields to {}",
            payload.pairs().len(),
            self.build_url(PREDICT_ENDPOINT)
        );
        let body = self.post_form(PREDICT_ENDPOINT, payload).await?;
        Ok(RawBody(body))
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_request(STATS_ENDPOINT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_url_joins_slashes() {
        let client = ApiClient::new("http://localhost:5000/", None).unwrap();
        assert_eq!(
            client.build_url("/api/predict"),
            "http://localhost:5000/api/predict"
        );
    }

    #[tokio::test]
    /// Should post the urlencoded form and return the raw body.
    async fn test_predict_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/predict"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("BMI=24.5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"success":true,"prediction":0,"probability":0.12}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None).unwrap();
        let mut payload = FormPayload::new();
        payload.push("BMI", "24.5");
        let body = client.predict(&payload).await.unwrap();
        assert!(body.0.contains("\"probability\":0.12"));
    }

    #[tokio::test]
    /// Reserved characters in values are percent-encoded.
    async fn test_predict_encodes_reserved_characters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/predict"))
            .and(body_string_contains("AgeCategory=80+or+older"))
            .and(body_string_contains("note=a%26b%3Dc"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None).unwrap();
        let mut payload = FormPayload::new();
        payload.push("AgeCategory", "80 or older");
        payload.push("note", "a&b=c");
        client.predict(&payload).await.unwrap();
    }

    #[tokio::test]
    /// A non-2xx status becomes an HTTP error carrying the body.
    async fn test_predict_reports_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/predict"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Traceback"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None).unwrap();
        match client.predict(&FormPayload::new()).await {
            Err(ApiError::Http { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Traceback");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dashboard_stats_decodes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"totalPredictions":42,"positiveCases":7,"accuracy":0.913}"#,
            ))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None).unwrap();
        let stats = client.dashboard_stats().await.unwrap();
        assert_eq!(stats.total_predictions, Some(42));
        assert_eq!(stats.positive_cases, Some(7));
        assert_eq!(stats.accuracy, Some(0.913));
    }

    #[tokio::test]
    async fn test_dashboard_stats_rejects_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None).unwrap();
        assert!(matches!(
            client.dashboard_stats().await,
            Err(ApiError::Decode(_))
        ));
    }
}

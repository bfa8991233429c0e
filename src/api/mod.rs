use crate::api::error::ApiError;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod types;

pub use types::{DashboardStats, FormPayload, PredictResponse, RawBody};

#[cfg(test)]
use mockall::{automock, predicate::*};

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PredictionApi: Send + Sync {
    /// Base URL requests are sent to.
    fn base_url(&self) -> String;

    /// Submits the prediction form. Returns the raw body of a 2xx response.
    async fn predict(&self, payload: &FormPayload) -> Result<RawBody, ApiError>;

    /// Fetches the dashboard summary statistics.
    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
}

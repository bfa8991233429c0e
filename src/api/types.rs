//! Wire types exchanged with the prediction service

use serde::{Deserialize, Serialize};

/// Form fields in submission order, sent as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pairs: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Raw body of a successful (2xx) prediction response, decoded by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody(pub String);

/// Prediction value as returned by the server: `0`/`1`, `"Yes"`/`"No"`, or anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Numeric(i64),
    Label(String),
    Other(serde_json::Value),
}

impl Prediction {
    /// Whether the prediction flags a risk.
    pub fn is_positive(&self) -> bool {
        match self {
            Prediction::Numeric(value) => *value == 1,
            Prediction::Label(label) => label == "Yes",
            Prediction::Other(_) => false,
        }
    }
}

/// Response of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub prediction: Option<Prediction>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PredictResponse {
    pub fn from_body(body: &RawBody) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&body.0)
    }
}

/// Response of `GET /api/dashboard/stats`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_predictions: Option<u64>,
    #[serde(default)]
    pub positive_cases: Option<u64>,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

use serde::{Deserialize, Serialize};

pub mod form;

pub use form::{Field, FormInput};

/// Label the service returns for a likely cross-sell.
pub const POSITIVE_LABEL: &str = "YES";
/// Shown in place of a label when the exchange with the service fails.
pub const ERROR_LABEL: &str = "Error connecting to server ❌";

pub const PREDICT_PATH: &str = "/predict";
pub const HEALTH_PATH: &str = "/health";

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub prediction: String,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_features: Option<Vec<String>>,
}

impl PredictResponse {
    pub fn new(prediction: impl Into<String>, probability: Option<f64>) -> Self {
        Self {
            prediction: prediction.into(),
            probability,
            used_features: None,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.prediction == POSITIVE_LABEL
    }
}

/// Body the service sends alongside a 4xx.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub features_expected: Vec<String>,
}

impl HealthResponse {
    /// Differences between what the service expects and the local schema:
    /// `(expected_but_unknown_locally, local_but_not_expected)`.
    pub fn schema_drift(&self) -> (Vec<String>, Vec<String>) {
        let unknown = self
            .features_expected
            .iter()
            .filter(|name| Field::from_name(name).is_none())
            .cloned()
            .collect();
        let unexpected = Field::ALL
            .iter()
            .filter(|field| !self.features_expected.iter().any(|name| name == field.name()))
            .map(|field| field.name().to_string())
            .collect();
        (unknown, unexpected)
    }
}

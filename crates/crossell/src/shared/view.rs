use predict_client::TransportError;
use protocol::{PredictResponse, ERROR_LABEL};
use serde::Serialize;

/// Which indicator a result is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Outcome {
    Positive,
    Negative,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct ResultView {
    pub(crate) label: String,
    pub(crate) outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) probability: Option<String>,
}

impl ResultView {
    pub(crate) fn from_response(response: &PredictResponse) -> Self {
        let outcome = if response.is_positive() {
            Outcome::Positive
        } else {
            Outcome::Negative
        };
        Self {
            label: response.prediction.clone(),
            outcome,
            probability: response.probability.map(format_probability),
        }
    }

    pub(crate) fn transport_error() -> Self {
        Self {
            label: ERROR_LABEL.to_string(),
            outcome: Outcome::Error,
            probability: None,
        }
    }

    pub(crate) fn from_outcome(outcome: &Result<PredictResponse, TransportError>) -> Self {
        match outcome {
            Ok(response) => Self::from_response(response),
            Err(_) => Self::transport_error(),
        }
    }
}

/// `0.87` -> `87.00%`.
pub(crate) fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

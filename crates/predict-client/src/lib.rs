//! Client side of the `/predict` exchange.

mod client;
mod error;

use async_trait::async_trait;
use protocol::{FormInput, PredictResponse};

pub use client::{PredictionClient, DEFAULT_ENDPOINT};
pub use error::TransportError;

/// Something that can score one applicant. Implemented by
/// [`PredictionClient`]; tests substitute their own.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, input: &FormInput) -> Result<PredictResponse, TransportError>;
}

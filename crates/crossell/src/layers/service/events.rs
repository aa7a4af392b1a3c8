use predict_client::TransportError;
use protocol::{FormInput, PredictResponse};

#[derive(Debug)]
pub(crate) enum ServiceCommand {
    Submit(FormInput),
}

#[derive(Debug)]
pub(crate) enum ServiceEvent {
    Settled(Result<PredictResponse, TransportError>),
}

pub(crate) mod events;
mod predictions;

pub(crate) use predictions::spawn_prediction_service;

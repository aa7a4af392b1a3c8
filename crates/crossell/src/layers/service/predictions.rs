use predict_client::Predictor;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::events::{ServiceCommand, ServiceEvent};

/// Runs each submission on its own task and reports back to the UI loop.
/// Submissions are neither queued behind each other nor deduplicated.
pub(crate) fn spawn_prediction_service(
    predictor: Arc<dyn Predictor>,
    mut cmd_rx: mpsc::Receiver<ServiceCommand>,
    event_tx: mpsc::Sender<ServiceEvent>,
) {
    tokio::spawn(async move {
        while let Some(command) = cmd_rx.recv().await {
            match command {
                ServiceCommand::Submit(input) => {
                    let predictor = Arc::clone(&predictor);
                    let event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        let outcome = predictor.predict(&input).await;
                        if event_tx.send(ServiceEvent::Settled(outcome)).await.is_err() {
                            tracing::debug!(
                                event = "service.ui_gone",
                                "ui closed before prediction settled"
                            );
                        }
                    });
                }
            }
        }
        tracing::debug!(event = "service.stopped", "prediction service stopped");
    });
}

use anyhow::Context;
use predict_client::{PredictionClient, Predictor};
use protocol::Field;
use std::io::Write;
use std::process::ExitCode;

use crate::session::Session;
use crate::shared::view::{Outcome, ResultView};

/// One submission without the TUI. Fails only when the form is incomplete;
/// a transport failure is printed like any other result.
pub(crate) async fn run_predict(
    mut session: Session,
    overrides: Vec<(Field, String)>,
    predictor: &dyn Predictor,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    for (field, value) in overrides {
        session.set_field(field, value);
    }
    session.submit(predictor).await?;
    let view = session
        .last_result()
        .context("submission finished without a result")?;
    write_view(view, json, out)?;
    Ok(if view.outcome == Outcome::Error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn write_view(view: &ResultView, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, view)?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "Status: {}", view.label)?;
    if let Some(probability) = &view.probability {
        writeln!(out, "Probability: {probability}")?;
    }
    Ok(())
}

pub(crate) async fn run_health(
    client: &PredictionClient,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let health = match client.health().await {
        Ok(health) => health,
        Err(err) => {
            writeln!(out, "health check failed: {err}")?;
            return Ok(ExitCode::FAILURE);
        }
    };
    writeln!(out, "status: {}", health.status)?;
    let (unknown, unexpected) = health.schema_drift();
    if unknown.is_empty() && unexpected.is_empty() {
        writeln!(out, "features: {} expected, all match the form", health.features_expected.len())?;
        return Ok(ExitCode::SUCCESS);
    }
    if !unknown.is_empty() {
        writeln!(out, "service expects fields the form lacks: {}", unknown.join(", "))?;
    }
    if !unexpected.is_empty() {
        writeln!(out, "form sends fields the service ignores: {}", unexpected.join(", "))?;
    }
    Ok(ExitCode::FAILURE)
}

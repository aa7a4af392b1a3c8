mod cli;
mod config;
mod headless;
mod layers;
mod logging;
mod session;
mod shared;

use crate::cli::{Args, Command};
use crate::config::load_config;
use crate::layers::service::events::{ServiceCommand, ServiceEvent};
use crate::layers::service::spawn_prediction_service;
use crate::layers::ui::{
    draw_ui, handle_key_event, install_panic_hook, restore_terminal, setup_terminal, AppState,
};
use crate::logging::init_tracing;
use crate::session::Session;
use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event};
use predict_client::PredictionClient;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let (config, config_path) = load_config(args.config.as_deref())?;
    let _file_guard = init_tracing(
        &args.log_dir,
        args.log_to_stderr,
        config.log_filter.as_deref(),
    )?;

    let endpoint = config.endpoint(args.endpoint.as_deref());
    let form = config.initial_form()?;
    let client = PredictionClient::new(&endpoint)
        .with_context(|| format!("invalid endpoint {endpoint}"))?;
    info!(
        config = %config_path.display(),
        endpoint = %endpoint,
        predict_url = %client.predict_url(),
        "crossell starting"
    );

    match args.command {
        Some(Command::Predict { set, json }) => {
            let mut stdout = io::stdout().lock();
            headless::run_predict(Session::new(form), set, &client, json, &mut stdout).await
        }
        Some(Command::Health) => {
            let mut stdout = io::stdout().lock();
            headless::run_health(&client, &mut stdout).await
        }
        None => {
            run_interactive(Session::new(form), endpoint, client).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_interactive(
    session: Session,
    endpoint: String,
    client: PredictionClient,
) -> anyhow::Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ServiceCommand>(32);
    let (event_tx, mut event_rx) = mpsc::channel::<ServiceEvent>(32);
    spawn_prediction_service(Arc::new(client), cmd_rx, event_tx);

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = AppState::new(session, endpoint);

    let tick_rate = Duration::from_millis(100);
    let result: anyhow::Result<()> = async {
        loop {
            while let Ok(event) = event_rx.try_recv() {
                app.handle_event(event);
            }

            terminal.draw(|frame| draw_ui(frame, &mut app))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if handle_key_event(key, &mut app, &cmd_tx) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
    .await;

    restore_terminal(&mut terminal)?;
    info!("crossell exiting");
    result
}

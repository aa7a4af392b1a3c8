use crate::layers::service::events::ServiceCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use super::app::{AppState, InputMode};

/// Returns `true` when the UI should exit.
pub(crate) fn handle_key_event(
    key: KeyEvent,
    app: &mut AppState,
    cmd_tx: &mpsc::Sender<ServiceCommand>,
) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }

    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        submit(app, cmd_tx);
        return false;
    }

    if app.mode == InputMode::Editing {
        handle_editing_key(key, app);
        return false;
    }

    if app.confirm_quit {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Esc => {
                app.confirm_quit = false;
                return false;
            }
            _ => {
                app.confirm_quit = false;
            }
        }
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.confirm_quit = true,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.select_prev(),
        KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('i') => app.start_editing(),
        KeyCode::Char('p') | KeyCode::Char('P') => submit(app, cmd_tx),
        _ => {}
    }
    false
}

fn handle_editing_key(key: KeyEvent, app: &mut AppState) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.stop_editing(),
        KeyCode::Tab | KeyCode::Down => app.select_next(),
        KeyCode::BackTab | KeyCode::Up => app.select_prev(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_field(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.push_char(ch),
        _ => {}
    }
}

fn submit(app: &mut AppState, cmd_tx: &mpsc::Sender<ServiceCommand>) {
    let snapshot = match app.session.begin_submit() {
        Ok(snapshot) => snapshot,
        Err(incomplete) => {
            tracing::info!(event = "form.incomplete", missing = %incomplete, "submission refused");
            app.refuse_submit(incomplete);
            return;
        }
    };
    app.stop_editing();
    app.notice = None;
    if let Err(err) = cmd_tx.try_send(ServiceCommand::Submit(snapshot)) {
        tracing::warn!(event = "form.submit_dropped", error = %err, "submission not queued");
        app.session.abandon_submit();
        app.notice = Some("busy, submission dropped".to_string());
    }
}

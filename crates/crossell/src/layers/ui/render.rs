use protocol::Field;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Clear, List, ListItem, Paragraph, Wrap};

use super::app::{AppState, InputMode};
use super::theme::{Theme, ValueStyle};
use crate::session::DisplayState;

const TITLE: &str = "Insurance Cross Sell Prediction";

pub(crate) fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let theme = Theme::dark();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(13),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let header_line = Line::from(vec![
        Span::styled(TITLE, theme.value_style(ValueStyle::Important)),
        Span::styled("  Endpoint: ", theme.key_style()),
        Span::styled(app.endpoint.as_str(), theme.value_style(ValueStyle::Normal)),
    ]);
    let header = Paragraph::new(header_line).block(theme.block("Crossell"));
    frame.render_widget(header, chunks[0]);

    let label_width = Field::ALL
        .iter()
        .map(|field| field.label().chars().count())
        .max()
        .unwrap_or_default();
    let editing = app.mode == InputMode::Editing;
    let selected = app.selected_field();
    let form_items = app
        .session
        .form()
        .iter()
        .map(|(field, value)| {
            let mut value_text = value.to_string();
            if editing && field == selected {
                value_text.push('▏');
            }
            let value_style = if value.is_empty() {
                theme.warn_style()
            } else {
                theme.value_style(ValueStyle::Normal)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", field.label(), width = label_width),
                    theme.key_style(),
                ),
                Span::styled(value_text, value_style),
            ]))
        })
        .collect::<Vec<_>>();
    let form_title = if editing {
        "Prediction Form (editing)"
    } else {
        "Prediction Form"
    };
    let form_list = List::new(form_items)
        .block(theme.block(form_title))
        .highlight_style(if editing {
            theme.editing_style()
        } else {
            theme.highlight_style()
        })
        .highlight_symbol(">> ");
    frame.render_stateful_widget(form_list, body[0], &mut app.field_list_state);

    let (result_block, result_text) = match app.session.display() {
        DisplayState::AwaitingInput => (
            theme.block("Awaiting Input"),
            Text::styled(
                "Fill in the form and press P to see results.",
                theme.value_style(ValueStyle::Dim),
            ),
        ),
        DisplayState::Result(view) => {
            let mut lines = vec![Line::from(vec![
                Span::styled("Status: ", theme.key_style()),
                Span::styled(view.label.as_str(), theme.outcome_style(view.outcome)),
            ])];
            if let Some(probability) = &view.probability {
                lines.push(Line::from(vec![
                    Span::styled("Probability: ", theme.key_style()),
                    Span::styled(probability.as_str(), theme.accent_style()),
                ]));
            }
            (
                theme.outcome_block("Prediction Result", view.outcome),
                Text::from(lines),
            )
        }
    };
    let result_widget = Paragraph::new(result_text)
        .block(result_block)
        .style(theme.value_style(ValueStyle::Normal))
        .wrap(Wrap { trim: true });
    frame.render_widget(Clear, body[1]);
    frame.render_widget(result_widget, body[1]);

    let help = if editing {
        "type to edit  Backspace=delete  Ctrl+U=clear  Tab=next  Enter/Esc=done  Ctrl+S=predict  "
    } else {
        "↑/↓=select  Enter=edit  P=predict  Q=quit  "
    };
    let mut footer_spans = vec![Span::styled(help, theme.help_style())];
    if app.session.in_flight() {
        footer_spans.push(Span::styled("predicting…  ", theme.accent_style()));
    }
    if let Some(notice) = &app.notice {
        footer_spans.push(Span::styled(format!("{notice}  "), theme.warn_style()));
    }
    if app.confirm_quit {
        footer_spans.push(Span::styled(
            "press Q again to quit / Esc to cancel  ",
            theme.warn_style(),
        ));
    }
    let footer = Paragraph::new(Line::from(footer_spans)).block(theme.block("Controls"));
    frame.render_widget(footer, chunks[2]);
}

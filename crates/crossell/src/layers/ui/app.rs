use crate::layers::service::events::ServiceEvent;
use crate::session::{Incomplete, Session};
use protocol::Field;
use ratatui::widgets::ListState;

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub(crate) enum InputMode {
    #[default]
    Browse,
    Editing,
}

pub(crate) struct AppState {
    pub(crate) session: Session,
    pub(crate) endpoint: String,
    pub(crate) selected: usize,
    pub(crate) field_list_state: ListState,
    pub(crate) mode: InputMode,
    pub(crate) notice: Option<String>,
    pub(crate) confirm_quit: bool,
}

impl AppState {
    pub(crate) fn new(session: Session, endpoint: String) -> Self {
        let mut app = Self {
            session,
            endpoint,
            selected: 0,
            field_list_state: ListState::default(),
            mode: InputMode::Browse,
            notice: None,
            confirm_quit: false,
        };
        app.sync_selection();
        app
    }

    pub(crate) fn handle_event(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::Settled(outcome) => {
                self.session.settle(&outcome);
                self.notice = None;
            }
        }
    }

    pub(crate) fn selected_field(&self) -> Field {
        Field::ALL[self.selected.min(Field::ALL.len() - 1)]
    }

    pub(crate) fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Field::ALL.len();
        self.sync_selection();
    }

    pub(crate) fn select_prev(&mut self) {
        if self.selected == 0 {
            self.selected = Field::ALL.len() - 1;
        } else {
            self.selected -= 1;
        }
        self.sync_selection();
    }

    pub(crate) fn start_editing(&mut self) {
        self.mode = InputMode::Editing;
        self.confirm_quit = false;
    }

    pub(crate) fn stop_editing(&mut self) {
        self.mode = InputMode::Browse;
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        let field = self.selected_field();
        self.session.field_mut(field).push(ch);
    }

    pub(crate) fn pop_char(&mut self) {
        let field = self.selected_field();
        self.session.field_mut(field).pop();
    }

    pub(crate) fn clear_field(&mut self) {
        let field = self.selected_field();
        self.session.set_field(field, String::new());
    }

    pub(crate) fn refuse_submit(&mut self, incomplete: Incomplete) {
        if let Some(first) = incomplete.0.first() {
            self.selected = first.index();
            self.sync_selection();
        }
        self.notice = Some(incomplete.to_string());
    }

    fn sync_selection(&mut self) {
        self.field_list_state.select(Some(self.selected));
    }
}

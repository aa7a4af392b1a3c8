use predict_client::{Predictor, TransportError};
use protocol::{Field, FormInput, PredictResponse};
use std::fmt;

use crate::shared::view::ResultView;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum DisplayState {
    #[default]
    AwaitingInput,
    Result(ResultView),
}

/// A submission was refused because some fields are empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Incomplete(pub(crate) Vec<Field>);

impl fmt::Display for Incomplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .0
            .iter()
            .map(|field| field.name())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "fill in: {names}")
    }
}

impl std::error::Error for Incomplete {}

/// The form being edited and whatever the last settled submission produced.
///
/// Submissions are not serialized: a second one may start before the first
/// settles, and whichever settles last owns the display.
#[derive(Debug)]
pub(crate) struct Session {
    form: FormInput,
    display: DisplayState,
    in_flight: usize,
}

impl Session {
    pub(crate) fn new(form: FormInput) -> Self {
        Self {
            form,
            display: DisplayState::AwaitingInput,
            in_flight: 0,
        }
    }

    pub(crate) fn form(&self) -> &FormInput {
        &self.form
    }

    pub(crate) fn display(&self) -> &DisplayState {
        &self.display
    }

    /// The result of the last settled submission, if any has settled.
    pub(crate) fn last_result(&self) -> Option<&ResultView> {
        match &self.display {
            DisplayState::AwaitingInput => None,
            DisplayState::Result(view) => Some(view),
        }
    }

    pub(crate) fn in_flight(&self) -> bool {
        self.in_flight > 0
    }

    pub(crate) fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub(crate) fn field_mut(&mut self, field: Field) -> &mut String {
        self.form.get_mut(field)
    }

    /// Snapshot of the form to send, or the fields still empty.
    pub(crate) fn begin_submit(&mut self) -> Result<FormInput, Incomplete> {
        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            return Err(Incomplete(missing));
        }
        self.in_flight += 1;
        Ok(self.form.clone())
    }

    /// Forget a submission that never reached the service.
    pub(crate) fn abandon_submit(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn settle(&mut self, outcome: &Result<PredictResponse, TransportError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.display = DisplayState::Result(ResultView::from_outcome(outcome));
    }

    pub(crate) async fn submit(&mut self, predictor: &dyn Predictor) -> Result<(), Incomplete> {
        let snapshot = self.begin_submit()?;
        let outcome = predictor.predict(&snapshot).await;
        self.settle(&outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::view::Outcome;
    use async_trait::async_trait;
    use protocol::ERROR_LABEL;
    use std::sync::Mutex;

    struct Scripted {
        replies: Mutex<Vec<Result<PredictResponse, TransportError>>>,
        seen: Mutex<Vec<FormInput>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<PredictResponse, TransportError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Predictor for Scripted {
        async fn predict(&self, input: &FormInput) -> Result<PredictResponse, TransportError> {
            self.seen.lock().unwrap().push(input.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    #[tokio::test]
    async fn starts_awaiting_input_with_defaults() {
        let session = Session::new(FormInput::default());
        assert_eq!(session.display(), &DisplayState::AwaitingInput);
        assert_eq!(session.form(), &FormInput::default());
        assert!(session.last_result().is_none());
        assert!(!session.in_flight());
    }

    #[tokio::test]
    async fn successful_submission_shows_result() {
        let predictor = Scripted::new(vec![Ok(PredictResponse::new("YES", Some(0.87)))]);
        let mut session = Session::new(FormInput::default());

        session.submit(&predictor).await.unwrap();

        match session.display() {
            DisplayState::Result(view) => {
                assert_eq!(view.label, "YES");
                assert_eq!(view.outcome, Outcome::Positive);
                assert_eq!(view.probability.as_deref(), Some("87.00%"));
            }
            other => panic!("unexpected display {other:?}"),
        }
        assert_eq!(
            session.last_result().map(|view| view.label.as_str()),
            Some("YES")
        );
        assert!(!session.in_flight());
    }

    #[tokio::test]
    async fn transport_failure_replaces_previous_result() {
        let predictor = Scripted::new(vec![
            Ok(PredictResponse::new("NO", Some(0.12))),
            Err(TransportError::Status {
                status: 503,
                detail: None,
            }),
        ]);
        let mut session = Session::new(FormInput::default());

        session.submit(&predictor).await.unwrap();
        session.submit(&predictor).await.unwrap();

        let DisplayState::Result(view) = session.display() else {
            panic!("expected a result");
        };
        assert_eq!(view.label, ERROR_LABEL);
        assert_eq!(view.outcome, Outcome::Error);
        assert!(view.probability.is_none());
    }

    #[tokio::test]
    async fn edits_reach_the_next_submission_only_for_that_field() {
        let predictor = Scripted::new(vec![
            Ok(PredictResponse::new("YES", Some(0.7))),
            Ok(PredictResponse::new("NO", Some(0.2))),
        ]);
        let mut session = Session::new(FormInput::default());

        session.submit(&predictor).await.unwrap();
        session.set_field(Field::PreviouslyInsured, "1");
        session.submit(&predictor).await.unwrap();

        let seen = predictor.seen.lock().unwrap();
        let mut expected = seen[0].clone();
        expected.set(Field::PreviouslyInsured, "1");
        assert_eq!(seen[1], expected);
    }

    #[tokio::test]
    async fn empty_field_blocks_submission() {
        let predictor = Scripted::new(Vec::new());
        let mut session = Session::new(FormInput::default());
        session.set_field(Field::AgeLog, "");

        let err = session.submit(&predictor).await.unwrap_err();

        assert_eq!(err, Incomplete(vec![Field::AgeLog]));
        assert_eq!(err.to_string(), "fill in: Age_log");
        assert!(predictor.seen.lock().unwrap().is_empty());
        assert_eq!(session.display(), &DisplayState::AwaitingInput);
        assert!(!session.in_flight());
    }

    #[test]
    fn overlapping_submissions_track_in_flight_count() {
        let mut session = Session::new(FormInput::default());
        session.begin_submit().unwrap();
        session.begin_submit().unwrap();
        assert!(session.in_flight());

        session.settle(&Ok(PredictResponse::new("NO", None)));
        assert!(session.in_flight());
        session.abandon_submit();
        assert!(!session.in_flight());
    }
}

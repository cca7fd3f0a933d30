//! The single "current analysis" slot and its transitions.
//!
//! `Idle -> InFlight -> Succeeded | Failed`; a new attempt overwrites whatever
//! the slot held before.

use tracing::debug;

use crate::{
    analysis::describe_error,
    error::{FramelensError, Result},
    parser::parse_analysis,
    types::ParsedAnalysis,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisState {
    #[default]
    Idle,
    InFlight {
        source: String,
    },
    Succeeded {
        source: String,
        text: String,
        parsed: Option<ParsedAnalysis>,
    },
    Failed {
        source: String,
        error: String,
    },
}

impl AnalysisState {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisState::Idle => "idle",
            AnalysisState::InFlight { .. } => "in-flight",
            AnalysisState::Succeeded { .. } => "succeeded",
            AnalysisState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: AnalysisState,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, AnalysisState::InFlight { .. })
    }

    pub fn begin(&mut self, source: impl Into<String>) -> Result<()> {
        if self.is_in_flight() {
            return Err(FramelensError::Busy);
        }
        let source = source.into();
        debug!(%source, previous = self.state.name(), "analysis started");
        self.state = AnalysisState::InFlight { source };
        Ok(())
    }

    /// Store the model's answer, parsed once up front.
    pub fn succeed(&mut self, text: String) -> Result<&AnalysisState> {
        let source = self.take_in_flight_source()?;
        let parsed = parse_analysis(&text);
        self.state = AnalysisState::Succeeded {
            source,
            text,
            parsed,
        };
        Ok(&self.state)
    }

    pub fn fail(&mut self, error: &FramelensError) -> Result<&AnalysisState> {
        let source = self.take_in_flight_source()?;
        self.state = AnalysisState::Failed {
            source,
            error: describe_error(error),
        };
        Ok(&self.state)
    }

    /// Record the outcome of an analysis call in one step.
    pub fn complete(&mut self, outcome: Result<String>) -> Result<&AnalysisState> {
        match outcome {
            Ok(text) => self.succeed(text),
            Err(err) => self.fail(&err),
        }
    }

    pub fn reset(&mut self) {
        self.state = AnalysisState::Idle;
    }

    fn take_in_flight_source(&mut self) -> Result<String> {
        match std::mem::take(&mut self.state) {
            AnalysisState::InFlight { source } => Ok(source),
            other => {
                let found = other.name();
                self.state = other;
                Err(FramelensError::InvalidState {
                    expected: "in-flight",
                    found,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        assert_eq!(AnalysisSession::new().state(), &AnalysisState::Idle);
    }

    #[test]
    fn success_parses_text() {
        let mut session = AnalysisSession::new();
        session.begin("clip.mp4").unwrap();
        assert!(session.is_in_flight());

        let state = session
            .succeed("TECHNICAL STYLE ANALYSIS\nHandheld.".to_string())
            .unwrap();

        match state {
            AnalysisState::Succeeded {
                source, parsed, ..
            } => {
                assert_eq!(source, "clip.mp4");
                assert_eq!(parsed.as_ref().unwrap().technical_analysis, "Handheld.");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn unstructured_success_keeps_raw_text() {
        let mut session = AnalysisSession::new();
        session.begin("clip.mp4").unwrap();
        session.succeed("free text".to_string()).unwrap();

        assert!(matches!(
            session.state(),
            AnalysisState::Succeeded { text, parsed: None, .. } if text == "free text"
        ));
    }

    #[test]
    fn failure_stores_user_message() {
        let mut session = AnalysisSession::new();
        session.begin("notes.txt").unwrap();
        session
            .complete(Err(FramelensError::Validation {
                mime_type: "text/plain".to_string(),
            }))
            .unwrap();

        match session.state() {
            AnalysisState::Failed { error, .. } => assert!(error.starts_with("Error: ")),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn second_begin_while_in_flight_is_rejected() {
        let mut session = AnalysisSession::new();
        session.begin("a.mp4").unwrap();

        assert!(matches!(session.begin("b.mp4"), Err(FramelensError::Busy)));
        assert_eq!(
            session.state(),
            &AnalysisState::InFlight {
                source: "a.mp4".to_string()
            }
        );
    }

    #[test]
    fn new_attempt_overwrites_previous_result() {
        let mut session = AnalysisSession::new();
        session.begin("a.mp4").unwrap();
        session.succeed("first".to_string()).unwrap();

        session.begin("b.mp4").unwrap();
        assert_eq!(
            session.state(),
            &AnalysisState::InFlight {
                source: "b.mp4".to_string()
            }
        );
    }

    #[test]
    fn completing_without_begin_is_rejected() {
        let mut session = AnalysisSession::new();
        let err = session.succeed("text".to_string()).unwrap_err();

        assert!(matches!(
            err,
            FramelensError::InvalidState {
                found: "idle",
                ..
            }
        ));
        assert_eq!(session.state(), &AnalysisState::Idle);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = AnalysisSession::new();
        session.begin("a.mp4").unwrap();
        session.reset();
        assert_eq!(session.state(), &AnalysisState::Idle);
    }
}

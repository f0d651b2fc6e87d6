//! Search session state machine
//!
//! Idle → Loading → Success | Error, re-entering Loading on every
//! submission. There is no terminal state.
//!
//! The state is a single discriminated enum, so a result can only exist in
//! Success and an error message only in Error. Mutators are crate-private:
//! renderers get read-only snapshots.

use chrono::{DateTime, Utc};
use revradar_common::events::{RevealPhase, SessionStatus};
use revradar_common::AnalysisResult;
use serde::Serialize;
use uuid::Uuid;

/// Session lifecycle state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "PascalCase")]
pub enum SessionState {
    /// Nothing submitted yet
    Idle,
    /// Request in flight
    Loading,
    /// Result published (possibly an interim fallback result)
    Success {
        result: AnalysisResult,
        reveal_phase: RevealPhase,
    },
    /// Submission failed
    Error { message: String },
}

/// One search view's session, owned by the orchestration layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSession {
    session_id: Uuid,
    query: String,
    #[serde(flatten)]
    state: SessionState,
    /// Incremented on every accepted submission
    sequence: u64,
    updated_at: DateTime<Utc>,
}

impl SearchSession {
    /// Create an Idle session
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            query: String::new(),
            state: SessionState::Idle,
            sequence: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Query of the latest accepted submission
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Loading => SessionStatus::Loading,
            SessionState::Success { .. } => SessionStatus::Success,
            SessionState::Error { .. } => SessionStatus::Error,
        }
    }

    /// Published result, only in Success
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            SessionState::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Failure message, only in Error
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Reveal phase, only in Success
    pub fn reveal_phase(&self) -> Option<RevealPhase> {
        match &self.state {
            SessionState::Success { reveal_phase, .. } => Some(*reveal_phase),
            _ => None,
        }
    }

    /// True while the submission with `sequence` is still awaited
    pub fn is_awaiting(&self, sequence: u64) -> bool {
        self.sequence == sequence && self.state == SessionState::Loading
    }

    /// Enter Loading for a new submission, returning its sequence token
    ///
    /// Clears any result or error from the previous cycle.
    pub(crate) fn begin(&mut self, query: &str) -> u64 {
        self.sequence += 1;
        self.query = query.to_string();
        self.set_state(SessionState::Loading);
        self.sequence
    }

    pub(crate) fn succeed(&mut self, result: AnalysisResult, reveal_phase: RevealPhase) {
        self.set_state(SessionState::Success { result, reveal_phase });
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.set_state(SessionState::Error { message });
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        self.updated_at = Utc::now();
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}
